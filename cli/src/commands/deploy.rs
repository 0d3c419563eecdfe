//! `svcmgr deploy`: provision and start a service instance.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use svcmgr_common::{Entity, Kind, LifecyclePhase};

use crate::app::AppContext;
use crate::application::ports::EntityStore;
use crate::application::services::lifecycle::AppNaming;
use crate::commands::{CredentialArgs, orchestrator};
use crate::domain::LifecycleError;
use crate::output::reporter::{SilentReporter, TerminalReporter};

const DEFAULT_SCHEME: &str = "http://schemas.mobile-cloud-networking.eu/occi/sm#";

/// Arguments for the deploy command.
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Kind term of the service, e.g. `epc`
    #[arg(long)]
    pub term: String,

    /// Kind scheme
    #[arg(long, default_value = DEFAULT_SCHEME)]
    pub scheme: String,

    /// Kind collection path; defaults to `/<term>/`
    #[arg(long)]
    pub location: Option<String>,

    /// Seed for the container name generator (reproducible names)
    #[arg(long, hide = true)]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub creds: CredentialArgs,
}

impl DeployArgs {
    fn kind(&self) -> Kind {
        let location = self
            .location
            .clone()
            .unwrap_or_else(|| format!("/{}/", self.term.trim_matches('/')));
        Kind {
            term: self.term.clone(),
            scheme: self.scheme.clone(),
            location,
        }
    }
}

/// Run `svcmgr deploy`.
///
/// The entity record is saved whether or not deploy succeeds, so a failed
/// step stays visible to `svcmgr show`. A recorded instance that still holds
/// a container is never overwritten.
///
/// # Errors
///
/// Returns `LifecycleError::InvalidTransition` when a live instance is
/// recorded, otherwise the first failing deploy step's error.
pub async fn run(app: &AppContext, args: &DeployArgs) -> Result<ExitCode> {
    if let Some(existing) = app.entity_store.load_async().await? {
        let phase = existing.extras.phase;
        if phase.holds_instance() {
            return Err(anyhow::Error::new(LifecycleError::InvalidTransition {
                from: phase,
                to: LifecyclePhase::ProvisioningStarted,
            })
            .context(format!(
                "{} is still recorded ({phase}); run `svcmgr dispose` first",
                existing.identifier
            )));
        }
    }

    let naming = args.seed.map_or(AppNaming::Random, AppNaming::Seeded);
    let orchestrator = orchestrator(app, naming).await?;

    let kind = args.kind();
    let mut entity = Entity::new(kind.location.clone(), kind);
    let creds = args.creds.credentials();

    let result = if app.is_json() {
        orchestrator.deploy(&mut entity, &creds, &SilentReporter).await
    } else {
        orchestrator
            .deploy(&mut entity, &creds, &TerminalReporter::new(&app.output))
            .await
    };
    app.entity_store.save_async(&entity).await?;
    result?;

    app.renderer().render_entity(&entity)?;
    Ok(ExitCode::SUCCESS)
}
