//! `svcmgr details` and `svcmgr state`: query a deployed instance.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::EntityStore;
use crate::application::services::lifecycle::AppNaming;
use crate::commands::{CredentialArgs, load_entity, orchestrator};
use crate::output::progress;

/// Arguments for the details and state commands.
#[derive(Args, Debug)]
pub struct QueryArgs {
    #[command(flatten)]
    pub creds: CredentialArgs,
}

/// Run `svcmgr details`: fetch stack details and merge them into the
/// recorded entity.
///
/// # Errors
///
/// Returns an error if the entity has no stack id or the lookup fails.
pub async fn run_details(app: &AppContext, args: &QueryArgs) -> Result<ExitCode> {
    let mut entity = load_entity(app).await?;
    let orchestrator = orchestrator(app, AppNaming::Random).await?;

    let pb = (app.output.show_progress() && !app.is_json())
        .then(|| progress::spinner("fetching stack details..."));
    let result = orchestrator
        .so_details(&mut entity, &args.creds.credentials())
        .await;
    if let Some(pb) = &pb {
        match &result {
            Ok(details) => progress::finish_ok(pb, &format!("stack {}", details.state)),
            Err(_) => progress::finish_clear(pb),
        }
    }
    let details = result?;

    app.entity_store.save_async(&entity).await?;
    app.renderer().render_details(&entity, &details)?;
    Ok(ExitCode::SUCCESS)
}

/// Run `svcmgr state`: ask the running instance for its status.
///
/// # Errors
///
/// Returns an error if the entity has no host or the call fails.
pub async fn run_state(app: &AppContext, args: &QueryArgs) -> Result<ExitCode> {
    let entity = load_entity(app).await?;
    let orchestrator = orchestrator(app, AppNaming::Random).await?;
    let state = orchestrator
        .so_state(&entity, &args.creds.credentials())
        .await?;
    app.renderer().render_state(&state)?;
    Ok(ExitCode::SUCCESS)
}
