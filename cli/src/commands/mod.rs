//! Command implementations

pub mod config;
pub mod deploy;
pub mod details;
pub mod dispose;
pub mod show;

use anyhow::{Context, Result};
use clap::Args;
use svcmgr_common::Entity;

use crate::app::AppContext;
use crate::application::ports::{Credentials, EntityStore};
use crate::application::services::bundle_distribution::BundleLayout;
use crate::application::services::config_service;
use crate::application::services::lifecycle::{AppNaming, DeploySettings, LifecycleOrchestrator};
use crate::infra::cloud_controller::{HttpCloudController, HttpStackInspector};
use crate::infra::command_runner::{DEFAULT_CMD_TIMEOUT, TokioCommandRunner};
use crate::infra::fs::StdFs;
use crate::infra::git::GitCli;
use crate::infra::service_endpoint::HttpServiceEndpoint;

/// Tenant credentials shared by every remote command.
#[derive(Args, Debug, Clone)]
pub struct CredentialArgs {
    /// Keystone token forwarded to the service instance
    #[arg(long, env = "SVCMGR_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Tenant name forwarded to the service instance
    #[arg(long, env = "SVCMGR_TENANT")]
    pub tenant: String,
}

impl CredentialArgs {
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.token, &self.tenant)
    }
}

/// Orchestrator wired to the production adapters.
pub type Orchestrator = LifecycleOrchestrator<
    HttpCloudController,
    HttpStackInspector,
    HttpServiceEndpoint,
    GitCli<TokioCommandRunner>,
    StdFs,
>;

/// Build the orchestrator from the on-disk configuration.
///
/// # Errors
///
/// Returns `LifecycleError::Configuration` for missing settings or when `git`
/// cannot be run.
pub async fn orchestrator(app: &AppContext, naming: AppNaming) -> Result<Orchestrator> {
    let home = dirs::home_dir();
    let cfg = config_service::load_resolved(&app.config_store, home.as_deref())?;
    tracing::debug!(nb_api = %cfg.nb_api, design_uri = %cfg.design_uri, "configuration loaded");

    let git = GitCli::probe(TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT), cfg.git_timeout).await?;

    Ok(LifecycleOrchestrator::new(
        HttpCloudController::new(&cfg.nb_api, cfg.http_timeout)?,
        HttpStackInspector::new(&cfg.design_uri, cfg.http_timeout)?,
        HttpServiceEndpoint::new(cfg.http_timeout)?,
        git,
        StdFs,
        DeploySettings {
            ssh_key_location: cfg.ssh_key_location,
            bundle: BundleLayout {
                bundle_dir: cfg.bundle_location,
                work_dir: cfg.work_dir,
            },
            naming,
        },
    ))
}

/// Load the stored entity or explain how to create one.
///
/// # Errors
///
/// Returns an error if no entity record exists or it cannot be read.
pub async fn load_entity(app: &AppContext) -> Result<Entity> {
    app.entity_store
        .load_async()
        .await?
        .with_context(|| {
            format!(
                "no service instance recorded at {}\n\nDeploy one first: svcmgr deploy --term <kind>",
                app.entity_store.path().display()
            )
        })
}
