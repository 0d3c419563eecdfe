//! Application service: service instance lifecycle orchestration.
//!
//! Sequences key registration, container provisioning, bundle distribution
//! and the remote control actions. Every step is a single awaited call; the
//! first failure aborts the sequence without retry or rollback.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::PathBuf;

use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use svcmgr_common::{Entity, EntityExtras, LifecyclePhase, ServiceState};

use crate::application::ports::{
    CloudController, Credentials, LocalFs, ProgressReporter, ServiceEndpoint, StackInspector,
    VersionControl,
};
use crate::application::services::bundle_distribution::{self, BundleLayout};
use crate::application::services::container_provision::create_container;
use crate::application::services::key_registration::{KeyOutcome, ensure_registered};
use crate::application::services::remote_control;
use crate::domain::container::{container_path, derive_host, stack_path};
use crate::domain::error::LifecycleError;
use crate::domain::stack::{RemoteState, StackDetails};

/// Source of randomness for container names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppNaming {
    #[default]
    Random,
    /// Fixed seed; every deploy draws the same name.
    Seeded(u64),
}

impl AppNaming {
    fn rng(self) -> StdRng {
        match self {
            Self::Random => StdRng::from_os_rng(),
            Self::Seeded(seed) => StdRng::seed_from_u64(seed),
        }
    }
}

/// Local settings the orchestrator needs beyond its ports.
#[derive(Debug, Clone)]
pub struct DeploySettings {
    pub ssh_key_location: PathBuf,
    pub bundle: BundleLayout,
    pub naming: AppNaming,
}

/// Drives one entity through deploy, dispose and status queries.
pub struct LifecycleOrchestrator<C, S, E, V, F> {
    controller: C,
    stacks: S,
    endpoint: E,
    vcs: V,
    fs: F,
    settings: DeploySettings,
}

impl<C, S, E, V, F> LifecycleOrchestrator<C, S, E, V, F>
where
    C: CloudController,
    S: StackInspector,
    E: ServiceEndpoint,
    V: VersionControl,
    F: LocalFs,
{
    pub fn new(controller: C, stacks: S, endpoint: E, vcs: V, fs: F, settings: DeploySettings) -> Self {
        Self {
            controller,
            stacks,
            endpoint,
            vcs,
            fs,
            settings,
        }
    }

    /// Provision and start a service instance for `entity`.
    ///
    /// Resets `entity.extras`, then walks the deploy phases. On failure the
    /// entity is left in [`LifecyclePhase::Failed`] with the failing step
    /// recorded; the service state attribute is set to `failed` only when the
    /// instance reports it was never initialised.
    ///
    /// # Errors
    ///
    /// Propagates the first failing step's error.
    pub async fn deploy(
        &self,
        entity: &mut Entity,
        creds: &Credentials,
        reporter: &impl ProgressReporter,
    ) -> Result<()> {
        entity.extras = EntityExtras::default();
        tracing::info!(entity = %entity.identifier, kind = %entity.kind.term, "deploy started");

        let result = self.run_deploy(entity, creds, reporter).await;
        if let Err(err) = &result {
            let step = entity.extras.phase.pending_step();
            entity.extras.fail();
            reporter.warn(&format!("deploy stopped at step '{step}'"));
            tracing::warn!(entity = %entity.identifier, step, error = %format!("{err:#}"), "deploy failed");
        } else {
            tracing::info!(entity = %entity.identifier, "deploy finished");
        }
        result
    }

    async fn run_deploy(
        &self,
        entity: &mut Entity,
        creds: &Credentials,
        reporter: &impl ProgressReporter,
    ) -> Result<()> {
        reporter.step("checking SSH key registration...");
        match ensure_registered(&self.controller, &self.fs, &self.settings.ssh_key_location).await? {
            KeyOutcome::AlreadyRegistered { .. } => reporter.success("SSH key already registered"),
            KeyOutcome::Registered { name } => {
                reporter.success(&format!("SSH key '{name}' registered"));
            }
        }
        entity.extras.advance(LifecyclePhase::ProvisioningStarted).map_err(LifecycleError::from)?;

        reporter.step("creating service instance container (this can take a while)...");
        let mut rng = self.settings.naming.rng();
        let container = create_container(&self.controller, entity, &mut rng).await?;
        reporter.success(&format!("container {} created", container.name));
        entity.extras.advance(LifecyclePhase::Provisioned).map_err(LifecycleError::from)?;

        reporter.step("pushing service bundle (this can take a while)...");
        bundle_distribution::distribute(
            &self.vcs,
            &self.fs,
            &self.settings.bundle,
            &container.repo_uri,
        )
        .await?;
        reporter.success("service bundle pushed");
        entity.extras.advance(LifecyclePhase::CodeDistributed).map_err(LifecycleError::from)?;

        let host = derive_host(&container.repo_uri)?;
        entity.extras.host = Some(host.clone());

        reporter.step(&format!("initialising service instance at {host}..."));
        remote_control::init(&self.endpoint, &host, creds).await?;
        entity.extras.advance(LifecyclePhase::RemoteInitialized).map_err(LifecycleError::from)?;

        reporter.step("deploying service instance stack...");
        let stack_id = match remote_control::activate(&self.endpoint, &host, creds).await {
            Ok(id) => id,
            Err(err) => {
                if matches!(
                    err.downcast_ref::<LifecycleError>(),
                    Some(LifecycleError::Deployment { .. })
                ) {
                    entity.set_service_state(ServiceState::Failed);
                }
                return Err(err);
            }
        };
        entity.extras.stack_id = Some(stack_id);
        entity.extras.advance(LifecyclePhase::RemoteActive).map_err(LifecycleError::from)?;
        reporter.success("service instance deployed");
        Ok(())
    }

    /// Tear down the service instance and release its container.
    ///
    /// The remote dispose runs first; the container is only released once the
    /// instance has acknowledged.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::Provisioning`] if the entity has no host, before
    ///   any network call.
    /// - [`LifecycleError::InvalidTransition`] if the entity is already
    ///   disposed.
    /// - The first failing step's error otherwise.
    pub async fn dispose(
        &self,
        entity: &mut Entity,
        creds: &Credentials,
        reporter: &impl ProgressReporter,
    ) -> Result<()> {
        let host = entity
            .extras
            .host
            .clone()
            .ok_or_else(|| LifecycleError::provisioning("entity has no host; was it deployed?"))?;
        entity.extras.advance(LifecyclePhase::Disposing).map_err(LifecycleError::from)?;
        tracing::info!(entity = %entity.identifier, %host, "dispose started");

        let result = self.run_dispose(entity, &host, creds, reporter).await;
        if let Err(err) = &result {
            entity.extras.fail();
            tracing::warn!(entity = %entity.identifier, error = %format!("{err:#}"), "dispose failed");
        }
        result
    }

    async fn run_dispose(
        &self,
        entity: &mut Entity,
        host: &str,
        creds: &Credentials,
        reporter: &impl ProgressReporter,
    ) -> Result<()> {
        reporter.step(&format!("disposing service instance at {host}..."));
        if let Err(err) = remote_control::dispose(&self.endpoint, host).await {
            reporter.warn(&format!("{host} did not acknowledge dispose; container kept"));
            return Err(err);
        }

        let path = container_path(&entity.identifier, &entity.kind);
        reporter.step(&format!("releasing container {path}..."));
        self.controller.delete_app(&path, creds).await?;

        entity.extras.advance(LifecyclePhase::Disposed).map_err(LifecycleError::from)?;
        reporter.success("service instance disposed");
        tracing::info!(entity = %entity.identifier, "dispose finished");
        Ok(())
    }

    /// Fetch the stack's deployment details and project them onto `entity`.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::Provisioning`] if the entity has no stack id,
    ///   before any network call.
    /// - Transport errors from the design endpoint.
    pub async fn so_details(&self, entity: &mut Entity, creds: &Credentials) -> Result<StackDetails> {
        let stack_id = entity
            .extras
            .stack_id
            .as_deref()
            .ok_or_else(|| LifecycleError::provisioning("entity has no stack id; was it deployed?"))?;
        let details = self.stacks.details(&stack_path(stack_id), creds).await?;
        details.apply_to(entity);
        tracing::debug!(
            entity = %entity.identifier,
            state = %details.state,
            outputs = details.output.len(),
            "stack details applied"
        );
        Ok(details)
    }

    /// Ask the running instance what it is doing.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::Provisioning`] if the entity has no host.
    /// - Transport errors from the instance.
    pub async fn so_state(&self, entity: &Entity, creds: &Credentials) -> Result<RemoteState> {
        let host = entity
            .extras
            .host
            .as_deref()
            .ok_or_else(|| LifecycleError::provisioning("entity has no host; was it deployed?"))?;
        remote_control::state(&self.endpoint, host, creds).await
    }
}
