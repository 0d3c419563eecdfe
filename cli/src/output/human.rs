//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;
use svcmgr_common::{Entity, LifecyclePhase};

use crate::domain::config::SvcmgrConfig;
use crate::domain::stack::{RemoteState, StackDetails, attribute_value};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the stored entity.
    pub fn render_entity(&self, entity: &Entity) {
        self.ctx.kv("Identifier:", &entity.identifier);
        self.ctx.kv(
            "Kind:",
            &format!("{} ({})", entity.kind.term, entity.kind.location),
        );
        let phase = entity.extras.phase;
        self.ctx.kv(
            "Phase:",
            &phase_display(phase).style(self.ctx.styles.phase(phase)).to_string(),
        );
        if let Some(step) = &entity.extras.failed_step {
            self.ctx.kv("Failed step:", step);
        }
        if let Some(host) = &entity.extras.host {
            self.ctx.kv("Host:", host);
        }
        if let Some(stack) = &entity.extras.stack_id {
            self.ctx.kv("Stack:", stack);
        }
        if entity.attributes.is_empty() {
            return;
        }
        if !self.ctx.quiet {
            println!();
        }
        self.ctx.header("Attributes:");
        for (key, value) in &entity.attributes {
            self.ctx.kv(&format!("  {key}"), value);
        }
    }

    /// Render stack details after they were applied to the entity.
    pub fn render_details(&self, entity: &Entity, details: &StackDetails) {
        let state = entity
            .service_state()
            .map_or("unknown", svcmgr_common::ServiceState::as_str);
        if details.service_state() == svcmgr_common::ServiceState::Failed {
            self.ctx.warn(&format!("Stack {} ({state})", details.state));
        } else {
            self.ctx.success(&format!("Stack {} ({state})", details.state));
        }
        for out in &details.output {
            self.ctx
                .kv(&format!("  {}", out.output_key), &attribute_value(&out.output_value));
        }
    }

    /// Render a status endpoint report.
    pub fn render_state(&self, state: &RemoteState) {
        match state {
            RemoteState::NotDeployed => self.ctx.info("Stack is not deployed"),
            RemoteState::Deploying => self.ctx.info("Stack is being deployed"),
            RemoteState::Ready(details) => {
                self.ctx.success(&format!("Stack ready: {}", details.state));
                for out in &details.output {
                    self.ctx
                        .kv(&format!("  {}", out.output_key), &attribute_value(&out.output_value));
                }
            }
            RemoteState::Unknown(body) => self.ctx.warn(&format!("Unrecognised state: {body}")),
        }
    }

    /// Render the current configuration.
    pub fn render_config(&self, config: &SvcmgrConfig, path: &Path) {
        let unset = "(not set)".to_string();
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| unset.clone());

        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        println!(
            "  {:<36} {}",
            "cloud_controller.nb_api:",
            show(&config.cloud_controller.nb_api)
        );
        println!(
            "  {:<36} {}",
            "service_manager.bundle_location:",
            show(&config.service_manager.bundle_location)
        );
        println!(
            "  {:<36} {}",
            "service_manager.ssh_key_location:",
            show(&config.service_manager.ssh_key_location)
        );
        println!(
            "  {:<36} {}",
            "service_manager.design_uri:",
            show(&config.service_manager.design_uri)
        );
        println!(
            "  {:<36} {}",
            "service_manager.work_dir:",
            show(&config.service_manager.work_dir)
        );
        println!("  {:<36} {}", "timeouts.http_secs:", config.timeouts.http_secs);
        println!("  {:<36} {}", "timeouts.git_secs:", config.timeouts.git_secs);
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["SVCMGR_CONFIG", "SVCMGR_ENTITY", "RUST_LOG", "NO_COLOR"] {
            println!(
                "    {:<18} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| unset.clone())
            );
        }
        println!();
    }
}

fn phase_display(phase: LifecyclePhase) -> &'static str {
    match phase {
        LifecyclePhase::New => "new",
        LifecyclePhase::ProvisioningStarted => "provisioning",
        LifecyclePhase::Provisioned => "container provisioned",
        LifecyclePhase::CodeDistributed => "code distributed",
        LifecyclePhase::RemoteInitialized => "initialised",
        LifecyclePhase::RemoteActive => "active",
        LifecyclePhase::Disposing => "disposing",
        LifecyclePhase::Disposed => "disposed",
        LifecyclePhase::Failed => "failed",
    }
}
