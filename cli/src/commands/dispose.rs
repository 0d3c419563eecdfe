//! `svcmgr dispose`: tear down the recorded service instance.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::EntityStore;
use crate::application::services::lifecycle::AppNaming;
use crate::commands::{CredentialArgs, load_entity, orchestrator};
use crate::output::reporter::{SilentReporter, TerminalReporter};

/// Arguments for the dispose command.
#[derive(Args, Debug)]
pub struct DisposeArgs {
    #[command(flatten)]
    pub creds: CredentialArgs,
}

/// Run `svcmgr dispose`.
///
/// # Errors
///
/// Returns an error if no entity is recorded or any dispose step fails.
pub async fn run(app: &AppContext, args: &DisposeArgs) -> Result<ExitCode> {
    let mut entity = load_entity(app).await?;

    if !app.output.quiet && !app.is_json() {
        println!();
        println!("This will dispose {} and release its container.", entity.identifier);
        println!();
    }
    if !(app.non_interactive || app.confirm("Continue?", false)?) {
        if !app.is_json() {
            println!("Cancelled.");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let orchestrator = orchestrator(app, AppNaming::Random).await?;
    let creds = args.creds.credentials();
    let result = if app.is_json() {
        orchestrator.dispose(&mut entity, &creds, &SilentReporter).await
    } else {
        orchestrator
            .dispose(&mut entity, &creds, &TerminalReporter::new(&app.output))
            .await
    };
    app.entity_store.save_async(&entity).await?;
    result?;

    app.renderer().render_entity(&entity)?;
    Ok(ExitCode::SUCCESS)
}
