//! svcmgr - deploy and manage service orchestrator instances

use std::process::ExitCode;

use clap::Parser;
use svcmgr_cli::cli::Cli;
use svcmgr_cli::domain::LifecycleError;
use svcmgr_cli::output::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let as_json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            report(&e, as_json);
            ExitCode::FAILURE
        }
    }
}

fn report(err: &anyhow::Error, as_json: bool) {
    if as_json {
        let code = err
            .downcast_ref::<LifecycleError>()
            .map_or("error", LifecycleError::code);
        if let Ok(doc) = json::format_error(&format!("{err:#}"), code) {
            println!("{doc}");
            return;
        }
    }
    eprintln!("Error: {err:#}");
}
