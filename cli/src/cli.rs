//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Deploy and manage service orchestrator instances
#[derive(Parser)]
#[command(
    name = "svcmgr",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Entity record file
    #[arg(long, global = true, env = "SVCMGR_ENTITY")]
    pub entity: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Provision, push and start a service instance
    Deploy(commands::deploy::DeployArgs),

    /// Dispose the service instance and release its container
    Dispose(commands::dispose::DisposeArgs),

    /// Fetch stack details and update the recorded instance
    Details(commands::details::QueryArgs),

    /// Ask the running instance for its state
    State(commands::details::QueryArgs),

    /// Show the recorded instance
    Show,

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),
}

impl Cli {
    /// Default log filter for the given `-v` count.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            entity,
            command,
            ..
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags {
                yes,
                entity_path: entity,
            },
        })?;

        match command {
            Command::Deploy(args) => commands::deploy::run(&app, &args).await,
            Command::Dispose(args) => commands::dispose::run(&app, &args).await,
            Command::Details(args) => commands::details::run_details(&app, &args).await,
            Command::State(args) => commands::details::run_state(&app, &args).await,
            Command::Show => commands::show::run(&app).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
        }
    }
}
