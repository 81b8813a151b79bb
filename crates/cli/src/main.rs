//! # Review Bot CLI
//!
//! Command-line interface for reminding reviewers about open merge requests
//! and pull requests.
//!
//! The reminder is printed to stdout and, when a webhook is configured,
//! posted to a Slack or Mattermost channel. Logs go to stderr.
//!
//! # Commands
//!
//! - `remind` - Collect the open requests of a project and post the reminder
//! - `config` - Manage configuration files
//!
//! # Examples
//!
//! ```bash
//! # Remind the reviewers of a GitLab project
//! review-bot remind --host gitlab.com --token <token> --project 2009901 \
//!     --reviewers reviewers.json --webhook <url> --channel reviews
//!
//! # Remind the reviewers of a GitHub repository
//! review-bot remind --host github.com --project sj14/review-bot
//!
//! # Initialize configuration
//! review-bot config init
//! ```

#![deny(missing_docs)]

use std::process::{ExitCode, Termination};

use clap::{Parser, Subcommand};
use tracing::{error, info, instrument};

/// Command implementations for the CLI.
mod commands;

/// Configuration management for the CLI.
mod config;

/// Error types specific to the CLI.
mod errors;

use commands::{config_cmd::ConfigCommands, remind::RemindArgs};
use errors::CliError;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter, e.g. `review_bot_core=trace`
const LOG_ENV_VAR: &str = "REVIEW_BOT_LOG";

/// Command-line interface structure for the review bot.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available commands for the review bot CLI.
#[derive(Subcommand)]
enum Commands {
    /// Post a review reminder for a project
    Remind(RemindArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Sets up logging to stderr.
///
/// The filter is read from `REVIEW_BOT_LOG` and defaults to warnings only.
/// `--verbose` raises it to debug.
fn init_logging(verbose: bool) {
    let mut filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    if verbose {
        filter = filter.add_directive(LevelFilter::DEBUG.into());
    }

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Runs the selected command.
#[instrument(skip(cli))]
async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Remind(args) => {
            if let Err(e) = commands::remind::execute(args).await {
                error!("Error sending the reminder: {}", e);
                return Err(e);
            }
        }
        Commands::Config(cmd) => {
            if let Err(e) = commands::config_cmd::execute(cmd).await {
                error!("Error executing config command: {}", e);
                return Err(e);
            }
        }
    }

    Ok(())
}

/// Main entry point for the review bot CLI.
///
/// Exits with 2 on configuration errors, 3 on authentication errors, 4 on
/// network errors and 5 on invalid arguments.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            e.report()
        }
    }
}
