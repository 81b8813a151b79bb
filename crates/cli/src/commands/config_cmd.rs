use std::path::Path;

use clap::Subcommand;
use review_bot_core::registry::ReviewerRegistry;
use review_bot_core::render::MessageTemplate;
use tracing::debug;

use crate::config::{get_config_path, AppConfig};
use crate::errors::CliError;

#[cfg(test)]
#[path = "config_cmd_tests.rs"]
mod tests;

/// Subcommands for the config command
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Create initial configuration file
    Init {
        /// Path to save the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Check the configuration file and the files it points to
    Validate {
        /// Path to the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },
}

/// Execute the config command
pub async fn execute(cmd: ConfigCommands) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Init { path } => init_config(path.as_deref()),
        ConfigCommands::Validate { path } => validate_config(path.as_deref()),
    }
}

/// Initialize a new configuration file
fn init_config(path: Option<&str>) -> Result<(), CliError> {
    let config_path = get_config_path(path);
    debug!("Initializing configuration at {:?}", config_path);

    if config_path.exists() {
        return Err(CliError::ConfigError(format!(
            "Configuration file already exists at {:?}",
            config_path
        )));
    }

    let config = AppConfig::default();
    config.save(&config_path)?;

    println!("Configuration initialized at {:?}", config_path);
    Ok(())
}

/// Validate a configuration file
///
/// Relative reviewer and template paths are resolved against the current
/// directory, the same way a reminder run resolves them.
fn validate_config(path: Option<&str>) -> Result<(), CliError> {
    let config_path = get_config_path(path);
    debug!("Validating configuration at {:?}", config_path);

    let config = AppConfig::load(&config_path)?;
    let platform = config.platform.platform();

    let registry = ReviewerRegistry::load(Path::new(&config.reminder.reviewers))?;
    if registry.is_empty() {
        println!(
            "Warning: no reviewers in {}, nobody will be reminded",
            config.reminder.reviewers
        );
    }

    if let Some(template) = &config.reminder.template {
        MessageTemplate::load(Path::new(template), platform)?;
    }

    println!("Configuration is valid");
    Ok(())
}
