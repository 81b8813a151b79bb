use std::{
    fs,
    path::{Path, PathBuf},
};

use review_bot_core::{config::IdentityKey, errors::ReviewBotError};
use review_bot_developer_platforms::{chat::DEFAULT_BOT_USERNAME, models::Platform};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = ".review-bot.toml";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Configuration for the review bot CLI
///
/// Every value can be overridden on the command line.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the merge requests or pull requests live
    #[serde(default)]
    pub platform: PlatformConfig,

    /// What goes into the reminder
    #[serde(default)]
    pub reminder: ReminderSettings,

    /// Where the reminder is posted
    #[serde(default)]
    pub chat: ChatConfig,
}

impl AppConfig {
    /// Load configuration from the specified file
    pub fn load(path: &Path) -> Result<Self, ReviewBotError> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(ReviewBotError::ConfigError(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ReviewBotError::ConfigError(format!("Failed to read configuration file: {}", e))
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            ReviewBotError::ConfigError(format!("Failed to parse configuration file: {}", e))
        })?;

        Ok(config)
    }

    /// Save configuration to the specified file
    pub fn save(&self, path: &Path) -> Result<(), ReviewBotError> {
        debug!("Saving configuration to {:?}", path);

        let content = toml::to_string_pretty(self).map_err(|e| {
            ReviewBotError::ConfigError(format!("Failed to serialize configuration: {}", e))
        })?;

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ReviewBotError::ConfigError(format!("Failed to create directory: {}", e))
            })?;
        }

        fs::write(path, content).map_err(|e| {
            ReviewBotError::ConfigError(format!("Failed to write configuration file: {}", e))
        })?;

        info!("Configuration saved to {:?}", path);
        Ok(())
    }
}

/// Hosting platform settings
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Host name or base URL, e.g. `gitlab.com` or `github.com`
    #[serde(default = "PlatformConfig::default_host")]
    pub host: String,

    /// The platform behind `host`. Detected from the host when left out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Platform>,

    /// How users are matched against the reviewers file. Defaults to `id`
    /// on GitLab and `username` on GitHub.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_key: Option<IdentityKey>,
}

impl PlatformConfig {
    fn default_host() -> String {
        "gitlab.com".to_string()
    }

    /// The platform to talk to, falling back to detection from the host.
    pub fn platform(&self) -> Platform {
        self.kind.unwrap_or_else(|| detect_platform(&self.host))
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            host: PlatformConfig::default_host(),
            kind: None,
            identity_key: None,
        }
    }
}

/// Reminder content settings
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ReminderSettings {
    /// Path to the JSON reviewers file
    #[serde(default = "ReminderSettings::default_reviewers")]
    pub reviewers: String,

    /// Path to a TOML message template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Only remind about requests without open discussions
    #[serde(default)]
    pub skip_open_discussions: bool,
}

impl ReminderSettings {
    fn default_reviewers() -> String {
        "reviewers.json".to_string()
    }
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            reviewers: ReminderSettings::default_reviewers(),
            template: None,
            skip_open_discussions: false,
        }
    }
}

/// Chat delivery settings
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Slack or Mattermost incoming webhook URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook: Option<String>,

    /// Channel (`MyChannel`) or user (`@john`) to post to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    /// Name the reminder is posted under
    #[serde(default = "ChatConfig::default_username")]
    pub username: String,
}

impl ChatConfig {
    fn default_username() -> String {
        DEFAULT_BOT_USERNAME.to_string()
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            webhook: None,
            channel: None,
            username: ChatConfig::default_username(),
        }
    }
}

/// Guesses the platform from a host name or base URL.
///
/// `github.com` and `api.github.com` are GitHub, everything else is treated
/// as a (possibly self-hosted) GitLab.
pub fn detect_platform(host: &str) -> Platform {
    let host = host
        .split("://")
        .last()
        .unwrap_or(host)
        .trim_end_matches('/');

    match host {
        "github.com" | "api.github.com" => Platform::GitHub,
        _ => Platform::GitLab,
    }
}

/// Get the path to the configuration file
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        // Look for config in current directory
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        current_dir.join(DEFAULT_CONFIG_FILENAME)
    }
}
