use std::path::PathBuf;

use clap::Args;
use review_bot_core::config::{IdentityKey, ReminderConfig};
use review_bot_core::registry::ReviewerRegistry;
use review_bot_core::render::MessageTemplate;
use review_bot_core::ReviewBot;
use review_bot_developer_platforms::chat::{ChatNotifier, WebhookNotifier};
use review_bot_developer_platforms::github::{create_token_client, GitHubProvider};
use review_bot_developer_platforms::gitlab::GitLabProvider;
use review_bot_developer_platforms::models::{Platform, ProjectRef};
use review_bot_developer_platforms::ReviewRequestProvider;
use tracing::{debug, info, instrument};

use crate::config::{get_config_path, AppConfig};
use crate::errors::CliError;

#[cfg(test)]
#[path = "remind_tests.rs"]
mod tests;

/// Arguments for the remind command
#[derive(Args, Debug, Default)]
pub struct RemindArgs {
    /// Host name or base URL (e.g. github.com, gitlab.com or a self-hosted GitLab)
    #[arg(long)]
    pub host: Option<String>,

    /// Platform behind the host (gitlab, github), detected from the host by default
    #[arg(long)]
    pub platform: Option<String>,

    /// Host API token
    #[arg(long, env = "REVIEW_BOT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitLab project ID or path, or GitHub repository (format: 'owner/repo')
    #[arg(short, long)]
    pub project: String,

    /// Path to the reviewers file
    #[arg(short, long)]
    pub reviewers: Option<String>,

    /// Path to the template file
    #[arg(long)]
    pub template: Option<String>,

    /// Slack or Mattermost webhook URL
    #[arg(long)]
    pub webhook: Option<String>,

    /// Channel (e.g. MyChannel) or user (e.g. @AnyUser) to post to
    #[arg(long)]
    pub channel: Option<String>,

    /// How users are matched against the reviewers file (id, username)
    #[arg(long)]
    pub identity_key: Option<String>,

    /// Only remind about requests without open discussions
    #[arg(long)]
    pub skip_open_discussions: bool,

    /// Alternate config file
    #[arg(short, long)]
    pub config: Option<String>,
}

/// Everything one reminder run needs, after merging the command line over
/// the configuration file.
#[derive(Debug, PartialEq)]
pub struct RunSettings {
    pub platform: Platform,
    pub host: String,
    pub token: String,
    pub project: ProjectRef,
    pub reviewers: PathBuf,
    pub template: Option<PathBuf>,
    pub webhook: Option<String>,
    pub channel: String,
    pub username: String,
    pub reminder: ReminderConfig,
}

impl RunSettings {
    /// Merges `args` over `config`. Command line values win.
    ///
    /// # Errors
    ///
    /// `InvalidArguments` for an unknown platform or identity key, a project
    /// reference that does not fit the platform, or a channel without a
    /// webhook.
    pub fn resolve(args: RemindArgs, config: AppConfig) -> Result<Self, CliError> {
        let host = args.host.unwrap_or(config.platform.host.clone());

        let platform = match args.platform.as_deref() {
            Some(name) => parse_platform(name)?,
            None => config
                .platform
                .kind
                .unwrap_or_else(|| crate::config::detect_platform(&host)),
        };

        let identity_key = match args.identity_key.as_deref() {
            Some(key) => key
                .parse::<IdentityKey>()
                .map_err(|e| CliError::InvalidArguments(e.to_string()))?,
            None => config
                .platform
                .identity_key
                .unwrap_or_else(|| IdentityKey::default_for(platform)),
        };

        let project = ProjectRef::parse(platform, &args.project)?;

        let webhook = args.webhook.or(config.chat.webhook);
        let channel = args.channel.or(config.chat.channel).unwrap_or_default();
        if webhook.is_none() && !channel.is_empty() {
            return Err(CliError::InvalidArguments(format!(
                "Channel '{}' given without a webhook URL",
                channel
            )));
        }

        Ok(Self {
            platform,
            host,
            token: args.token.unwrap_or_default(),
            project,
            reviewers: PathBuf::from(args.reviewers.unwrap_or(config.reminder.reviewers)),
            template: args
                .template
                .or(config.reminder.template)
                .map(PathBuf::from),
            webhook,
            channel,
            username: config.chat.username,
            reminder: ReminderConfig {
                identity_key,
                skip_open_discussions: args.skip_open_discussions
                    || config.reminder.skip_open_discussions,
            },
        })
    }
}

fn parse_platform(name: &str) -> Result<Platform, CliError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "gitlab" => Ok(Platform::GitLab),
        "github" => Ok(Platform::GitHub),
        other => Err(CliError::InvalidArguments(format!(
            "Unknown platform '{}', expected 'gitlab' or 'github'",
            other
        ))),
    }
}

/// Loads the configuration file, if there is one.
///
/// An explicitly named file has to exist. Without a name the default file in
/// the current directory is used when present.
fn load_config(path: Option<&str>) -> Result<AppConfig, CliError> {
    let config_path = get_config_path(path);

    if path.is_none() && !config_path.exists() {
        debug!("No configuration file at {:?}, using defaults", config_path);
        return Ok(AppConfig::default());
    }

    Ok(AppConfig::load(&config_path)?)
}

/// Execute the remind command
///
/// Prints the reminder to stdout and posts it to the webhook when one is
/// configured. Nothing is printed or posted when there is nothing to remind
/// about.
#[instrument(skip(args))]
pub async fn execute(args: RemindArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let settings = RunSettings::resolve(args, config)?;

    info!(
        platform = %settings.platform,
        host = settings.host.as_str(),
        project = %settings.project,
        "Collecting reminders"
    );

    let registry = ReviewerRegistry::load(&settings.reviewers)?;
    let template = match &settings.template {
        Some(path) => MessageTemplate::load(path, settings.platform)?,
        None => MessageTemplate::default_for(settings.platform),
    };

    let message = match settings.platform {
        Platform::GitLab => {
            let provider = GitLabProvider::new(&settings.host, &settings.token)?;
            remind(provider, registry, template, &settings).await?
        }
        Platform::GitHub => {
            let client = create_token_client(&settings.host, &settings.token)?;
            remind(GitHubProvider::new(client), registry, template, &settings).await?
        }
    };

    let Some(message) = message else {
        info!(project = %settings.project, "Nothing to remind about");
        return Ok(());
    };

    println!("{}", message);

    if let Some(webhook) = &settings.webhook {
        let notifier = WebhookNotifier::new(webhook).with_username(&settings.username);
        deliver(&notifier, &settings.channel, &message).await?;
    }

    Ok(())
}

async fn remind<P: ReviewRequestProvider + std::fmt::Debug>(
    provider: P,
    registry: ReviewerRegistry,
    template: MessageTemplate,
    settings: &RunSettings,
) -> Result<Option<String>, CliError> {
    let bot = ReviewBot::with_config(provider, registry, settings.reminder).with_template(template);
    Ok(bot.remind(&settings.project).await?)
}

async fn deliver<N: ChatNotifier>(notifier: &N, channel: &str, message: &str) -> Result<(), CliError> {
    notifier.send(channel, message).await?;
    info!(channel = channel, "Reminder delivered");
    Ok(())
}
