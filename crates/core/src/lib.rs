//! # Review Bot Core
//!
//! Core business logic for reminding reviewers about open merge requests and
//! pull requests.
//!
//! For every open, non-draft request of a project the bot works out:
//! - which registered reviewers have not responded yet
//! - how many discussions are still open
//! - who is responsible for the request
//! - which reactions the request received
//!
//! and renders the result as one Markdown message.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use review_bot_core::{registry::ReviewerRegistry, ReviewBot};
//! use review_bot_developer_platforms::models::ProjectRef;
//! use review_bot_developer_platforms::ReviewRequestProvider;
//! use anyhow::Result;
//!
//! async fn remind<P: ReviewRequestProvider + std::fmt::Debug>(provider: P) -> Result<()> {
//!     let registry = ReviewerRegistry::from_json(r#"{"3": "@john", "5": "@max"}"#)?;
//!     let bot = ReviewBot::new(provider, registry);
//!
//!     match bot.remind(&ProjectRef::Id(42)).await? {
//!         Some(message) => println!("{}", message),
//!         None => println!("Nothing to remind about"),
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;

use review_bot_developer_platforms::models::{Project, ProjectRef, ReviewRequest};
use review_bot_developer_platforms::ReviewRequestProvider;
use tracing::{debug, info, instrument};

pub mod config;
use config::{AcknowledgmentPolicy, ReminderConfig};

pub mod errors;
use errors::ReviewBotError;

pub mod registry;
use registry::ReviewerRegistry;

pub mod render;
use render::MessageTemplate;

pub mod review;
use review::{acknowledgment, discussions, identity, missing, reactions};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// The review state of one open request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    /// The request the reminder is about
    pub request: ReviewRequest,

    /// Chat names of the reviewers who have not responded yet
    pub missing_reviewers: Vec<String>,

    /// Number of open discussions, or comments on platforms without
    /// resolvable discussions
    pub open_discussions: usize,

    /// Chat name of the person who has to act once everyone has reviewed
    pub responsible_person: String,

    /// Reaction name to number of times it was given
    pub reactions: BTreeMap<String, usize>,
}

/// Main struct for collecting and rendering review reminders.
///
/// `ReviewBot` pulls the open requests of a project from a
/// [`ReviewRequestProvider`], derives a [`Reminder`] for each of them and
/// renders the reminders with a [`MessageTemplate`].
///
/// Requests are processed one at a time, in the order the provider returns
/// them. Any provider failure aborts the whole run.
#[derive(Debug)]
pub struct ReviewBot<P: ReviewRequestProvider + std::fmt::Debug> {
    provider: P,
    registry: ReviewerRegistry,
    config: ReminderConfig,
    template: MessageTemplate,
}

impl<P: ReviewRequestProvider + std::fmt::Debug> ReviewBot<P> {
    /// Creates a new `ReviewBot` with the default settings and template for
    /// the provider's platform.
    pub fn new(provider: P, registry: ReviewerRegistry) -> Self {
        let platform = provider.platform();
        Self {
            provider,
            registry,
            config: ReminderConfig::for_platform(platform),
            template: MessageTemplate::default_for(platform),
        }
    }

    /// Creates a new `ReviewBot` with custom settings.
    pub fn with_config(provider: P, registry: ReviewerRegistry, config: ReminderConfig) -> Self {
        let template = MessageTemplate::default_for(provider.platform());
        Self {
            provider,
            registry,
            config,
            template,
        }
    }

    /// Replaces the message template.
    pub fn with_template(mut self, template: MessageTemplate) -> Self {
        self.template = template;
        self
    }

    fn policy(&self) -> AcknowledgmentPolicy {
        AcknowledgmentPolicy::for_platform(self.provider.platform())
    }

    /// Collects the reminders for every open, non-draft request of `project`.
    ///
    /// Draft requests are skipped before any of their signals are fetched.
    /// With `skip_open_discussions` set, requests that still have open
    /// discussions are left out as well.
    ///
    /// # Errors
    ///
    /// Returns `GitProviderError` as soon as any provider call fails. No
    /// partial result is returned.
    #[instrument(skip(self), fields(project = %project))]
    pub async fn aggregate(
        &self,
        project: &ProjectRef,
    ) -> Result<(Project, Vec<Reminder>), ReviewBotError> {
        let descriptor = self.provider.fetch_project_info(project).await?;
        let requests = self.provider.fetch_open_requests(project).await?;

        info!(
            project = %project,
            requests = requests.len(),
            "Fetched open requests"
        );

        let mut reminders = Vec::new();
        for request in requests {
            if request.draft {
                debug!(request = request.id, "Skipping draft request");
                continue;
            }

            let reminder = self.build_reminder(project, request).await?;

            if self.config.skip_open_discussions && reminder.open_discussions > 0 {
                debug!(
                    request = reminder.request.id,
                    open_discussions = reminder.open_discussions,
                    "Skipping request with open discussions"
                );
                continue;
            }

            reminders.push(reminder);
        }

        info!(
            project = %project,
            reminders = reminders.len(),
            "Aggregated reminders"
        );

        Ok((descriptor, reminders))
    }

    async fn build_reminder(
        &self,
        project: &ProjectRef,
        request: ReviewRequest,
    ) -> Result<Reminder, ReviewBotError> {
        let policy = self.policy();
        let identity_key = self.config.identity_key;

        let signals = self
            .provider
            .fetch_acknowledgment_signals(project, &request)
            .await?;
        let acknowledged =
            acknowledgment::acknowledged_identities(&request, &signals, policy, identity_key);

        let missing_reviewers = match policy {
            AcknowledgmentPolicy::ReactionBased => {
                missing::missing_from_registry(&acknowledged, &self.registry)
            }
            AcknowledgmentPolicy::ReviewStateBased => missing::missing_requested_reviewers(
                &request.requested_reviewers,
                &acknowledged,
                &self.registry,
                identity_key,
            ),
        };

        let threads = self.provider.fetch_discussions(project, &request).await?;
        let open_discussions = discussions::count_discussions(policy, &threads);

        let responsible_person =
            identity::resolve_responsible(&request, &self.registry, identity_key);
        let reactions = reactions::aggregate_reactions(&signals);

        debug!(
            request = request.id,
            missing = missing_reviewers.len(),
            open_discussions = open_discussions,
            responsible = responsible_person.as_str(),
            "Built reminder"
        );

        Ok(Reminder {
            request,
            missing_reviewers,
            open_discussions,
            responsible_person,
            reactions,
        })
    }

    /// Aggregates the reminders of `project` and renders them.
    ///
    /// Returns `None` when there is nothing to remind about, so no header-only
    /// message is ever sent.
    #[instrument(skip(self), fields(project = %project))]
    pub async fn remind(&self, project: &ProjectRef) -> Result<Option<String>, ReviewBotError> {
        let (descriptor, reminders) = self.aggregate(project).await?;

        if reminders.is_empty() {
            info!(project = %project, "No reminders, nothing to send");
            return Ok(None);
        }

        Ok(Some(self.template.render(&descriptor, &reminders)))
    }
}
