//! Delivery of the rendered reminder to a Slack or Mattermost incoming webhook.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::errors::Error;

#[cfg(test)]
#[path = "chat_tests.rs"]
mod tests;

/// Name the message is posted under.
pub const DEFAULT_BOT_USERNAME: &str = "Review Bot 🧐";

/// Sends text messages to a chat channel.
#[async_trait]
pub trait ChatNotifier: Send + Sync {
    /// Posts `text` to `channel`.
    ///
    /// # Arguments
    ///
    /// * `channel` - A channel (`MyChannel`) or user (`@john`). An empty value
    ///   uses the default channel configured on the webhook.
    /// * `text` - The rendered reminder
    async fn send(&self, channel: &str, text: &str) -> Result<(), Error>;
}

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    username: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    channel: &'a str,
    text: &'a str,
}

/// Posts messages to a Slack/Mattermost compatible incoming webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    webhook_url: String,
    username: String,
}

impl WebhookNotifier {
    pub fn new(webhook_url: &str) -> Self {
        Self {
            client: Client::new(),
            webhook_url: webhook_url.to_string(),
            username: DEFAULT_BOT_USERNAME.to_string(),
        }
    }

    /// Overrides the name the message is posted under.
    pub fn with_username(mut self, username: &str) -> Self {
        self.username = username.to_string();
        self
    }
}

#[async_trait]
impl ChatNotifier for WebhookNotifier {
    #[instrument(skip(self, text))]
    async fn send(&self, channel: &str, text: &str) -> Result<(), Error> {
        let message = WebhookMessage {
            username: &self.username,
            channel,
            text,
        };

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!(
                status = status.as_u16(),
                body = body,
                "The webhook rejected the reminder"
            );
            return Err(Error::DeliveryFailed(status.as_u16(), body));
        }

        info!(channel = channel, "Delivered reminder");
        Ok(())
    }
}
