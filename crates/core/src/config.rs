//! Configuration settings for the review reminder engine.
//!
//! This module centralizes the acknowledgment vocabulary and the per-run
//! settings that decide how platform users are matched against the reviewer
//! registry.

use std::fmt;
use std::str::FromStr;

use review_bot_developer_platforms::models::{Platform, User};
use serde::{Deserialize, Serialize};

use crate::errors::ReviewBotError;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Reactions that mark a merge request as handled by the reacting user.
///
/// `thumbsup` and `thumbsdown` mean the user reviewed the merge request,
/// `sleeping` means the user does not want to be reminded about it. Names are
/// the bare tokens GitLab reports; colon-wrapped forms such as `:thumbsup:`
/// never match.
pub const ACKNOWLEDGING_REACTIONS: [&str; 3] = ["thumbsup", "thumbsdown", "sleeping"];

/// How a platform user is turned into a reviewer registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityKey {
    /// The numeric user ID, e.g. `"3"`
    #[serde(rename = "id")]
    UserId,

    /// The login name, e.g. `"john.doe"`
    #[serde(rename = "username")]
    Username,
}

impl IdentityKey {
    /// The key used by default for a platform.
    ///
    /// GitLab reviewer files have historically been keyed by user ID, GitHub
    /// ones by login.
    pub fn default_for(platform: Platform) -> Self {
        match platform {
            Platform::GitLab => IdentityKey::UserId,
            Platform::GitHub => IdentityKey::Username,
        }
    }

    /// The registry key of `user`, or `None` when the platform left the
    /// identity empty (an unset assignee, for example).
    ///
    /// # Examples
    ///
    /// ```
    /// use review_bot_core::config::IdentityKey;
    /// use review_bot_developer_platforms::models::User;
    ///
    /// let user = User { id: 3, username: "john".to_string(), name: "John".to_string() };
    /// assert_eq!(IdentityKey::UserId.key_for(&user).as_deref(), Some("3"));
    /// assert_eq!(IdentityKey::Username.key_for(&user).as_deref(), Some("john"));
    /// assert_eq!(IdentityKey::UserId.key_for(&User::default()), None);
    /// ```
    pub fn key_for(&self, user: &User) -> Option<String> {
        match self {
            IdentityKey::UserId if user.id != 0 => Some(user.id.to_string()),
            IdentityKey::Username if !user.username.is_empty() => Some(user.username.clone()),
            _ => None,
        }
    }
}

impl FromStr for IdentityKey {
    type Err = ReviewBotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" | "user-id" | "user_id" => Ok(IdentityKey::UserId),
            "username" | "login" => Ok(IdentityKey::Username),
            other => Err(ReviewBotError::ConfigError(format!(
                "Unknown identity key '{}', expected 'id' or 'username'",
                other
            ))),
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityKey::UserId => write!(f, "id"),
            IdentityKey::Username => write!(f, "username"),
        }
    }
}

/// Which platform signals count as an acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcknowledgmentPolicy {
    /// GitLab: a `thumbsup`, `thumbsdown` or `sleeping` award emoji.
    /// Every registered reviewer is expected to react.
    ReactionBased,

    /// GitHub: an `APPROVED` or `DISMISSED` review. Only the reviewers the
    /// platform reports as requested are expected to review.
    ReviewStateBased,
}

impl AcknowledgmentPolicy {
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::GitLab => AcknowledgmentPolicy::ReactionBased,
            Platform::GitHub => AcknowledgmentPolicy::ReviewStateBased,
        }
    }
}

/// Settings for one reminder run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderConfig {
    /// How platform users are matched against the reviewer registry
    pub identity_key: IdentityKey,

    /// Leave out requests that still have open discussions
    pub skip_open_discussions: bool,
}

impl ReminderConfig {
    /// The default settings for a platform.
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            identity_key: IdentityKey::default_for(platform),
            skip_open_discussions: false,
        }
    }
}
