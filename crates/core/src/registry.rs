//! # Reviewer Registry
//!
//! Maps platform identities to the names reviewers go by in chat.
//!
//! The registry is loaded from a flat JSON object once per run:
//!
//! ```json
//! {"3": "@john.doe", "5": "@max"}
//! ```
//!
//! Keys are GitLab user IDs or GitHub/GitLab logins, depending on the
//! configured [`IdentityKey`](crate::config::IdentityKey).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::errors::ReviewBotError;

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

/// Platform identity to chat display name mapping.
///
/// Iteration is ordered by key, which keeps the rendered reminder stable
/// between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewerRegistry {
    reviewers: BTreeMap<String, String>,
}

impl ReviewerRegistry {
    /// Parses a registry from a JSON object of string pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use review_bot_core::registry::ReviewerRegistry;
    ///
    /// let registry = ReviewerRegistry::from_json(r#"{"42": "Spidy"}"#).unwrap();
    /// assert_eq!(registry.get("42"), Some("Spidy"));
    /// assert_eq!(registry.get("7"), None);
    /// ```
    pub fn from_json(content: &str) -> Result<Self, ReviewBotError> {
        let reviewers: BTreeMap<String, String> = serde_json::from_str(content).map_err(|e| {
            ReviewBotError::ConfigError(format!("Failed to parse reviewers: {}", e))
        })?;

        Ok(Self { reviewers })
    }

    /// Loads a registry from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ReviewBotError> {
        debug!("Loading reviewers from {:?}", path);

        let content = fs::read_to_string(path).map_err(|e| {
            ReviewBotError::ConfigError(format!(
                "Failed to read reviewers file {:?}: {}",
                path, e
            ))
        })?;

        let registry = Self::from_json(&content)?;
        debug!(reviewers = registry.len(), "Loaded reviewers");
        Ok(registry)
    }

    /// The display name registered for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.reviewers.get(key).map(String::as_str)
    }

    /// All `(key, display name)` pairs, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.reviewers
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.reviewers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviewers.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ReviewerRegistry {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            reviewers: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
