//! # Models
//!
//! Platform-agnostic data models shared by the hosting adapters and the
//! aggregation engine.
//!
//! GitLab merge requests and GitHub pull requests are both represented as a
//! [`ReviewRequest`]. Award emoji and formal reviews are both represented as an
//! [`AcknowledgmentSignal`]. All values are built fresh on every run and are
//! never persisted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// The hosting platform a provider talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    GitLab,
    GitHub,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::GitLab => write!(f, "gitlab"),
            Platform::GitHub => write!(f, "github"),
        }
    }
}

/// Identifies the project or repository to poll.
///
/// GitLab accepts either the numeric project ID or the full namespace path.
/// GitHub always needs an owner and a repository name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectRef {
    /// Numeric GitLab project ID
    Id(u64),

    /// GitLab namespace path, e.g. `group/subgroup/project`
    Path(String),

    /// GitHub repository
    Repository { owner: String, name: String },
}

impl ProjectRef {
    /// Parses a command line project reference for the given platform.
    ///
    /// # Examples
    ///
    /// ```
    /// use review_bot_developer_platforms::models::{Platform, ProjectRef};
    ///
    /// assert_eq!(
    ///     ProjectRef::parse(Platform::GitLab, "2009901").unwrap(),
    ///     ProjectRef::Id(2009901)
    /// );
    /// assert_eq!(
    ///     ProjectRef::parse(Platform::GitHub, "sj14/review-bot").unwrap(),
    ///     ProjectRef::Repository { owner: "sj14".to_string(), name: "review-bot".to_string() }
    /// );
    /// ```
    pub fn parse(platform: Platform, value: &str) -> Result<Self, Error> {
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::InvalidProjectRef("empty project reference".to_string()));
        }

        match platform {
            Platform::GitLab => match value.parse::<u64>() {
                Ok(0) => Err(Error::InvalidProjectRef(value.to_string())),
                Ok(id) => Ok(ProjectRef::Id(id)),
                Err(_) => Ok(ProjectRef::Path(value.trim_matches('/').to_string())),
            },
            Platform::GitHub => match value.split_once('/') {
                Some((owner, name))
                    if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
                {
                    Ok(ProjectRef::Repository {
                        owner: owner.to_string(),
                        name: name.to_string(),
                    })
                }
                _ => Err(Error::InvalidProjectRef(format!(
                    "'{}' is not in the 'owner/repo' format",
                    value
                ))),
            },
        }
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectRef::Id(id) => write!(f, "{}", id),
            ProjectRef::Path(path) => write!(f, "{}", path),
            ProjectRef::Repository { owner, name } => write!(f, "{}/{}", owner, name),
        }
    }
}

/// Display information about the polled project or repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// The project name
    pub name: String,

    /// Link to the project in the web UI
    pub web_url: String,

    /// Project avatar, if the platform has one
    pub avatar_url: Option<String>,
}

/// A user on the hosting platform.
///
/// GitHub does not report display names on pull request payloads, so the
/// GitHub adapter copies the login into `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Numeric user ID
    pub id: u64,

    /// Login name
    pub username: String,

    /// Human readable name
    pub name: String,
}

impl User {
    /// The label shown when the user has no registry entry.
    pub fn display_label(&self) -> &str {
        if self.name.is_empty() {
            &self.username
        } else {
            &self.name
        }
    }
}

/// A merge request (GitLab) or pull request (GitHub).
///
/// # Examples
///
/// ```
/// use review_bot_developer_platforms::models::{ReviewRequest, User};
///
/// let request = ReviewRequest {
///     id: 7,
///     title: "Add review reminders".to_string(),
///     url: "https://gitlab.com/group/project/-/merge_requests/7".to_string(),
///     draft: false,
///     author: User { id: 3, username: "john".to_string(), name: "John Doe".to_string() },
///     assignee: None,
///     requested_reviewers: vec![],
/// };
/// assert!(!request.draft);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// Merge request IID or pull request number, unique within the project
    pub id: u64,

    /// The title of the request
    pub title: String,

    /// Link to the request in the web UI
    pub url: String,

    /// Draft or work-in-progress requests are never reminded about
    pub draft: bool,

    /// The user who opened the request
    pub author: User,

    /// The assigned user, if any
    pub assignee: Option<User>,

    /// Reviewers the platform reports as explicitly requested
    pub requested_reviewers: Vec<User>,
}

/// The state of a formal review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    Other(String),
}

impl ReviewState {
    /// Parses the state string used by the GitHub REST API.
    pub fn from_api(state: &str) -> Self {
        match state {
            "APPROVED" => ReviewState::Approved,
            "CHANGES_REQUESTED" => ReviewState::ChangesRequested,
            "COMMENTED" => ReviewState::Commented,
            "DISMISSED" => ReviewState::Dismissed,
            "PENDING" => ReviewState::Pending,
            other => ReviewState::Other(other.to_string()),
        }
    }
}

/// A signal that somebody looked at a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcknowledgmentSignal {
    /// An emoji reaction, named as the platform reports it
    Reaction { name: String, user: User },

    /// A formal review
    Review { state: ReviewState, user: User },
}

impl AcknowledgmentSignal {
    /// The user who produced the signal.
    pub fn user(&self) -> &User {
        match self {
            AcknowledgmentSignal::Reaction { user, .. } => user,
            AcknowledgmentSignal::Review { user, .. } => user,
        }
    }
}

/// A note inside a discussion thread.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Whether the note can be resolved at all
    pub resolvable: bool,

    /// Whether the note has been resolved
    pub resolved: bool,
}

/// A discussion thread on a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discussion {
    /// The platform ID of the thread
    pub id: String,

    /// The notes in the thread, in posting order
    pub notes: Vec<Note>,
}
