use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    errors::Error,
    models::{
        AcknowledgmentSignal, Discussion, Note, Platform, Project, ProjectRef, ReviewRequest,
        ReviewState, User,
    },
    ReviewRequestProvider,
};

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;

/// Number of items requested per page.
const PAGE_SIZE: u8 = 100;

#[derive(Debug, Serialize)]
struct ListParams {
    per_page: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'static str>,
}

#[derive(Debug, Clone, Deserialize)]
struct GitHubUser {
    id: u64,
    login: String,
}

impl From<GitHubUser> for User {
    fn from(u: GitHubUser) -> Self {
        User {
            id: u.id,
            name: u.login.clone(),
            username: u.login,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitHubOwner {
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubRepository {
    name: String,
    html_url: String,
    owner: Option<GitHubOwner>,
}

#[derive(Debug, Deserialize)]
struct GitHubPullRequest {
    number: u64,
    title: Option<String>,
    html_url: Option<String>,
    draft: Option<bool>,
    user: Option<GitHubUser>,
    assignee: Option<GitHubUser>,
    requested_reviewers: Option<Vec<GitHubUser>>,
}

impl From<GitHubPullRequest> for ReviewRequest {
    fn from(pr: GitHubPullRequest) -> Self {
        ReviewRequest {
            id: pr.number,
            title: pr.title.unwrap_or_default(),
            url: pr.html_url.unwrap_or_default(),
            draft: pr.draft.unwrap_or_default(),
            author: pr.user.map(User::from).unwrap_or_default(),
            assignee: pr.assignee.map(User::from),
            requested_reviewers: pr
                .requested_reviewers
                .unwrap_or_default()
                .into_iter()
                .map(User::from)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitHubReview {
    user: Option<GitHubUser>,
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubReaction {
    content: String,
    user: Option<GitHubUser>,
}

#[derive(Debug, Deserialize)]
struct GitHubComment {
    id: u64,
}

/// Creates an `Octocrab` client for GitHub or a GitHub Enterprise server.
///
/// # Arguments
///
/// * `host` - `github.com`, an Enterprise host name (reached at
///   `https://{host}/api/v3`), or a full API base URL
/// * `token` - A personal access token. An empty token creates an
///   anonymous client, which only sees public repositories.
///
/// # Errors
///
/// Returns `Error::Transport` if the base URL is invalid or the client
/// cannot be built.
#[instrument(skip(token))]
pub fn create_token_client(host: &str, token: &str) -> Result<Octocrab, Error> {
    let mut builder = Octocrab::builder();
    if !token.is_empty() {
        builder = builder.personal_token(token.to_string());
    }

    let host = host.trim_end_matches('/');
    if host != "github.com" && host != "api.github.com" {
        let base_uri = if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{}/api/v3", host)
        };
        builder = builder
            .base_uri(base_uri)
            .map_err(|e| Error::Transport(format!("Invalid GitHub base URL: {}", e)))?;
    }

    builder
        .build()
        .map_err(|e| Error::Transport(format!("Failed to build GitHub client: {}", e)))
}

fn log_octocrab_error(message: &str, e: &octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, .. } => error!(
            error_message = source.message,
            status = source.status_code.as_u16(),
            "{}. Received an error from GitHub",
            message
        ),
        octocrab::Error::UriParse { source, .. } => error!(
            error_message = source.to_string(),
            "{}. Failed to parse URI.",
            message
        ),
        octocrab::Error::Uri { source, .. } => error!(
            error_message = source.to_string(),
            "{}, Failed to parse URI.",
            message
        ),
        octocrab::Error::InvalidUtf8 { source, .. } => error!(
            error_message = source.to_string(),
            "{}. The message wasn't valid UTF-8.",
            message,
        ),
        _ => error!(error_message = e.to_string(), message),
    };
}

fn map_octocrab_error(route: &str, e: octocrab::Error) -> Error {
    match e {
        octocrab::Error::GitHub { source, .. } => {
            Error::from_status(source.status_code.as_u16(), route)
        }
        octocrab::Error::Serde { .. } | octocrab::Error::Json { .. } => Error::InvalidResponse,
        other => Error::Transport(other.to_string()),
    }
}

/// Provider backed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubProvider {
    client: Octocrab,
}

impl GitHubProvider {
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }

    fn repository(project: &ProjectRef) -> Result<(&str, &str), Error> {
        match project {
            ProjectRef::Repository { owner, name } => Ok((owner.as_str(), name.as_str())),
            _ => Err(Error::InvalidProjectRef(format!(
                "'{}' is not a GitHub repository (use 'owner/repo')",
                project
            ))),
        }
    }

    /// Fetches every page of a list endpoint, following the `Link` header.
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        route: &str,
        state: Option<&'static str>,
    ) -> Result<Vec<T>, Error> {
        let params = ListParams {
            per_page: PAGE_SIZE,
            state,
        };

        let mut current_page: Page<T> = match self.client.get(route, Some(&params)).await {
            Ok(p) => p,
            Err(e) => {
                log_octocrab_error("Failed to list items", &e);
                return Err(map_octocrab_error(route, e));
            }
        };

        let mut items = current_page.take_items();
        loop {
            let next = match self.client.get_page::<T>(&current_page.next).await {
                Ok(next) => next,
                Err(e) => {
                    log_octocrab_error("Failed to load the next page", &e);
                    return Err(map_octocrab_error(route, e));
                }
            };

            match next {
                Some(mut new_page) => {
                    items.extend(new_page.take_items());
                    current_page = new_page;
                }
                None => break,
            }
        }

        debug!(route = route, count = items.len(), "Fetched all pages");
        Ok(items)
    }
}

#[async_trait]
impl ReviewRequestProvider for GitHubProvider {
    fn platform(&self) -> Platform {
        Platform::GitHub
    }

    #[instrument(skip(self))]
    async fn fetch_project_info(&self, project: &ProjectRef) -> Result<Project, Error> {
        let (owner, name) = Self::repository(project)?;
        let route = format!("/repos/{}/{}", owner, name);

        let repo: GitHubRepository = match self.client.get(&route, None::<&()>).await {
            Ok(r) => r,
            Err(e) => {
                log_octocrab_error("Failed to get repository information", &e);
                return Err(map_octocrab_error(&route, e));
            }
        };

        info!(repository = repo.name, "Loaded repository");

        Ok(Project {
            name: repo.name,
            web_url: repo.html_url,
            avatar_url: repo.owner.and_then(|o| o.avatar_url),
        })
    }

    #[instrument(skip(self))]
    async fn fetch_open_requests(&self, project: &ProjectRef) -> Result<Vec<ReviewRequest>, Error> {
        let (owner, name) = Self::repository(project)?;
        let route = format!("/repos/{}/{}/pulls", owner, name);

        let pulls: Vec<GitHubPullRequest> = self.get_all_pages(&route, Some("open")).await?;

        Ok(pulls.into_iter().map(ReviewRequest::from).collect())
    }

    /// Reviews come first, followed by the reactions on the pull request
    /// itself. Reviews from deleted accounts carry no user and are skipped.
    #[instrument(skip(self, request), fields(request = request.id))]
    async fn fetch_acknowledgment_signals(
        &self,
        project: &ProjectRef,
        request: &ReviewRequest,
    ) -> Result<Vec<AcknowledgmentSignal>, Error> {
        let (owner, name) = Self::repository(project)?;

        let reviews_route = format!("/repos/{}/{}/pulls/{}/reviews", owner, name, request.id);
        let reviews: Vec<GitHubReview> = self.get_all_pages(&reviews_route, None).await?;

        let reactions_route = format!("/repos/{}/{}/issues/{}/reactions", owner, name, request.id);
        let reactions: Vec<GitHubReaction> = self.get_all_pages(&reactions_route, None).await?;

        let mut signals: Vec<AcknowledgmentSignal> = reviews
            .into_iter()
            .filter_map(|r| {
                let user = r.user?;
                Some(AcknowledgmentSignal::Review {
                    state: ReviewState::from_api(r.state.as_deref().unwrap_or_default()),
                    user: user.into(),
                })
            })
            .collect();

        signals.extend(reactions.into_iter().filter_map(|r| {
            let user = r.user?;
            Some(AcknowledgmentSignal::Reaction {
                name: r.content,
                user: user.into(),
            })
        }));

        Ok(signals)
    }

    /// GitHub's REST API has no resolvable threads, so every issue comment
    /// becomes a discussion with one plain note.
    #[instrument(skip(self, request), fields(request = request.id))]
    async fn fetch_discussions(
        &self,
        project: &ProjectRef,
        request: &ReviewRequest,
    ) -> Result<Vec<Discussion>, Error> {
        let (owner, name) = Self::repository(project)?;
        let route = format!("/repos/{}/{}/issues/{}/comments", owner, name, request.id);

        let comments: Vec<GitHubComment> = self.get_all_pages(&route, None).await?;

        Ok(comments
            .into_iter()
            .map(|c| Discussion {
                id: c.id.to_string(),
                notes: vec![Note::default()],
            })
            .collect())
    }
}
