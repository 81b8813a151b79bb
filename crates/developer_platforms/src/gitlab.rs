//! GitLab REST v4 provider.
//!
//! Lists open merge requests, their award emoji and their discussions. Every
//! list endpoint is paginated with `per_page=100` and followed through the
//! `x-next-page` response header until GitLab reports no further page.

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::{
    errors::Error,
    models::{
        AcknowledgmentSignal, Discussion, Note, Platform, Project, ProjectRef, ReviewRequest,
        User,
    },
    ReviewRequestProvider,
};

#[cfg(test)]
#[path = "gitlab_tests.rs"]
mod tests;

/// Number of items requested per page.
const PAGE_SIZE: &str = "100";

#[derive(Debug, Deserialize)]
struct GitLabProject {
    name: String,
    web_url: String,
    avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct GitLabUser {
    id: u64,
    username: String,
    #[serde(default)]
    name: String,
}

impl From<GitLabUser> for User {
    fn from(u: GitLabUser) -> Self {
        User {
            id: u.id,
            username: u.username,
            name: u.name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitLabMergeRequest {
    iid: u64,
    title: String,
    web_url: String,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    work_in_progress: bool,
    author: GitLabUser,
    assignee: Option<GitLabUser>,
    reviewers: Option<Vec<GitLabUser>>,
}

impl From<GitLabMergeRequest> for ReviewRequest {
    fn from(mr: GitLabMergeRequest) -> Self {
        ReviewRequest {
            id: mr.iid,
            title: mr.title,
            url: mr.web_url,
            draft: mr.draft || mr.work_in_progress,
            author: mr.author.into(),
            assignee: mr.assignee.map(User::from),
            requested_reviewers: mr
                .reviewers
                .unwrap_or_default()
                .into_iter()
                .map(User::from)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitLabAwardEmoji {
    name: String,
    user: GitLabUser,
}

#[derive(Debug, Deserialize)]
struct GitLabNote {
    #[serde(default)]
    resolvable: bool,
    resolved: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct GitLabDiscussion {
    id: String,
    #[serde(default)]
    notes: Vec<GitLabNote>,
}

/// Provider backed by the GitLab REST API.
#[derive(Debug, Clone)]
pub struct GitLabProvider {
    client: Client,
    base_url: String,
}

impl GitLabProvider {
    /// Creates a provider for the given GitLab host.
    ///
    /// `host` is either a bare host name (`gitlab.com`), which is reached over
    /// HTTPS, or a full base URL such as `http://localhost:8080`.
    ///
    /// # Errors
    ///
    /// Returns `Error::AuthError` when the token cannot be used as a header
    /// value, and `Error::Transport` when the HTTP client cannot be built.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use review_bot_developer_platforms::gitlab::GitLabProvider;
    ///
    /// let provider = GitLabProvider::new("gitlab.com", "glpat-secret").unwrap();
    /// ```
    pub fn new(host: &str, token: &str) -> Result<Self, Error> {
        let mut headers = header::HeaderMap::new();
        if !token.is_empty() {
            let mut token_value = header::HeaderValue::from_str(token)
                .map_err(|_| Error::AuthError("Invalid token format".to_string()))?;
            token_value.set_sensitive(true);
            headers.insert("PRIVATE-TOKEN", token_value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Transport(format!("Failed to build HTTP client: {}", e)))?;

        let host = host.trim_end_matches('/');
        let base_url = if host.contains("://") {
            format!("{}/api/v4", host)
        } else {
            format!("https://{}/api/v4", host)
        };

        Ok(Self { client, base_url })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// The URL segment GitLab uses to address a project.
    fn project_segment(project: &ProjectRef) -> Result<String, Error> {
        match project {
            ProjectRef::Id(id) => Ok(id.to_string()),
            ProjectRef::Path(path) => Ok(urlencoding::encode(path).into_owned()),
            ProjectRef::Repository { .. } => Err(Error::InvalidProjectRef(format!(
                "'{}' is a GitHub repository, GitLab needs a project ID or path",
                project
            ))),
        }
    }

    async fn check_status(response: Response, endpoint: &str) -> Result<Response, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!(
            endpoint = endpoint,
            status = status.as_u16(),
            body = body,
            "GitLab request failed"
        );
        Err(Error::from_status(status.as_u16(), endpoint))
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, Error> {
        let response = self.client.get(self.api_url(endpoint)).send().await?;
        let response = Self::check_status(response, endpoint).await?;
        response.json::<T>().await.map_err(|e| {
            error!(endpoint = endpoint, error = e.to_string(), "Failed to decode GitLab response");
            Error::InvalidResponse
        })
    }

    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, Error> {
        let mut items = Vec::new();
        let mut page = "1".to_string();

        loop {
            let response = self
                .client
                .get(self.api_url(endpoint))
                .query(query)
                .query(&[("page", page.as_str()), ("per_page", PAGE_SIZE)])
                .send()
                .await?;
            let response = Self::check_status(response, endpoint).await?;

            let next_page = response
                .headers()
                .get("x-next-page")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());

            let data = response.json::<Vec<T>>().await.map_err(|e| {
                error!(endpoint = endpoint, error = e.to_string(), "Failed to decode GitLab response");
                Error::InvalidResponse
            })?;
            items.extend(data);

            match next_page {
                Some(next) => page = next,
                None => break,
            }
        }

        debug!(endpoint = endpoint, count = items.len(), "Fetched all pages");
        Ok(items)
    }
}

#[async_trait]
impl ReviewRequestProvider for GitLabProvider {
    fn platform(&self) -> Platform {
        Platform::GitLab
    }

    #[instrument(skip(self))]
    async fn fetch_project_info(&self, project: &ProjectRef) -> Result<Project, Error> {
        let endpoint = format!("/projects/{}", Self::project_segment(project)?);
        let p: GitLabProject = self.get(&endpoint).await?;

        Ok(Project {
            name: p.name,
            web_url: p.web_url,
            avatar_url: p.avatar_url,
        })
    }

    #[instrument(skip(self))]
    async fn fetch_open_requests(&self, project: &ProjectRef) -> Result<Vec<ReviewRequest>, Error> {
        let endpoint = format!("/projects/{}/merge_requests", Self::project_segment(project)?);
        let merge_requests: Vec<GitLabMergeRequest> = self
            .get_all_pages(&endpoint, &[("state", "opened")])
            .await?;

        Ok(merge_requests.into_iter().map(ReviewRequest::from).collect())
    }

    #[instrument(skip(self, request), fields(request = request.id))]
    async fn fetch_acknowledgment_signals(
        &self,
        project: &ProjectRef,
        request: &ReviewRequest,
    ) -> Result<Vec<AcknowledgmentSignal>, Error> {
        let endpoint = format!(
            "/projects/{}/merge_requests/{}/award_emoji",
            Self::project_segment(project)?,
            request.id
        );
        let emojis: Vec<GitLabAwardEmoji> = self.get_all_pages(&endpoint, &[]).await?;

        Ok(emojis
            .into_iter()
            .map(|e| AcknowledgmentSignal::Reaction {
                name: e.name,
                user: e.user.into(),
            })
            .collect())
    }

    #[instrument(skip(self, request), fields(request = request.id))]
    async fn fetch_discussions(
        &self,
        project: &ProjectRef,
        request: &ReviewRequest,
    ) -> Result<Vec<Discussion>, Error> {
        let endpoint = format!(
            "/projects/{}/merge_requests/{}/discussions",
            Self::project_segment(project)?,
            request.id
        );
        let discussions: Vec<GitLabDiscussion> = self.get_all_pages(&endpoint, &[]).await?;

        Ok(discussions
            .into_iter()
            .map(|d| Discussion {
                id: d.id,
                notes: d
                    .notes
                    .into_iter()
                    .map(|n| Note {
                        resolvable: n.resolvable,
                        resolved: n.resolved.unwrap_or(false),
                    })
                    .collect(),
            })
            .collect())
    }
}
