//! # Review Bot Developer Platforms
//!
//! Clients for the hosting platforms (GitLab, GitHub) that provide the merge
//! requests and pull requests the review bot reminds people about, and for the
//! chat webhook the reminder is posted to.

use async_trait::async_trait;

pub mod chat;

pub mod errors;

pub mod github;

pub mod gitlab;

pub mod models;
use errors::Error;
use models::{AcknowledgmentSignal, Discussion, Platform, Project, ProjectRef, ReviewRequest};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Read access to the review requests of a hosting platform.
///
/// The aggregation engine only talks to the platform through this trait, so
/// tests substitute an in-memory implementation. Every method hides pagination
/// and returns the complete result set.
///
/// # Example Implementation
///
/// ```rust,no_run
/// use review_bot_developer_platforms::{ReviewRequestProvider, errors::Error};
/// use review_bot_developer_platforms::models::{
///     AcknowledgmentSignal, Discussion, Platform, Project, ProjectRef, ReviewRequest,
/// };
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct StaticProvider {
///     requests: Vec<ReviewRequest>,
/// }
///
/// #[async_trait]
/// impl ReviewRequestProvider for StaticProvider {
///     fn platform(&self) -> Platform {
///         Platform::GitLab
///     }
///
///     async fn fetch_open_requests(&self, _: &ProjectRef) -> Result<Vec<ReviewRequest>, Error> {
///         Ok(self.requests.clone())
///     }
///
///     # async fn fetch_project_info(&self, _: &ProjectRef) -> Result<Project, Error> { unimplemented!() }
///     # async fn fetch_acknowledgment_signals(&self, _: &ProjectRef, _: &ReviewRequest) -> Result<Vec<AcknowledgmentSignal>, Error> { unimplemented!() }
///     # async fn fetch_discussions(&self, _: &ProjectRef, _: &ReviewRequest) -> Result<Vec<Discussion>, Error> { unimplemented!() }
/// }
/// ```
#[async_trait]
pub trait ReviewRequestProvider: Send + Sync {
    /// The platform this provider talks to.
    ///
    /// The aggregation engine uses it to pick the acknowledgment policy.
    fn platform(&self) -> Platform;

    /// Retrieves the project or repository descriptor.
    ///
    /// # Arguments
    ///
    /// * `project` - The project to look up
    async fn fetch_project_info(&self, project: &ProjectRef) -> Result<Project, Error>;

    /// Retrieves every open request of the project, drafts included.
    ///
    /// # Arguments
    ///
    /// * `project` - The project to list requests for
    ///
    /// # Returns
    ///
    /// The requests in the order the platform reports them
    async fn fetch_open_requests(&self, project: &ProjectRef) -> Result<Vec<ReviewRequest>, Error>;

    /// Retrieves the reactions and reviews of a single request.
    ///
    /// # Arguments
    ///
    /// * `project` - The project owning the request
    /// * `request` - The request to inspect
    async fn fetch_acknowledgment_signals(
        &self,
        project: &ProjectRef,
        request: &ReviewRequest,
    ) -> Result<Vec<AcknowledgmentSignal>, Error>;

    /// Retrieves the discussion threads of a single request.
    ///
    /// # Arguments
    ///
    /// * `project` - The project owning the request
    /// * `request` - The request to inspect
    async fn fetch_discussions(
        &self,
        project: &ProjectRef,
        request: &ReviewRequest,
    ) -> Result<Vec<Discussion>, Error>;
}
