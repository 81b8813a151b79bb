//! Tests for the ReviewRequestProvider trait surface.

use crate::errors::Error;
use crate::models::{
    AcknowledgmentSignal, Discussion, Platform, Project, ProjectRef, ReviewRequest, User,
};
use crate::ReviewRequestProvider;
use async_trait::async_trait;

/// In-memory provider used to check the trait can be used as a trait object
#[derive(Debug)]
struct InMemoryProvider {
    project: Project,
    requests: Vec<ReviewRequest>,
}

#[async_trait]
impl ReviewRequestProvider for InMemoryProvider {
    fn platform(&self) -> Platform {
        Platform::GitLab
    }

    async fn fetch_project_info(&self, _project: &ProjectRef) -> Result<Project, Error> {
        Ok(self.project.clone())
    }

    async fn fetch_open_requests(&self, _project: &ProjectRef) -> Result<Vec<ReviewRequest>, Error> {
        Ok(self.requests.clone())
    }

    async fn fetch_acknowledgment_signals(
        &self,
        _project: &ProjectRef,
        request: &ReviewRequest,
    ) -> Result<Vec<AcknowledgmentSignal>, Error> {
        Ok(vec![AcknowledgmentSignal::Reaction {
            name: "thumbsup".to_string(),
            user: request.author.clone(),
        }])
    }

    async fn fetch_discussions(
        &self,
        _project: &ProjectRef,
        _request: &ReviewRequest,
    ) -> Result<Vec<Discussion>, Error> {
        Err(Error::RateLimitExceeded)
    }
}

fn provider() -> Box<dyn ReviewRequestProvider> {
    Box::new(InMemoryProvider {
        project: Project {
            name: "mocked project".to_string(),
            ..Default::default()
        },
        requests: vec![ReviewRequest {
            id: 1,
            title: "MR0".to_string(),
            author: User {
                id: 3,
                username: "john".to_string(),
                name: "John".to_string(),
            },
            ..Default::default()
        }],
    })
}

#[tokio::test]
async fn test_provider_as_trait_object() {
    let provider = provider();
    let project = ProjectRef::Id(1);

    assert_eq!(provider.platform(), Platform::GitLab);
    assert_eq!(
        provider.fetch_project_info(&project).await.unwrap().name,
        "mocked project"
    );

    let requests = provider.fetch_open_requests(&project).await.unwrap();
    assert_eq!(requests.len(), 1);

    let signals = provider
        .fetch_acknowledgment_signals(&project, &requests[0])
        .await
        .unwrap();
    assert_eq!(signals[0].user().username, "john");
}

#[tokio::test]
async fn test_provider_errors_are_propagated() {
    let provider = provider();
    let project = ProjectRef::Id(1);
    let requests = provider.fetch_open_requests(&project).await.unwrap();

    let result = provider.fetch_discussions(&project, &requests[0]).await;
    assert!(matches!(result, Err(Error::RateLimitExceeded)));
}
