use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("network error while publishing: {0}")]
    Network(String),
    #[error("blog rejected the post ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("unexpected publish response: {0}")]
    InvalidResponse(String),
}

/// What gets sent to the blog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDraft {
    pub title: String,
    /// Complete rendered HTML document.
    pub content: String,
    pub labels: Vec<String>,
}

/// The blog's answer to a successful publish.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PublishedPost {
    pub id: String,
    pub url: Option<String>,
    pub title: String,
}

#[async_trait]
pub trait BlogPublisher: Send + Sync {
    async fn publish(&self, access_token: &str, draft: &PostDraft)
        -> Result<PublishedPost, PostError>;
}

#[async_trait]
impl BlogPublisher for Box<dyn BlogPublisher> {
    async fn publish(
        &self,
        access_token: &str,
        draft: &PostDraft,
    ) -> Result<PublishedPost, PostError> {
        (**self).publish(access_token, draft).await
    }
}
