// Blogger API v3 post insertion.
// See: https://developers.google.com/blogger/docs/3.0/reference/posts/insert

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::core::publishing::{BlogPublisher, PostDraft, PostError, PublishedPost};

pub const BLOGGER_API_BASE: &str = "https://www.googleapis.com/blogger/v3";

#[derive(Debug, Serialize)]
struct BlogRef<'a> {
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct InsertPostRequest<'a> {
    kind: &'static str,
    blog: BlogRef<'a>,
    title: &'a str,
    content: &'a str,
    labels: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

pub struct BloggerClient {
    client: Client,
    blog_id: String,
}

impl BloggerClient {
    pub fn new(client: Client, blog_id: impl Into<String>) -> Self {
        Self {
            client,
            blog_id: blog_id.into(),
        }
    }

    fn posts_url(&self) -> String {
        format!("{}/blogs/{}/posts", BLOGGER_API_BASE, self.blog_id)
    }

    fn request_body<'a>(&'a self, draft: &'a PostDraft) -> InsertPostRequest<'a> {
        InsertPostRequest {
            kind: "blogger#post",
            blog: BlogRef { id: &self.blog_id },
            title: &draft.title,
            content: &draft.content,
            labels: &draft.labels,
        }
    }
}

#[async_trait]
impl BlogPublisher for BloggerClient {
    async fn publish(
        &self,
        access_token: &str,
        draft: &PostDraft,
    ) -> Result<PublishedPost, PostError> {
        tracing::debug!(
            blog_id = %self.blog_id,
            title = %draft.title,
            bytes = draft.content.len(),
            "Inserting Blogger post"
        );

        let response = self
            .client
            .post(self.posts_url())
            .bearer_auth(access_token)
            .json(&self.request_body(draft))
            .send()
            .await
            .map_err(|e| PostError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PostError::Network(e.to_string()))?;

        // Blogger answers 200 for an inserted post; anything else is treated as failure.
        if status != StatusCode::OK {
            return Err(PostError::Rejected {
                status: status.as_u16(),
                body: describe_error(&text),
            });
        }

        serde_json::from_str(&text).map_err(|e| PostError::InvalidResponse(e.to_string()))
    }
}

fn describe_error(body: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(body)
        .map(|e| e.error.message)
        .ok()
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PostDraft {
        PostDraft {
            title: "🤖 Prompting 101".to_string(),
            content: "<div>hi</div>".to_string(),
            labels: vec!["AI".to_string(), "Blog".to_string()],
        }
    }

    #[test]
    fn request_body_matches_blogger_schema() {
        let client = BloggerClient::new(Client::new(), "123456789");
        let draft = draft();

        let json = serde_json::to_value(client.request_body(&draft)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "kind": "blogger#post",
                "blog": {"id": "123456789"},
                "title": "🤖 Prompting 101",
                "content": "<div>hi</div>",
                "labels": ["AI", "Blog"]
            })
        );
        assert_eq!(
            client.posts_url(),
            "https://www.googleapis.com/blogger/v3/blogs/123456789/posts"
        );
    }

    #[test]
    fn published_post_parses_from_insert_response() {
        let post: PublishedPost = serde_json::from_str(
            r#"{"kind": "blogger#post", "id": "7001", "url": "http://x.blogspot.com/2025/03/p.html",
                "title": "🤖 Prompting 101", "labels": ["AI"]}"#,
        )
        .unwrap();

        assert_eq!(post.id, "7001");
        assert_eq!(post.url.as_deref(), Some("http://x.blogspot.com/2025/03/p.html"));
    }

    #[test]
    fn api_error_message_is_extracted() {
        let body = r#"{"error": {"code": 401, "message": "Invalid Credentials", "errors": []}}"#;
        assert_eq!(describe_error(body), "Invalid Credentials");
        assert_eq!(describe_error("Service Unavailable"), "Service Unavailable");
    }
}
