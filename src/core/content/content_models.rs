use serde::{Deserialize, Serialize};

use crate::core::serde_defaults::null_as_default;

/// A generated blog article before it is rendered to a full HTML document.
///
/// Deserialized straight from the model's JSON answer, so every field is
/// optional on the wire and `null` reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subtitle: String,
    /// HTML fragment, inserted into the rendered document as-is.
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    pub image_url: Option<String>,
}

impl Article {
    /// Fixed stand-in used when the content provider fails.
    pub fn placeholder(topic: &str) -> Self {
        Self {
            title: format!("🤖 {}", topic),
            subtitle: "Everyday life, a little smarter with AI".to_string(),
            content: "<p>A detailed write-up on this topic is on its way.</p>\
                      <p>AI tools keep changing how we work, learn and create.</p>"
                .to_string(),
            tags: vec![
                "AI".to_string(),
                "Artificial Intelligence".to_string(),
                "Automation".to_string(),
            ],
            summary: "A practical guide to putting AI to work.".to_string(),
            image_url: None,
        }
    }

    /// True when the model answered with something that cannot be posted.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() || self.content.trim().is_empty()
    }
}
