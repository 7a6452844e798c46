use super::content_models::Article;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("text generation failed: {0}")]
    Generation(String),
    #[error("model answer is not a usable article: {0}")]
    Malformed(String),
}

/// Sampling parameters handed to a [`TextGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            max_output_tokens: 4000,
            top_p: 0.9,
            top_k: 40,
        }
    }
}

/// Raw prompt-in, text-out access to a generative model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> Result<String, ContentError>;
}

#[async_trait]
impl TextGenerator for Box<dyn TextGenerator> {
    async fn generate(
        &self,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> Result<String, ContentError> {
        (**self).generate(prompt, settings).await
    }
}

/// Turns a topic into an [`Article`]. Callers fall back to
/// [`Article::placeholder`] on error.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn write_article(&self, topic: &str) -> Result<Article, ContentError>;
}

#[async_trait]
impl ContentProvider for Box<dyn ContentProvider> {
    async fn write_article(&self, topic: &str) -> Result<Article, ContentError> {
        (**self).write_article(topic).await
    }
}
