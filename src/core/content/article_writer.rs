use super::content_models::Article;
use super::content_provider::{ContentError, ContentProvider, GenerationSettings, TextGenerator};
use super::images::pick_image_url;
use async_trait::async_trait;

/// Writes articles by prompting a [`TextGenerator`] for a JSON answer.
pub struct ArticleWriter<G: TextGenerator> {
    generator: G,
    settings: GenerationSettings,
}

impl<G: TextGenerator> ArticleWriter<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            settings: GenerationSettings::default(),
        }
    }
}

#[async_trait]
impl<G: TextGenerator> ContentProvider for ArticleWriter<G> {
    async fn write_article(&self, topic: &str) -> Result<Article, ContentError> {
        let prompt = build_prompt(topic);
        let answer = self.generator.generate(&prompt, &self.settings).await?;

        let json = extract_json_block(&answer);
        let mut article: Article = serde_json::from_str(json.trim())
            .map_err(|e| ContentError::Malformed(e.to_string()))?;

        if article.is_blank() {
            return Err(ContentError::Malformed(
                "answer has no title or body".to_string(),
            ));
        }

        let keyword = topic.split_whitespace().next().unwrap_or("AI");
        article.image_url = Some(pick_image_url(keyword));

        tracing::debug!(title = %article.title, tags = ?article.tags, "Article generated");
        Ok(article)
    }
}

pub fn build_prompt(topic: &str) -> String {
    format!(
        r#"You are an experienced blogger who writes about AI. Write a high-quality blog post on the topic below.

Topic: {topic}

Requirements:
1. Title: an inviting, clickable title containing exactly one emoji.
2. Length: 1,500 to 2,500 words, detailed and concrete.
3. Structure:
   - An opening that hooks the reader
   - Three or four main sections, each with a concrete example
   - At least five practical tips
   - At least two real-world use cases
   - A short recap
   - A call to action
4. Tone: friendly and easy to follow, professional without being stiff, backed by numbers where possible.
5. Stand out: include insights readers will not find elsewhere and tips they can apply right away.

Answer with JSON only, in this shape:
{{
    "title": "Title",
    "subtitle": "Subtitle",
    "content": "Body as HTML",
    "tags": ["tag1", "tag2"],
    "summary": "One-line summary"
}}"#
    )
}

/// The JSON payload of a model answer: the body of the first ```json fence,
/// else the first plain ``` fence, else the whole answer.
pub fn extract_json_block(answer: &str) -> &str {
    if let Some((_, rest)) = answer.split_once("```json") {
        return rest.split("```").next().unwrap_or(rest);
    }
    if let Some((_, rest)) = answer.split_once("```") {
        return rest.split("```").next().unwrap_or(rest);
    }
    answer
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CannedGenerator {
        answer: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedGenerator {
        fn answering(answer: &str) -> Self {
            Self {
                answer: Ok(answer.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(
            &self,
            prompt: &str,
            settings: &GenerationSettings,
        ) -> Result<String, ContentError> {
            assert_eq!(settings.top_k, 40);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.answer.clone().map_err(ContentError::Generation)
        }
    }

    #[test]
    fn json_block_extraction() {
        assert_eq!(
            extract_json_block("Sure!\n```json\n{\"a\":1}\n```\nDone"),
            "\n{\"a\":1}\n"
        );
        assert_eq!(extract_json_block("```\n{\"a\":1}\n```"), "\n{\"a\":1}\n");
        assert_eq!(extract_json_block("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn prompt_contains_topic() {
        let prompt = build_prompt("AI Music Production for Bloggers");
        assert!(prompt.contains("Topic: AI Music Production for Bloggers"));
        assert!(prompt.contains("\"summary\""));
    }

    #[tokio::test]
    async fn fenced_answer_becomes_article_with_image() {
        let answer = "```json\n{\"title\": \"🎵 Make music with AI\", \"subtitle\": \"s\", \
                      \"content\": \"<p>body</p>\", \"tags\": [\"AI\", \"Music\"], \"summary\": \"sum\"}\n```";
        let writer = ArticleWriter::new(CannedGenerator::answering(answer));

        let article = writer.write_article("AI music production").await.unwrap();

        assert_eq!(article.title, "🎵 Make music with AI");
        assert_eq!(article.tags, vec!["AI", "Music"]);
        assert!(article.image_url.is_some());
        let prompts = writer.generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("AI music production"));
    }

    #[tokio::test]
    async fn null_tags_still_yield_the_article() {
        let answer = r#"{"title": "AI for spreadsheets", "subtitle": null,
                         "content": "<p>body</p>", "tags": null, "summary": "sum"}"#;
        let writer = ArticleWriter::new(CannedGenerator::answering(answer));

        let article = writer.write_article("AI spreadsheets").await.unwrap();

        assert_eq!(article.title, "AI for spreadsheets");
        assert!(article.tags.is_empty());
        assert_eq!(article.subtitle, "");
    }

    #[tokio::test]
    async fn unparseable_answer_is_malformed() {
        let writer = ArticleWriter::new(CannedGenerator::answering("I cannot help with that."));
        let err = writer.write_article("anything").await.unwrap_err();
        assert!(matches!(err, ContentError::Malformed(_)));
    }

    #[tokio::test]
    async fn generator_failure_propagates() {
        let writer = ArticleWriter::new(CannedGenerator {
            answer: Err("quota exceeded".to_string()),
            prompts: Mutex::new(Vec::new()),
        });
        let err = writer.write_article("anything").await.unwrap_err();
        assert!(matches!(err, ContentError::Generation(_)));
    }
}
