// One publish run: rate check, topic selection, article, render, token
// refresh, publish, history update. Every step is awaited in order.

use super::blog_publisher::{BlogPublisher, PostDraft, PostError};
use crate::core::content::images::pick_image_url;
use crate::core::content::{Article, ArticleRenderer, ContentProvider, FixedTopic, TopicSource};
use crate::core::history::{HistoryGuard, HistoryStore, PostHistoryEntry, TopicSelection};
use crate::core::tokens::{DynTokenService, RefreshOutcome};
use chrono::{DateTime, Local, Utc};
use thiserror::Error;

pub const DEFAULT_LABELS: [&str; 3] = ["AI", "Blog", "Tech"];

#[derive(Debug, Error)]
pub enum RunError {
    #[error("No OAuth token found at {location}; run the authorize command first")]
    NoToken { location: String },
    #[error(transparent)]
    Post(#[from] PostError),
}

#[derive(Debug, Clone, Default)]
pub struct PublishRequest {
    /// Used for every selection attempt instead of generated topics. A blank
    /// value counts as no override.
    pub topic: Option<String>,
    /// Replaces the article's tags when non-empty.
    pub labels: Option<Vec<String>>,
    /// Scheduled runs honour the daily cap; manual runs ignore it.
    pub auto_mode: bool,
}

#[derive(Debug, Clone)]
pub struct PublishReport {
    pub title: String,
    pub url: Option<String>,
    pub labels: Vec<String>,
    pub selection: TopicSelection,
    pub used_placeholder: bool,
    pub refresh: RefreshOutcome,
    /// False when the post went out but the history file could not be written.
    pub history_saved: bool,
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    Published(PublishReport),
    Skipped { posts_today: usize },
}

pub struct PublishService {
    tokens: DynTokenService,
    history: Box<dyn HistoryStore>,
    content: Box<dyn ContentProvider>,
    renderer: Box<dyn ArticleRenderer>,
    publisher: Box<dyn BlogPublisher>,
    topics: Box<dyn TopicSource>,
    guard: HistoryGuard,
    default_labels: Vec<String>,
}

impl PublishService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tokens: DynTokenService,
        history: Box<dyn HistoryStore>,
        content: Box<dyn ContentProvider>,
        renderer: Box<dyn ArticleRenderer>,
        publisher: Box<dyn BlogPublisher>,
        topics: Box<dyn TopicSource>,
        guard: HistoryGuard,
    ) -> Self {
        Self {
            tokens,
            history,
            content,
            renderer,
            publisher,
            topics,
            guard,
            default_labels: DEFAULT_LABELS.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub async fn run(&self, request: &PublishRequest) -> Result<RunOutcome, RunError> {
        self.run_at(request, Utc::now()).await
    }

    pub async fn run_at(
        &self,
        request: &PublishRequest,
        now: DateTime<Utc>,
    ) -> Result<RunOutcome, RunError> {
        let Some(mut token) = self.tokens.load().await else {
            return Err(RunError::NoToken {
                location: self.tokens.token_location(),
            });
        };
        let mut history = self.history.load().await;
        tracing::debug!(entries = history.len(), "Loaded post history");

        if request.auto_mode && !self.guard.should_post_today(&history, now) {
            let posts_today = self.guard.posts_on_day(&history, now);
            tracing::info!(
                posts_today,
                max = self.guard.max_posts_per_day(),
                "Daily post limit reached, skipping"
            );
            return Ok(RunOutcome::Skipped { posts_today });
        }

        let topic_override = request
            .topic
            .as_deref()
            .map(str::trim)
            .filter(|topic| !topic.is_empty());
        let selection = match topic_override {
            Some(topic) => {
                let fixed = FixedTopic(topic.to_string());
                self.guard.select_topic(&fixed, &history, now).await
            }
            None => {
                self.guard
                    .select_topic(&*self.topics, &history, now)
                    .await
            }
        };
        if let TopicSelection::Exhausted { topic, attempts } = &selection {
            tracing::warn!(
                attempts,
                topic = %topic,
                "No unique topic found, publishing the last candidate anyway"
            );
        }
        let topic = selection.topic().to_string();

        let (article, used_placeholder) = match self.content.write_article(&topic).await {
            Ok(article) => (article, false),
            Err(e) => {
                tracing::warn!("Content generation failed, using placeholder article: {}", e);
                let mut placeholder = Article::placeholder(&topic);
                placeholder.image_url = Some(pick_image_url("AI"));
                (placeholder, true)
            }
        };

        let document = self.renderer.render(&article);

        let refresh = self.tokens.refresh_at(&mut token, now).await;

        let labels = resolve_labels(request.labels.as_deref(), &article.tags, &self.default_labels);
        let draft = PostDraft {
            title: article.title.clone(),
            content: document,
            labels: labels.clone(),
        };

        let published = match self.publisher.publish(&token.access_token, &draft).await {
            Ok(post) => post,
            Err(e) => {
                tracing::error!(title = %draft.title, "Publishing failed: {}", e);
                return Err(e.into());
            }
        };
        tracing::info!(
            id = %published.id,
            title = %published.title,
            url = ?published.url,
            "Post published"
        );

        history.push(PostHistoryEntry::published(
            &article.title,
            &topic,
            published.url.clone(),
            labels.clone(),
            now.with_timezone(&Local),
        ));

        let history_saved = match self.history.save(&history).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Post published but history could not be saved: {}", e);
                false
            }
        };

        Ok(RunOutcome::Published(PublishReport {
            title: article.title,
            url: published.url,
            labels,
            selection,
            used_placeholder,
            refresh,
            history_saved,
        }))
    }
}

/// Splits a comma-separated label list, trimming entries and dropping empties.
pub fn parse_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

/// Explicit labels win, then the article's tags, then the defaults.
pub fn resolve_labels(
    explicit: Option<&[String]>,
    tags: &[String],
    defaults: &[String],
) -> Vec<String> {
    match explicit {
        Some(labels) if !labels.is_empty() => labels.to_vec(),
        _ if !tags.is_empty() => tags.to_vec(),
        _ => defaults.to_vec(),
    }
}
