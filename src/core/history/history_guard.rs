// Duplicate and daily-rate checks against the post history.
//
// Both checks are approximate. A title hash only catches exact repeats and
// the 24-hour substring check only catches topics that literally contain the
// candidate. Near-duplicates with different wording get through.

use super::history_models::{title_hash, PostHistoryEntry};
use crate::core::content::TopicSource;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

pub const DEFAULT_MAX_POSTS_PER_DAY: usize = 1;
pub const DUPLICATE_WINDOW_SECS: i64 = 86_400;
pub const MAX_TOPIC_ATTEMPTS: usize = 5;
pub const DEFAULT_RETRY_DELAY: std::time::Duration = std::time::Duration::from_secs(1);

/// Which calendar decides what "today" means for the daily cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PostingCalendar {
    /// The host's local timezone.
    HostLocal,
    Zone(Tz),
}

impl PostingCalendar {
    pub fn date_of<T: TimeZone>(&self, instant: &DateTime<T>) -> NaiveDate {
        match self {
            PostingCalendar::HostLocal => instant.with_timezone(&chrono::Local).date_naive(),
            PostingCalendar::Zone(tz) => instant.with_timezone(tz).date_naive(),
        }
    }
}

/// Outcome of the topic selection loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicSelection {
    /// A candidate that does not collide with recent history.
    Unique { topic: String, attempts: usize },
    /// Every attempt collided; `topic` is the last candidate and may repeat a recent post.
    Exhausted { topic: String, attempts: usize },
}

impl TopicSelection {
    pub fn topic(&self) -> &str {
        match self {
            TopicSelection::Unique { topic, .. } | TopicSelection::Exhausted { topic, .. } => topic,
        }
    }

    pub fn attempts(&self) -> usize {
        match self {
            TopicSelection::Unique { attempts, .. } | TopicSelection::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn is_unique(&self) -> bool {
        matches!(self, TopicSelection::Unique { .. })
    }
}

#[derive(Debug, Clone)]
pub struct HistoryGuard {
    calendar: PostingCalendar,
    max_posts_per_day: usize,
    max_attempts: usize,
    retry_delay: std::time::Duration,
}

impl HistoryGuard {
    pub fn new(calendar: PostingCalendar, max_posts_per_day: usize) -> Self {
        Self {
            calendar,
            max_posts_per_day,
            max_attempts: MAX_TOPIC_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, retry_delay: std::time::Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn max_posts_per_day(&self) -> usize {
        self.max_posts_per_day
    }

    /// Entries whose calendar date is the same as `now`'s. Malformed timestamps never count.
    pub fn posts_on_day(&self, history: &[PostHistoryEntry], now: DateTime<Utc>) -> usize {
        let today = self.calendar.date_of(&now);
        history
            .iter()
            .filter_map(PostHistoryEntry::parsed_timestamp)
            .filter(|posted| self.calendar.date_of(posted) == today)
            .count()
    }

    pub fn should_post_today(&self, history: &[PostHistoryEntry], now: DateTime<Utc>) -> bool {
        self.posts_on_day(history, now) < self.max_posts_per_day
    }

    /// Draws up to `MAX_TOPIC_ATTEMPTS` candidates and returns the first one
    /// that is not a duplicate. When all of them collide the last candidate is
    /// returned anyway, marked as [`TopicSelection::Exhausted`].
    pub async fn select_topic(
        &self,
        source: &dyn TopicSource,
        history: &[PostHistoryEntry],
        now: DateTime<Utc>,
    ) -> TopicSelection {
        let max_attempts = self.max_attempts.max(1);
        let mut last = String::new();

        for attempt in 1..=max_attempts {
            let topic = source.next_topic();
            tracing::info!(attempt, topic = %topic, "Generated topic candidate");

            if !is_duplicate(&topic, history, now) {
                return TopicSelection::Unique {
                    topic,
                    attempts: attempt,
                };
            }

            tracing::warn!(attempt, "A similar topic was posted recently, trying another");
            last = topic;

            if attempt < max_attempts && !self.retry_delay.is_zero() {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        TopicSelection::Exhausted {
            topic: last,
            attempts: max_attempts,
        }
    }
}

/// True when `candidate` hashes to a stored title hash, or when a post from
/// the last 24 hours has a topic containing `candidate` (case-insensitive).
pub fn is_duplicate(candidate: &str, history: &[PostHistoryEntry], now: DateTime<Utc>) -> bool {
    let candidate_hash = title_hash(candidate);
    let needle = candidate.to_lowercase();
    let window = Duration::seconds(DUPLICATE_WINDOW_SECS);

    history.iter().any(|entry| {
        if entry.title_hash == candidate_hash {
            return true;
        }

        let recent = entry
            .parsed_timestamp()
            .is_some_and(|posted| now - posted.with_timezone(&Utc) < window);

        recent && !needle.is_empty() && entry.topic.to_lowercase().contains(&needle)
    })
}
