use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::core::history::{retain_recent, HistoryStore, PostHistoryEntry};
use crate::core::storage::StoreError;

/// Post history as a pretty-printed JSON array, newest last.
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The file must hold a JSON array; entries inside it that do not parse
    /// are dropped one by one so the rest of the history survives.
    async fn read(&self) -> Result<Vec<PostHistoryEntry>, StoreError> {
        let text = fs::read_to_string(&self.path).await?;
        let raw: Vec<serde_json::Value> = serde_json::from_str(&text)?;
        let total = raw.len();

        let history: Vec<PostHistoryEntry> = raw
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();

        if history.len() < total {
            tracing::warn!(
                path = %self.path.display(),
                skipped = total - history.len(),
                "Skipped unreadable post history entries"
            );
        }
        Ok(history)
    }
}

#[async_trait]
impl HistoryStore for JsonHistoryStore {
    async fn load(&self) -> Vec<PostHistoryEntry> {
        if !self.path.exists() {
            return Vec::new();
        }

        match self.read().await {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Ignoring unreadable post history: {}",
                    e
                );
                Vec::new()
            }
        }
    }

    async fn save(&self, history: &[PostHistoryEntry]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let text = serde_json::to_string_pretty(retain_recent(history))?;
        fs::write(&self.path, text).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::history::history_models::MAX_HISTORY_ENTRIES;

    fn entry(i: usize) -> PostHistoryEntry {
        PostHistoryEntry {
            timestamp: format!("2025-03-01T{:02}:00:00+00:00", i % 24),
            title: format!("Post {}", i),
            topic: "AI 프롬프트 엔지니어링".to_string(),
            success: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn missing_or_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post_history.json");
        let store = JsonHistoryStore::new(&path);

        assert!(store.load().await.is_empty());

        std::fs::write(&path, "[{\"title\": ").unwrap();
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn null_labels_and_odd_entries_keep_the_rest_of_the_history() {
        use crate::core::history::{HistoryGuard, PostingCalendar};
        use chrono::{TimeZone, Utc};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post_history.json");
        std::fs::write(
            &path,
            r#"[
                {"timestamp": "2025-03-01T08:00:00+00:00", "title": "Morning post",
                 "topic": "AI music", "labels": ["AI"], "success": true},
                {"timestamp": "2025-03-01T09:00:00+00:00", "title": "Second post",
                 "topic": "AI video", "labels": null, "method": "github_actions_v2",
                 "success": true},
                {"timestamp": "2025-03-01T10:00:00+00:00", "title": 42}
            ]"#,
        )
        .unwrap();
        let store = JsonHistoryStore::new(&path);

        let history = store.load().await;

        assert_eq!(history.len(), 2);
        assert_eq!(history[1].title, "Second post");
        assert!(history[1].labels.is_empty());

        let guard = HistoryGuard::new(PostingCalendar::Zone(chrono_tz::UTC), 1);
        let noon = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(guard.posts_on_day(&history, noon), 2);
        assert!(!guard.should_post_today(&history, noon));
    }

    #[tokio::test]
    async fn save_keeps_the_newest_hundred() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonHistoryStore::new(dir.path().join("data/post_history.json"));
        let history: Vec<PostHistoryEntry> = (0..105).map(entry).collect();

        store.save(&history).await.unwrap();
        let loaded = store.load().await;

        assert_eq!(loaded.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(loaded.first().unwrap().title, "Post 5");
        assert_eq!(loaded.last().unwrap().title, "Post 104");
    }

    #[tokio::test]
    async fn non_ascii_text_is_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post_history.json");
        let store = JsonHistoryStore::new(&path);

        store.save(&[entry(1)]).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("AI 프롬프트 엔지니어링"));
        assert_eq!(store.load().await, vec![entry(1)]);
    }
}
