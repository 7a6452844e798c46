use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::core::serde_defaults::null_as_default;

/// The history file never holds more than this many entries.
pub const MAX_HISTORY_ENTRIES: usize = 100;

/// One successfully published post.
///
/// Every field falls back to its default when missing or `null`, so a single
/// odd entry does not make the whole history file unreadable. Unknown keys are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostHistoryEntry {
    /// ISO-8601. Entries written by this crate carry an offset; older ones may be naive local time.
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title_hash: String,
    #[serde(deserialize_with = "null_as_default")]
    pub topic: String,
    pub url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub labels: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub success: bool,
}

impl PostHistoryEntry {
    pub fn published(
        title: &str,
        topic: &str,
        url: Option<String>,
        labels: Vec<String>,
        at: DateTime<Local>,
    ) -> Self {
        Self {
            timestamp: at.to_rfc3339(),
            title: title.to_string(),
            title_hash: title_hash(title),
            topic: topic.to_string(),
            url,
            labels,
            success: true,
        }
    }

    /// `None` for missing or malformed timestamps.
    pub fn parsed_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.timestamp)
    }
}

/// Lowercase hex MD5 of the title, the same digest older history files contain.
pub fn title_hash(title: &str) -> String {
    format!("{:x}", Md5::digest(title.as_bytes()))
}

/// Accepts RFC 3339 as well as offset-less ISO-8601, which is read as host-local time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|dt| dt.fixed_offset())
}

/// The tail of `history` that fits under [`MAX_HISTORY_ENTRIES`], oldest dropped first.
pub fn retain_recent(history: &[PostHistoryEntry]) -> &[PostHistoryEntry] {
    let start = history.len().saturating_sub(MAX_HISTORY_ENTRIES);
    &history[start..]
}
