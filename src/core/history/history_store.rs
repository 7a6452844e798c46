use super::history_models::PostHistoryEntry;
use crate::core::storage::StoreError;
use async_trait::async_trait;

/// Persistence for the post history log.
///
/// `load` never fails: a missing or unreadable file is an empty history.
/// `save` overwrites the whole log, keeping only the most recent entries.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn load(&self) -> Vec<PostHistoryEntry>;
    async fn save(&self, history: &[PostHistoryEntry]) -> Result<(), StoreError>;
}
