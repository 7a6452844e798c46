pub mod history_guard;
pub mod history_models;
pub mod history_store;

pub use history_guard::{HistoryGuard, PostingCalendar, TopicSelection};
pub use history_models::{retain_recent, PostHistoryEntry};
pub use history_store::HistoryStore;
