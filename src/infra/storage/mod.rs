pub mod json_history_store;
pub mod json_token_store;

pub use json_history_store::JsonHistoryStore;
pub use json_token_store::JsonTokenStore;
