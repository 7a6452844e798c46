// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "storage_error.rs"]
pub mod storage;

pub mod serde_defaults;

#[path = "tokens/mod.rs"]
pub mod tokens;

#[path = "history/mod.rs"]
pub mod history;

#[path = "content/mod.rs"]
pub mod content;

#[path = "publishing/mod.rs"]
pub mod publishing;
