use super::token_models::TokenRecord;
use crate::core::storage::StoreError;
use async_trait::async_trait;

/// Durable home of the single OAuth token record.
///
/// Saving overwrites the previous record; there is no merge.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet.
    async fn load(&self) -> Result<Option<TokenRecord>, StoreError>;
    async fn save(&self, record: &TokenRecord) -> Result<(), StoreError>;
    /// Human-readable location used in log lines and CLI output.
    fn location(&self) -> String;
}

#[async_trait]
impl TokenStore for Box<dyn TokenStore> {
    async fn load(&self) -> Result<Option<TokenRecord>, StoreError> {
        (**self).load().await
    }

    async fn save(&self, record: &TokenRecord) -> Result<(), StoreError> {
        (**self).save(record).await
    }

    fn location(&self) -> String {
        (**self).location()
    }
}
