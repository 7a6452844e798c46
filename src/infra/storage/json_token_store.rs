use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::core::storage::StoreError;
use crate::core::tokens::{TokenRecord, TokenStore};

/// OAuth token kept as a single JSON object on disk.
pub struct JsonTokenStore {
    path: PathBuf,
}

impl JsonTokenStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl TokenStore for JsonTokenStore {
    async fn load(&self) -> Result<Option<TokenRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(&self.path).await?;
        let record: TokenRecord = serde_json::from_str(&text)?;
        Ok(Some(record))
    }

    async fn save(&self, record: &TokenRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let text = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, text).await?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tokens::TokenGrant;
    use chrono::{TimeZone, Utc};

    fn record() -> TokenRecord {
        TokenRecord::from_grant(
            TokenGrant {
                access_token: "ya29.abc".to_string(),
                refresh_token: Some("1//xyz".to_string()),
                token_type: "Bearer".to_string(),
                expires_in: Some(3599),
            },
            Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn missing_file_is_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonTokenStore::new(dir.path().join("blogger_token.json"));

        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn saved_token_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonTokenStore::new(dir.path().join("secrets/blogger_token.json"));

        store.save(&record()).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();

        assert_eq!(loaded, record());
        let raw = std::fs::read_to_string(dir.path().join("secrets/blogger_token.json")).unwrap();
        assert!(raw.contains("\"expires_at\""));
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blogger_token.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonTokenStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
