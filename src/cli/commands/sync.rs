// Drive to notes sync. Only the credential check and the status log exist so
// far; no files are transferred.

use anyhow::Context;
use chrono::Local;
use serde::Serialize;
use std::path::Path;

use crate::config::SyncConfig;

#[derive(Debug, Serialize)]
pub struct SyncReport {
    pub timestamp: String,
    pub status: String,
    pub message: String,
    pub files_checked: u32,
    pub files_synced: u32,
}

impl SyncReport {
    pub fn checked_only() -> Self {
        Self {
            timestamp: Local::now().to_rfc3339(),
            status: "success".to_string(),
            message: "Sync check completed (file transfer not implemented yet)".to_string(),
            files_checked: 0,
            files_synced: 0,
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    println!("🔄 Starting Google Drive → notes sync...");
    let config = SyncConfig::from_env().context("Sync credentials are not configured")?;
    tracing::debug!(
        credentials_len = config.google_credentials.len(),
        notion_token_len = config.notion_token.len(),
        "Sync credentials present"
    );
    println!("✅ Credentials found");
    println!("📂 Checking Google Drive for changes...");

    let report = SyncReport::checked_only();
    write_log(&config.log_file, &report).await?;

    println!("✅ {}", report.message);
    Ok(())
}

pub async fn write_log(path: &Path, report: &SyncReport) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(report)?;
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("Failed to write sync log to {}", path.display()))?;
    tracing::info!(path = %path.display(), "Wrote sync log");
    Ok(())
}
