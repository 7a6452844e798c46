// Runtime configuration, read once at startup from the environment (after
// `.env` has been loaded). Library code never looks at env vars itself.

use crate::core::history::history_guard::DEFAULT_MAX_POSTS_PER_DAY;
use crate::core::history::PostingCalendar;
use crate::core::tokens::OAuthApp;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8000/callback";
pub const BLOGGER_SCOPE: &str = "https://www.googleapis.com/auth/blogger";
pub const DEFAULT_TOKEN_FILE: &str = "blogger_token.json";
pub const DEFAULT_HISTORY_FILE: &str = "post_history.json";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TOPIC_RETRY_DELAY_MS: u64 = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing {0} environment variable! Add it to your .env file.")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Everything needed to talk to Google's OAuth endpoints and find the token file.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthConfig {
    pub oauth: OAuthApp,
    pub token_file: PathBuf,
}

/// Settings for a publish run.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub auth: AuthConfig,
    pub blog_id: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub history_file: PathBuf,
    pub max_posts_per_day: usize,
    pub calendar: PostingCalendar,
    pub topic_retry_delay: Duration,
}

/// Credentials checked by the sync command.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    pub google_credentials: String,
    pub notion_token: String,
    pub log_file: PathBuf,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let scopes = optional(&lookup, "BLOGGER_SCOPES")
            .map(|raw| {
                raw.split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|scopes| !scopes.is_empty())
            .unwrap_or_else(|| vec![BLOGGER_SCOPE.to_string()]);

        Ok(Self {
            oauth: OAuthApp {
                client_id: required(&lookup, "GOOGLE_CLIENT_ID")?,
                client_secret: required(&lookup, "GOOGLE_CLIENT_SECRET")?,
                redirect_uri: optional(&lookup, "OAUTH_REDIRECT_URI")
                    .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
                scopes,
            },
            token_file: optional(&lookup, "BLOGGER_TOKEN_FILE")
                .unwrap_or_else(|| DEFAULT_TOKEN_FILE.to_string())
                .into(),
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let auth = AuthConfig::from_lookup(&lookup)?;

        let max_posts_per_day = match optional(&lookup, "MAX_POSTS_PER_DAY") {
            Some(raw) => parse_number::<usize>("MAX_POSTS_PER_DAY", &raw)?,
            None => DEFAULT_MAX_POSTS_PER_DAY,
        };

        let calendar = match optional(&lookup, "BLOG_TIMEZONE") {
            Some(raw) => {
                PostingCalendar::Zone(raw.parse().map_err(|e| ConfigError::Invalid {
                    key: "BLOG_TIMEZONE",
                    reason: format!("{}", e),
                })?)
            }
            None => PostingCalendar::HostLocal,
        };

        let retry_ms = match optional(&lookup, "TOPIC_RETRY_DELAY_MS") {
            Some(raw) => parse_number::<u64>("TOPIC_RETRY_DELAY_MS", &raw)?,
            None => DEFAULT_TOPIC_RETRY_DELAY_MS,
        };

        Ok(Self {
            auth,
            blog_id: required(&lookup, "BLOGGER_BLOG_ID")?,
            gemini_api_key: required(&lookup, "GEMINI_API_KEY")?,
            gemini_model: optional(&lookup, "GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            history_file: optional(&lookup, "POST_HISTORY_FILE")
                .unwrap_or_else(|| DEFAULT_HISTORY_FILE.to_string())
                .into(),
            max_posts_per_day,
            calendar,
            topic_retry_delay: Duration::from_millis(retry_ms),
        })
    }
}

impl SyncConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            google_credentials: required(&lookup, "GOOGLE_CREDENTIALS")?,
            notion_token: required(&lookup, "NOTION_TOKEN")?,
            log_file: optional(&lookup, "SYNC_LOG_FILE")
                .unwrap_or_else(|| "sync_log.json".to_string())
                .into(),
        })
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Trimmed value, with blanks and the `***` placeholder treated as unset.
fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "***")
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or(ConfigError::Missing(key))
}

fn parse_number<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}
