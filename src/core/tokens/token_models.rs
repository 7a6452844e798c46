use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A token closer than this to its expiry is treated as expired.
pub const EXPIRY_MARGIN_SECS: i64 = 300;

/// Upper bound on a single token lifetime, so a bogus `expires_in` cannot overflow.
const MAX_LIFETIME_SECS: i64 = 60 * 60 * 24 * 365;

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// The registered OAuth client plus the scopes we ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthApp {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

/// Raw payload returned by the token endpoint for both code exchange and refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// The persisted credential bundle needed to call the Blogger API.
///
/// On disk the timestamps are Unix seconds. Older token files used `token`
/// for the access token, so that key is accepted when reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    #[serde(alias = "token")]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default, with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,
    #[serde(default, with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Builds a fresh record from an authorization-code exchange.
    /// `expires_at` is always `issued_at + expires_in`.
    pub fn from_grant(grant: TokenGrant, issued_at: DateTime<Utc>) -> Self {
        let expires_at = issued_at + lifetime(grant.expires_in);
        Self {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token.filter(|t| !t.is_empty()),
            token_type: grant.token_type,
            expires_in: grant.expires_in,
            issued_at,
            expires_at,
        }
    }

    /// Overwrites the access token and expiry after a refresh.
    ///
    /// Google usually omits `refresh_token` on refresh; the stored one is kept
    /// in that case.
    pub fn apply_refresh(&mut self, grant: TokenGrant, now: DateTime<Utc>) {
        self.access_token = grant.access_token;
        self.token_type = grant.token_type;
        self.expires_in = grant.expires_in;
        self.issued_at = now;
        self.expires_at = now + lifetime(grant.expires_in);
        if let Some(refresh_token) = grant.refresh_token.filter(|t| !t.is_empty()) {
            self.refresh_token = Some(refresh_token);
        }
    }

    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Access token with everything but the first few characters masked.
    pub fn masked_access_token(&self) -> String {
        let prefix: String = self.access_token.chars().take(10).collect();
        format!("{}...", prefix)
    }
}

fn lifetime(expires_in: Option<u64>) -> Duration {
    let secs = expires_in
        .map(|s| i64::try_from(s).unwrap_or(MAX_LIFETIME_SECS))
        .unwrap_or(0)
        .min(MAX_LIFETIME_SECS);
    Duration::seconds(secs)
}

/// Where a run stands with respect to its credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    /// No token file (or an unreadable one): the consent flow has to run.
    Missing,
    /// Access token usable for at least `EXPIRY_MARGIN_SECS` more.
    Valid { remaining: Duration },
    /// Access token expired or about to; `refreshable` says whether a refresh token exists.
    Expired { refreshable: bool },
}

impl TokenStatus {
    pub fn of(record: Option<&TokenRecord>, now: DateTime<Utc>) -> Self {
        let Some(record) = record else {
            return TokenStatus::Missing;
        };

        let margin = Duration::seconds(EXPIRY_MARGIN_SECS);
        if !record.access_token.is_empty() && record.expires_at > now + margin {
            TokenStatus::Valid {
                remaining: record.expires_at - now,
            }
        } else {
            TokenStatus::Expired {
                refreshable: record.has_refresh_token(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn grant(refresh: Option<&str>, expires_in: Option<u64>) -> TokenGrant {
        TokenGrant {
            access_token: "ya29.access".to_string(),
            refresh_token: refresh.map(str::to_string),
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }

    #[test]
    fn expiry_is_issue_time_plus_lifetime() {
        let issued = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let record = TokenRecord::from_grant(grant(Some("1//refresh"), Some(3599)), issued);

        assert_eq!(record.issued_at, issued);
        assert_eq!(record.expires_at, issued + Duration::seconds(3599));
        assert!(record.has_refresh_token());
    }

    #[test]
    fn missing_refresh_token_is_still_a_usable_record() {
        let issued = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let record = TokenRecord::from_grant(grant(None, None), issued);

        assert!(!record.has_refresh_token());
        assert_eq!(record.expires_at, issued);
    }

    #[test]
    fn refresh_keeps_existing_refresh_token_when_omitted() {
        let issued = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let mut record = TokenRecord::from_grant(grant(Some("1//refresh"), Some(3600)), issued);

        let later = issued + Duration::hours(2);
        let mut renewed = grant(None, Some(3600));
        renewed.access_token = "ya29.renewed".to_string();
        record.apply_refresh(renewed, later);

        assert_eq!(record.access_token, "ya29.renewed");
        assert_eq!(record.refresh_token.as_deref(), Some("1//refresh"));
        assert_eq!(record.expires_at, later + Duration::hours(1));
    }

    #[test]
    fn token_file_uses_unix_seconds_and_accepts_legacy_key() {
        let json = r#"{
            "token": "legacy-access",
            "refresh_token": "1//refresh",
            "token_type": "Bearer",
            "expires_in": 3599,
            "issued_at": 1700000000,
            "expires_at": 1700003599
        }"#;

        let record: TokenRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.access_token, "legacy-access");
        assert_eq!(record.issued_at.timestamp(), 1_700_000_000);

        let written = serde_json::to_value(&record).unwrap();
        assert_eq!(written["access_token"], "legacy-access");
        assert_eq!(written["expires_at"], 1_700_003_599);
    }

    #[test]
    fn status_reflects_expiry_margin() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let mut record = TokenRecord::from_grant(grant(Some("1//refresh"), Some(3600)), now);

        assert!(matches!(
            TokenStatus::of(Some(&record), now),
            TokenStatus::Valid { .. }
        ));

        record.expires_at = now + Duration::seconds(EXPIRY_MARGIN_SECS);
        assert_eq!(
            TokenStatus::of(Some(&record), now),
            TokenStatus::Expired { refreshable: true }
        );

        assert_eq!(TokenStatus::of(None, now), TokenStatus::Missing);
    }
}
