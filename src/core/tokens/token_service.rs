// Token lifecycle for the Blogger API: consent URL, code exchange, refresh.
//
// Nothing here talks HTTP directly. The token endpoint sits behind the
// `OAuthClient` trait and the token file behind `TokenStore`, so the whole
// lifecycle can be exercised with fakes.

use super::token_models::{OAuthApp, TokenGrant, TokenRecord};
use super::token_store::TokenStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token endpoint request failed: {0}")]
    Network(String),
    #[error("Token endpoint returned {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Unexpected token endpoint response: {0}")]
    InvalidResponse(String),
}

/// The two calls we make against the OAuth token endpoint. One POST each, no retry.
#[async_trait]
pub trait OAuthClient: Send + Sync {
    async fn exchange_code(&self, app: &OAuthApp, code: &str) -> Result<TokenGrant, TokenError>;
    async fn refresh_token(
        &self,
        app: &OAuthApp,
        refresh_token: &str,
    ) -> Result<TokenGrant, TokenError>;
}

#[async_trait]
impl OAuthClient for Box<dyn OAuthClient> {
    async fn exchange_code(&self, app: &OAuthApp, code: &str) -> Result<TokenGrant, TokenError> {
        (**self).exchange_code(app, code).await
    }

    async fn refresh_token(
        &self,
        app: &OAuthApp,
        refresh_token: &str,
    ) -> Result<TokenGrant, TokenError> {
        (**self).refresh_token(app, refresh_token).await
    }
}

/// Result of a successful code exchange.
#[derive(Debug, Clone)]
pub struct TokenExchange {
    pub record: TokenRecord,
    /// False when writing the token file failed. The record is still usable for this run.
    pub persisted: bool,
}

/// What happened when a run tried to renew its access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Renewed,
    /// No refresh token stored; the existing access token is used as-is.
    NotAttempted,
    /// The refresh call failed; the existing access token is used as-is.
    Failed(String),
}

/// Token service with its collaborators boxed, as wired up by the CLI.
pub type DynTokenService = TokenService<Box<dyn OAuthClient>, Box<dyn TokenStore>>;

pub struct TokenService<C: OAuthClient, S: TokenStore> {
    client: C,
    store: S,
    app: OAuthApp,
}

impl<C, S> TokenService<C, S>
where
    C: OAuthClient,
    S: TokenStore,
{
    pub fn new(client: C, store: S, app: OAuthApp) -> Self {
        Self { client, store, app }
    }

    pub fn authorization_url(&self) -> String {
        build_authorization_url(&self.app)
    }

    pub fn token_location(&self) -> String {
        self.store.location()
    }

    /// Reads the stored record. Unreadable files are logged and treated as absent.
    pub async fn load(&self) -> Option<TokenRecord> {
        match self.store.load().await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    location = %self.store.location(),
                    "Could not read token file: {}",
                    e
                );
                None
            }
        }
    }

    pub async fn exchange_code(&self, code: &str) -> Result<TokenExchange, TokenError> {
        self.exchange_code_at(code, Utc::now()).await
    }

    /// Trades an authorization code for tokens and overwrites the token file.
    pub async fn exchange_code_at(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenExchange, TokenError> {
        let grant = self.client.exchange_code(&self.app, code).await?;
        let record = TokenRecord::from_grant(grant, now);

        if !record.has_refresh_token() {
            tracing::warn!(
                "Token response carried no refresh token; future refreshes will fail. \
                 Make sure the consent URL requests access_type=offline."
            );
        }

        let persisted = match self.store.save(&record).await {
            Ok(()) => {
                tracing::info!(location = %self.store.location(), "Saved OAuth token");
                true
            }
            Err(e) => {
                tracing::error!(
                    location = %self.store.location(),
                    "Failed to save OAuth token: {}",
                    e
                );
                false
            }
        };

        Ok(TokenExchange { record, persisted })
    }

    /// Raw refresh call. Callers that hold a record should prefer [`Self::refresh`].
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenGrant, TokenError> {
        self.client.refresh_token(&self.app, refresh_token).await
    }

    pub async fn refresh(&self, record: &mut TokenRecord) -> RefreshOutcome {
        self.refresh_at(record, Utc::now()).await
    }

    /// Best-effort renewal. On failure `record` is left exactly as it was.
    pub async fn refresh_at(&self, record: &mut TokenRecord, now: DateTime<Utc>) -> RefreshOutcome {
        let Some(refresh_token) = record.refresh_token.clone().filter(|t| !t.is_empty()) else {
            return RefreshOutcome::NotAttempted;
        };

        match self.refresh_access_token(&refresh_token).await {
            Ok(grant) => {
                record.apply_refresh(grant, now);
                if let Err(e) = self.store.save(record).await {
                    tracing::warn!("Refreshed token could not be saved: {}", e);
                }
                tracing::info!(expires_at = %record.expires_at, "Access token refreshed");
                RefreshOutcome::Renewed
            }
            Err(e) => {
                tracing::warn!("Token refresh failed, keeping the stored access token: {}", e);
                RefreshOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Consent URL for the authorization-code flow.
///
/// `access_type=offline` is what makes Google hand out a refresh token;
/// `prompt=consent` makes it do so again on re-authorization.
pub fn build_authorization_url(app: &OAuthApp) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("client_id", &app.client_id)
        .append_pair("redirect_uri", &app.redirect_uri)
        .append_pair("scope", &app.scopes.join(" "))
        .append_pair("response_type", "code")
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent")
        .finish();

    format!("{}?{}", AUTH_ENDPOINT, query)
}
