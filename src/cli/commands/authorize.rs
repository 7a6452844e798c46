// Browser-based OAuth consent flow.
//
// A small local server handles Google's redirect:
//   /           redirect to the consent screen (or report a still-valid token)
//   /callback   exchange the authorization code and save the token
//   /get_token  show what is stored
// The server stops on its own after a successful exchange, or on Ctrl+C.

use std::sync::Arc;

use anyhow::{bail, Context};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::token_service;
use crate::cli::AuthorizeArgs;
use crate::config::AuthConfig;
use crate::core::tokens::{DynTokenService, TokenExchange, TokenRecord, TokenStatus};

pub struct AuthState {
    tokens: DynTokenService,
    done: Notify,
}

impl AuthState {
    pub fn new(tokens: DynTokenService) -> Self {
        Self {
            tokens,
            done: Notify::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    error: Option<String>,
}

pub async fn run(args: AuthorizeArgs) -> anyhow::Result<()> {
    let auth = AuthConfig::from_env().context("OAuth client is not configured")?;
    let tokens = token_service(&auth, reqwest::Client::new());

    if args.print_url {
        println!("{}", tokens.authorization_url());
        return Ok(());
    }

    if let Some(code) = args.code {
        let exchange = tokens
            .exchange_code(code.trim())
            .await
            .context("Failed to exchange the authorization code")?;
        report_exchange(&exchange, &tokens.token_location());
        return Ok(());
    }

    serve(tokens, &auth.oauth.redirect_uri).await
}

async fn serve(tokens: DynTokenService, redirect_uri: &str) -> anyhow::Result<()> {
    let addr = listen_addr(redirect_uri)?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Could not listen on {}", addr))?;

    let state = Arc::new(AuthState::new(tokens));
    let root_url = format!("http://{}/", addr);

    println!("🔐 Authorization server listening on {}", root_url);
    println!("   Open {} in your browser to grant Blogger access.", root_url);
    println!("   If it does not redirect, use:\n   {}", state.tokens.authorization_url());

    let shutdown_state = Arc::clone(&state);
    axum::serve(listener, router(Arc::clone(&state)))
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = shutdown_state.done.notified() => {
                    tracing::info!("Token saved, stopping authorization server");
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupted, stopping authorization server");
                }
            }
        })
        .await
        .context("Authorization server failed")?;

    Ok(())
}

pub fn router(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/", get(homepage))
        .route("/callback", get(callback))
        .route("/get_token", get(get_token))
        .with_state(state)
}

/// `host:port` taken from the redirect URI, which must point at this machine.
pub fn listen_addr(redirect_uri: &str) -> anyhow::Result<String> {
    let url = url::Url::parse(redirect_uri)
        .with_context(|| format!("Invalid OAUTH_REDIRECT_URI: {}", redirect_uri))?;

    let Some(host) = url.host_str() else {
        bail!("OAUTH_REDIRECT_URI has no host: {}", redirect_uri);
    };
    let port = url.port_or_known_default().unwrap_or(80);

    Ok(format!("{}:{}", host, port))
}

pub async fn homepage(State(state): State<Arc<AuthState>>) -> Response {
    let record = state.tokens.load().await;

    match TokenStatus::of(record.as_ref(), Utc::now()) {
        TokenStatus::Valid { remaining } => Json(json!({
            "message": "Existing token found. Token is still valid.",
            "remaining_minutes": remaining.num_minutes(),
            "token_details": record.as_ref().map(token_summary),
        }))
        .into_response(),
        status => {
            tracing::info!(?status, "No usable token, redirecting to consent screen");
            Redirect::temporary(&state.tokens.authorization_url()).into_response()
        }
    }
}

pub async fn callback(
    State(state): State<Arc<AuthState>>,
    Query(params): Query<CallbackParams>,
) -> Response {
    if let Some(error) = params.error {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("Google OAuth error: {}", error),
        );
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Authorization code not received.".to_string(),
        );
    };

    let preview: String = code.chars().take(10).collect();
    tracing::info!("Received authorization code: {}...", preview);

    match state.tokens.exchange_code(&code).await {
        Ok(exchange) => {
            let location = state.tokens.token_location();
            report_exchange(&exchange, &location);

            if !exchange.persisted {
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Tokens were issued but could not be saved. Check the server logs.".to_string(),
                );
            }

            state.done.notify_one();
            Json(json!({
                "message": "Successfully obtained and saved tokens!",
                "token_details": token_summary(&exchange.record),
                "file_created": location,
            }))
            .into_response()
        }
        Err(e) => {
            tracing::error!("Code exchange failed: {}", e);
            error_response(
                StatusCode::BAD_GATEWAY,
                "Failed to exchange authorization code for tokens. Check server logs.".to_string(),
            )
        }
    }
}

pub async fn get_token(State(state): State<Arc<AuthState>>) -> Response {
    match state.tokens.load().await {
        Some(record) => Json(token_summary(&record)).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            format!(
                "{} not found or could not be read. Please run the OAuth flow first.",
                state.tokens.token_location()
            ),
        ),
    }
}

fn token_summary(record: &TokenRecord) -> serde_json::Value {
    json!({
        "access_token": record.masked_access_token(),
        "has_refresh_token": record.has_refresh_token(),
        "token_type": record.token_type,
        "expires_in": record.expires_in,
        "issued_at": record.issued_at.timestamp(),
        "expires_at": record.expires_at.timestamp(),
    })
}

fn error_response(status: StatusCode, detail: String) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn report_exchange(exchange: &TokenExchange, location: &str) {
    if exchange.persisted {
        println!("✅ Token data saved to {}", location);
    } else {
        println!("❌ Token obtained but could not be saved to {}", location);
    }
    if !exchange.record.has_refresh_token() {
        println!("🚨 WARNING: no refresh token in the response. Future refreshes will fail.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tokens::token_service::tests::{
        stored_record, test_app, FakeOAuthClient, MemoryTokenStore,
    };
    use crate::core::tokens::{OAuthClient, TokenService, TokenStore};

    fn state(client: FakeOAuthClient, store: MemoryTokenStore) -> Arc<AuthState> {
        let tokens = TokenService::new(
            Box::new(client) as Box<dyn OAuthClient>,
            Box::new(store) as Box<dyn TokenStore>,
            test_app(),
        );
        Arc::new(AuthState::new(tokens))
    }

    fn params(code: Option<&str>, error: Option<&str>) -> Query<CallbackParams> {
        Query(CallbackParams {
            code: code.map(str::to_string),
            error: error.map(str::to_string),
        })
    }

    #[test]
    fn listen_addr_follows_redirect_uri() {
        assert_eq!(
            listen_addr("http://localhost:8000/callback").unwrap(),
            "localhost:8000"
        );
        assert_eq!(listen_addr("http://127.0.0.1/cb").unwrap(), "127.0.0.1:80");
        assert!(listen_addr("not a url").is_err());
    }

    #[tokio::test]
    async fn homepage_redirects_without_a_valid_token() {
        let state = state(
            FakeOAuthClient::refreshing_to("x"),
            MemoryTokenStore::with(stored_record(Some("1//r"))),
        );

        let response = homepage(State(state)).await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        let location = response.headers()["location"].to_str().unwrap();
        assert!(location.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
    }

    #[tokio::test]
    async fn homepage_reports_a_valid_token() {
        let mut record = stored_record(Some("1//r"));
        record.expires_at = Utc::now() + chrono::Duration::hours(1);
        let state = state(FakeOAuthClient::refreshing_to("x"), MemoryTokenStore::with(record));

        let response = homepage(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn callback_error_and_missing_code_are_bad_requests() {
        let state = state(FakeOAuthClient::refreshing_to("x"), MemoryTokenStore::default());

        let denied = callback(State(state.clone()), params(None, Some("access_denied"))).await;
        let empty = callback(State(state), params(None, None)).await;

        assert_eq!(denied.status(), StatusCode::BAD_REQUEST);
        assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn callback_saves_token_and_signals_shutdown() {
        let state = state(
            FakeOAuthClient::refreshing_to("ya29.new"),
            MemoryTokenStore::default(),
        );

        let response = callback(State(state.clone()), params(Some("4/0AbCdEf"), None)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let saved = state.tokens.load().await.unwrap();
        assert_eq!(saved.access_token, "ya29.new");
        // notify_one stores a permit, so this resolves immediately.
        tokio::time::timeout(std::time::Duration::from_secs(1), state.done.notified())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn callback_exchange_failure_is_bad_gateway() {
        let state = state(FakeOAuthClient::failing(400), MemoryTokenStore::default());

        let response = callback(State(state.clone()), params(Some("4/0expired"), None)).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(state.tokens.load().await.is_none());
    }

    #[tokio::test]
    async fn get_token_is_not_found_before_authorizing() {
        let state = state(FakeOAuthClient::refreshing_to("x"), MemoryTokenStore::default());
        let response = get_token(State(state)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
