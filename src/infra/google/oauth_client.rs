// Google OAuth token endpoint, used for both the authorization-code exchange
// and refresh-token renewal. Both are single form POSTs without retry.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::core::tokens::{OAuthApp, OAuthClient, TokenError, TokenGrant};

pub const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Google's error body, e.g. `{"error": "invalid_grant", "error_description": "Bad Request"}`.
#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

pub struct GoogleOAuthClient {
    client: Client,
    token_endpoint: String,
}

impl GoogleOAuthClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            token_endpoint: TOKEN_ENDPOINT.to_string(),
        }
    }

    async fn post_form(&self, form: &[(&str, &str)]) -> Result<TokenGrant, TokenError> {
        let response = self
            .client
            .post(&self.token_endpoint)
            .form(form)
            .send()
            .await
            .map_err(|e| TokenError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TokenError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(TokenError::Http {
                status: status.as_u16(),
                body: describe_error(&text),
            });
        }

        parse_grant(&text)
    }
}

#[async_trait]
impl OAuthClient for GoogleOAuthClient {
    async fn exchange_code(&self, app: &OAuthApp, code: &str) -> Result<TokenGrant, TokenError> {
        tracing::debug!("Exchanging authorization code for tokens");
        self.post_form(&[
            ("client_id", app.client_id.as_str()),
            ("client_secret", app.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", app.redirect_uri.as_str()),
        ])
        .await
    }

    async fn refresh_token(
        &self,
        app: &OAuthApp,
        refresh_token: &str,
    ) -> Result<TokenGrant, TokenError> {
        tracing::debug!("Refreshing access token");
        self.post_form(&[
            ("client_id", app.client_id.as_str()),
            ("client_secret", app.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ])
        .await
    }
}

fn parse_grant(text: &str) -> Result<TokenGrant, TokenError> {
    let grant: TokenGrant =
        serde_json::from_str(text).map_err(|e| TokenError::InvalidResponse(e.to_string()))?;

    if grant.access_token.is_empty() {
        return Err(TokenError::InvalidResponse(
            "response carried an empty access_token".to_string(),
        ));
    }
    Ok(grant)
}

fn describe_error(body: &str) -> String {
    match serde_json::from_str::<OAuthErrorResponse>(body) {
        Ok(err) => match err.error_description {
            Some(description) => format!("{} ({})", err.error, description),
            None => err.error,
        },
        Err(_) => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_code_exchange_response() {
        let grant = parse_grant(
            r#"{"access_token": "ya29.a0", "expires_in": 3599, "refresh_token": "1//0g",
                "scope": "https://www.googleapis.com/auth/blogger", "token_type": "Bearer"}"#,
        )
        .unwrap();

        assert_eq!(grant.access_token, "ya29.a0");
        assert_eq!(grant.refresh_token.as_deref(), Some("1//0g"));
        assert_eq!(grant.expires_in, Some(3599));
    }

    #[test]
    fn refresh_response_without_refresh_token() {
        let grant = parse_grant(r#"{"access_token": "ya29.b1", "expires_in": 3599}"#).unwrap();
        assert!(grant.refresh_token.is_none());
        assert_eq!(grant.token_type, "Bearer");
    }

    #[test]
    fn rejects_missing_access_token() {
        assert!(matches!(
            parse_grant(r#"{"token_type": "Bearer"}"#),
            Err(TokenError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_grant(r#"{"access_token": ""}"#),
            Err(TokenError::InvalidResponse(_))
        ));
    }

    #[test]
    fn error_bodies_are_summarised() {
        assert_eq!(
            describe_error(r#"{"error": "invalid_grant", "error_description": "Bad Request"}"#),
            "invalid_grant (Bad Request)"
        );
        assert_eq!(describe_error("<html>oops</html>"), "<html>oops</html>");
    }
}
