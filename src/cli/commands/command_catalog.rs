// Subcommands. Each one builds its own services from the environment.

pub mod authorize;

pub mod publish;

pub mod sync;

pub mod token;

use crate::config::AuthConfig;
use crate::core::tokens::{DynTokenService, OAuthClient, TokenService, TokenStore};
use crate::infra::google::GoogleOAuthClient;
use crate::infra::storage::JsonTokenStore;

/// Token service backed by Google's token endpoint and the JSON token file.
pub fn token_service(auth: &AuthConfig, http: reqwest::Client) -> DynTokenService {
    let client: Box<dyn OAuthClient> = Box::new(GoogleOAuthClient::new(http));
    let store: Box<dyn TokenStore> = Box::new(JsonTokenStore::new(&auth.token_file));
    TokenService::new(client, store, auth.oauth.clone())
}
