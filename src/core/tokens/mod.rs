pub mod token_models;
pub mod token_service;
pub mod token_store;

pub use token_models::{OAuthApp, TokenGrant, TokenRecord, TokenStatus};
pub use token_service::{
    DynTokenService, OAuthClient, RefreshOutcome, TokenError, TokenExchange, TokenService,
};
pub use token_store::TokenStore;
