pub mod blogger_client;
pub mod oauth_client;

pub use blogger_client::BloggerClient;
pub use oauth_client::GoogleOAuthClient;
