//! Authentication module
//!
//! Supports: Basecamp Launchpad OAuth2 (web_server flow + refresh), a
//! keyring token store with a file fallback, and a localhost redirect
//! listener.
//!
//! The `Authenticator` applies the bearer token to API requests and
//! refreshes expired tokens when OAuth settings are available.

mod authenticator;
mod callback;
mod oauth;
mod store;
mod types;

pub use authenticator::Authenticator;
pub use callback::{callback_address, wait_for_code, CALLBACK_TIMEOUT};
pub use oauth::{OAuthClient, AUTHORIZATION_URL, TOKEN_URL};
pub use store::{keyring_available, TokenStore, DEFAULT_ACCOUNT_KEY, KEYRING_SERVICE};
pub use types::{mask_token, StoredTokens, TokenResponse};
