//! Token types
//!
//! What Launchpad returns, what we persist, and how tokens are shown.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tokens persisted for one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    /// The access token
    pub access_token: String,
    /// Refresh token, when Launchpad issued one
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// When the access token expires
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredTokens {
    /// Create tokens that never expire
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
        }
    }

    /// Build from a token endpoint response, computing the expiry from now
    pub fn from_response(response: TokenResponse) -> Self {
        let expires_at = response
            .expires_in
            .filter(|secs| *secs > 0)
            .map(|secs| Utc::now() + chrono::Duration::seconds(secs));
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at,
        }
    }

    /// Check if the access token is expired (no expiry = never expires)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() >= expires_at,
            None => false,
        }
    }

    /// Expired, or about to expire within 30 seconds
    pub fn needs_refresh(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() + chrono::Duration::seconds(30) >= expires_at,
            None => false,
        }
    }
}

/// Launchpad token endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Mask a token for display: first 8 and last 4 characters
pub fn mask_token(token: &str) -> Option<String> {
    let chars: Vec<char> = token.chars().collect();
    match chars.len() {
        0 => None,
        n if n <= 12 => Some("*".repeat(n)),
        n => {
            let head: String = chars[..8].iter().collect();
            let tail: String = chars[n - 4..].iter().collect();
            Some(format!("{head}...{tail}"))
        }
    }
}
