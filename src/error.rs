//! Error types for the Basecamp CLI
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for the Basecamp CLI
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Account ID is required. Either provide --account-id or configure it during 'basecamp auth --account-id <ID>'.")]
    MissingAccountId,

    #[error("Invalid value for '{field}': {message}")]
    InvalidArgument { field: String, message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("No access token available. Please authenticate first.")]
    NotAuthenticated,

    #[error("OAuth2 not configured. Please run 'basecamp configure' first.")]
    OAuthNotConfigured,

    #[error("Token refresh failed: {message}")]
    TokenRefresh { message: String },

    #[error("OAuth2 error: {message}")]
    OAuth2 { message: String },

    #[error("Token storage error: {message}")]
    TokenStore { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Pagination Errors
    // ============================================================================
    #[error("Fetch failed after {items_so_far} item(s): {source}")]
    FetchFailed {
        items_so_far: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Cursor {cursor} is not understood by this endpoint")]
    UnsupportedCursor { cursor: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("Aborted")]
    Aborted,

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a token store error
    pub fn token_store(message: impl Into<String>) -> Self {
        Self::TokenStore {
            message: message.into(),
        }
    }

    /// Create an API status error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Wrap a transport error raised while walking pages
    pub fn fetch_failed(items_so_far: usize, source: Error) -> Self {
        Self::FetchFailed {
            items_so_far,
            source: Box::new(source),
        }
    }
}

/// Result type alias for the Basecamp CLI
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::api(404, "Not found");
        assert_eq!(err.to_string(), "API request failed (404): Not found");

        let err = Error::NotAuthenticated;
        assert_eq!(
            err.to_string(),
            "No access token available. Please authenticate first."
        );
    }

    #[test]
    fn test_fetch_failed_keeps_source() {
        let err = Error::fetch_failed(42, Error::api(500, "boom"));
        assert_eq!(
            err.to_string(),
            "Fetch failed after 42 item(s): API request failed (500): boom"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
