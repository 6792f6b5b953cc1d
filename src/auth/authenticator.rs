//! Authenticator implementation
//!
//! Handles applying the bearer token to requests and refreshing stored
//! tokens once they expire.

use super::oauth::OAuthClient;
use super::store::TokenStore;
use super::types::StoredTokens;
use crate::error::{Error, Result};
use reqwest::RequestBuilder;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Where access tokens come from
#[derive(Debug, Clone)]
enum TokenSource {
    /// A fixed token (tests, scripted use)
    Static(String),
    /// The on-disk token store, refreshed through Launchpad when possible
    Stored {
        store: TokenStore,
        oauth: Option<OAuthClient>,
    },
}

/// Authenticator applies `Authorization: Bearer …` to HTTP requests
#[derive(Debug, Clone)]
pub struct Authenticator {
    source: TokenSource,
    /// Tokens read from the store for this invocation
    cached: Arc<RwLock<Option<StoredTokens>>>,
}

impl Authenticator {
    /// Authenticate every request with a fixed token
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            source: TokenSource::Static(token.into()),
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Authenticate with tokens from a store, without refresh support
    pub fn from_store(store: TokenStore) -> Self {
        Self {
            source: TokenSource::Stored { store, oauth: None },
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Authenticate with tokens from a store, refreshing through `oauth`
    pub fn with_refresh(store: TokenStore, oauth: OAuthClient) -> Self {
        Self {
            source: TokenSource::Stored {
                store,
                oauth: Some(oauth),
            },
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Apply authentication to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.access_token().await?;
        Ok(req.bearer_auth(token))
    }

    /// Get a usable access token, refreshing if necessary
    pub async fn access_token(&self) -> Result<String> {
        let (store, oauth) = match &self.source {
            TokenSource::Static(token) => return Ok(token.clone()),
            TokenSource::Stored { store, oauth } => (store, oauth.as_ref()),
        };

        {
            let cached = self.cached.read().await;
            if let Some(tokens) = cached.as_ref() {
                if !tokens.needs_refresh() {
                    return Ok(tokens.access_token.clone());
                }
            }
        }

        let mut cached = self.cached.write().await;

        // Double-check after acquiring the write lock
        if let Some(tokens) = cached.as_ref() {
            if !tokens.needs_refresh() {
                return Ok(tokens.access_token.clone());
            }
        }

        let tokens = store.get()?.ok_or(Error::NotAuthenticated)?;
        if tokens.access_token.is_empty() {
            return Err(Error::NotAuthenticated);
        }

        let tokens = match (tokens.needs_refresh(), oauth, tokens.refresh_token.clone()) {
            (true, Some(oauth), Some(refresh_token)) => {
                info!("Access token expired, refreshing");
                let response = oauth.refresh(&refresh_token).await?;
                let mut refreshed = StoredTokens::from_response(response);
                // Launchpad keeps the refresh token stable across refreshes
                if refreshed.refresh_token.is_none() {
                    refreshed.refresh_token = Some(refresh_token);
                }
                store.store(&refreshed)?;
                refreshed
            }
            (true, _, _) => {
                debug!("Access token expired and cannot be refreshed, trying it anyway");
                tokens
            }
            (false, _, _) => tokens,
        };

        let token = tokens.access_token.clone();
        *cached = Some(tokens);
        Ok(token)
    }
}
