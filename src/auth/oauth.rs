//! Basecamp Launchpad OAuth2 client
//!
//! Builds the authorization URL and talks to the token endpoint for the
//! `web_server` code exchange and for refreshes.

use super::types::TokenResponse;
use crate::config::OAuthSettings;
use crate::error::{Error, Result};
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Launchpad authorization page
pub const AUTHORIZATION_URL: &str = "https://launchpad.37signals.com/authorization/new";

/// Launchpad token endpoint
pub const TOKEN_URL: &str = "https://launchpad.37signals.com/authorization/token";

/// OAuth2 client for Basecamp Launchpad
#[derive(Debug, Clone)]
pub struct OAuthClient {
    settings: OAuthSettings,
    authorization_url: String,
    token_url: String,
    http_client: Client,
}

impl OAuthClient {
    /// Create a client for the production Launchpad endpoints
    pub fn new(settings: OAuthSettings) -> Self {
        Self {
            settings,
            authorization_url: AUTHORIZATION_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            http_client: Client::new(),
        }
    }

    /// Point the client at other endpoints
    #[must_use]
    pub fn with_endpoints(
        mut self,
        authorization_url: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        self.authorization_url = authorization_url.into();
        self.token_url = token_url.into();
        self
    }

    /// Application credentials
    pub fn settings(&self) -> &OAuthSettings {
        &self.settings
    }

    /// URL the user opens to grant access
    pub fn authorization_url(&self, account_id: Option<u64>) -> Result<String> {
        let mut url = Url::parse(&self.authorization_url)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("type", "web_server")
                .append_pair("client_id", &self.settings.client_id)
                .append_pair("redirect_uri", &self.settings.redirect_uri);
            if let Some(id) = account_id {
                query.append_pair("account_id", &id.to_string());
            }
        }
        Ok(url.into())
    }

    /// Exchange an authorization code for tokens
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        let form = [
            ("type", "web_server"),
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("redirect_uri", self.settings.redirect_uri.as_str()),
            ("code", code),
        ];

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::OAuth2 {
                message: format!("Error exchanging authorization code ({status}): {body}"),
            });
        }

        debug!("Authorization code exchanged");
        let token_response: TokenResponse = response.json().await.map_err(Error::Http)?;
        Ok(token_response)
    }

    /// Trade a refresh token for a new access token
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse> {
        let form = [
            ("type", "refresh"),
            ("refresh_token", refresh_token),
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("redirect_uri", self.settings.redirect_uri.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TokenRefresh {
                message: format!("Refresh token request failed with status {status}: {body}"),
            });
        }

        debug!("Access token refreshed");
        let token_response: TokenResponse = response.json().await.map_err(Error::Http)?;
        Ok(token_response)
    }
}
