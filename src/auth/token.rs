//! OAuth2 client credentials token cache
//!
//! At most one token is cached. It is fetched lazily, refreshed once expired
//! and dropped on invalidation.

use super::types::{CachedToken, TokenResponse};
use crate::config::AuthSettings;
use crate::error::{Error, Result};
use crate::types::{encode_credentials, encode_pair};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use url::Url;

/// Something that can issue access tokens
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Request a new token
    async fn fetch_token(&self) -> Result<TokenResponse>;
}

// ============================================================================
// Client credentials source
// ============================================================================

/// Fetches tokens from the configured token endpoint
pub struct ClientCredentialsSource {
    http_client: Client,
    base_uri: Url,
    token_endpoint: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    /// Form body, built once; `None` without a grant type
    body: Option<String>,
}

impl ClientCredentialsSource {
    /// Create a source from settings
    pub fn from_settings(settings: &AuthSettings, http_client: Client) -> Result<Self> {
        let body = settings
            .grant_type
            .as_deref()
            .filter(|grant| !grant.is_empty())
            .map(|grant| {
                token_request_body(
                    grant,
                    settings.username.as_deref(),
                    settings.password.as_deref(),
                )
            });

        Ok(Self {
            http_client,
            base_uri: settings.parsed_base_uri()?,
            token_endpoint: settings.token_endpoint.clone(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            body,
        })
    }

    /// Token endpoint, taken as-is when absolute, otherwise as a path on
    /// the base URI
    pub fn token_uri(&self) -> Result<Url> {
        let endpoint = self
            .token_endpoint
            .as_deref()
            .ok_or_else(|| Error::missing_config("token_endpoint"))?;

        match Url::parse(endpoint) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let mut url = self.base_uri.clone();
                url.set_path(endpoint);
                Ok(url)
            }
            Err(e) => Err(Error::token_fetch(format!(
                "Failed to construct the token endpoint URL from '{endpoint}': {e}"
            ))),
        }
    }

    /// Form body sent to the token endpoint
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

#[async_trait]
impl TokenSource for ClientCredentialsSource {
    async fn fetch_token(&self) -> Result<TokenResponse> {
        let body = self
            .body
            .clone()
            .ok_or_else(|| Error::missing_config("grant_type"))?;
        let client_id = self
            .client_id
            .as_deref()
            .ok_or_else(|| Error::missing_config("client_id"))?;
        let client_secret = self
            .client_secret
            .as_deref()
            .ok_or_else(|| Error::missing_config("client_secret"))?;
        let uri = self.token_uri()?;

        info!("Fetching OAuth2 access token from {}", uri);

        let response = self
            .http_client
            .post(uri)
            .header(
                AUTHORIZATION,
                format!("Basic {}", encode_credentials(client_id, client_secret)),
            )
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::token_fetch(format!(
                "Token request failed with status {status}: {body}"
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| Error::token_fetch(format!("Invalid token response: {e}")))
    }
}

/// `grant_type` plus non-empty `username` and `password`, form encoded
fn token_request_body(grant_type: &str, username: Option<&str>, password: Option<&str>) -> String {
    let mut params = vec![("grant_type", grant_type)];
    if let Some(username) = username.filter(|u| !u.is_empty()) {
        params.push(("username", username));
    }
    if let Some(password) = password.filter(|p| !p.is_empty()) {
        params.push(("password", password));
    }

    params
        .into_iter()
        .map(|(key, value)| encode_pair(key, value))
        .collect::<Vec<_>>()
        .join("&")
}

// ============================================================================
// Token cache
// ============================================================================

#[derive(Debug, Default)]
struct TokenState {
    token: Option<CachedToken>,
    /// Bumped by every invalidation
    epoch: u64,
}

/// Lazily fetched, expiring, invalidatable access token
pub struct TokenCache {
    source: Arc<dyn TokenSource>,
    state: RwLock<TokenState>,
    /// Serializes fetches so one validity window gets one token
    refresh: Mutex<()>,
}

impl TokenCache {
    /// Create an empty cache over a token source
    pub fn new(source: Arc<dyn TokenSource>) -> Self {
        Self {
            source,
            state: RwLock::new(TokenState::default()),
            refresh: Mutex::new(()),
        }
    }

    /// Get a valid access token, fetching one if needed
    pub async fn current_token(&self) -> Result<String> {
        if let Some(token) = self.cached().await {
            debug!("Using cached OAuth2 token");
            return Ok(token);
        }

        let _refresh = self.refresh.lock().await;

        // Another caller may have fetched while we waited
        let epoch = {
            let state = self.state.read().await;
            if let Some(token) = state.token.as_ref().filter(|t| !t.is_expired()) {
                return Ok(token.access_token.clone());
            }
            state.epoch
        };

        let fresh = CachedToken::from(self.source.fetch_token().await?);
        let access_token = fresh.access_token.clone();

        let mut state = self.state.write().await;
        if state.epoch == epoch {
            state.token = Some(fresh);
        } else {
            // An invalidation landed mid-fetch; do not resurrect the cache
            debug!("Token cache invalidated during fetch, not caching new token");
        }

        Ok(access_token)
    }

    /// Drop the cached token; the next `current_token` fetches a new one
    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        state.token = None;
        state.epoch = state.epoch.wrapping_add(1);
    }

    /// Whether a non-expired token is cached
    pub async fn is_valid(&self) -> bool {
        self.cached().await.is_some()
    }

    async fn cached(&self) -> Option<String> {
        let state = self.state.read().await;
        state
            .token
            .as_ref()
            .filter(|t| !t.is_expired())
            .map(|t| t.access_token.clone())
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache").finish_non_exhaustive()
    }
}
