//! HTTP client with request authentication
//!
//! Provides a client that handles:
//! - Decorating every request through [`Authentication`]
//! - Reporting response statuses back so stale tokens are dropped
//! - Resending once with fresh credentials after a 401

use crate::error::{Error, Result};
use crate::interceptor::Authentication;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Request, Response, StatusCode};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Number of times a 401 response is retried with fresh credentials
    pub max_auth_retries: u32,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_auth_retries: 1,
            default_headers: HashMap::new(),
            user_agent: format!("openapi-auth/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set how many times a 401 is retried
    pub fn max_auth_retries(mut self, retries: u32) -> Self {
        self.config.max_auth_retries = retries;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client that authenticates every request it sends
pub struct AuthenticatedClient {
    client: Client,
    config: HttpClientConfig,
    auth: Arc<Authentication>,
}

impl AuthenticatedClient {
    /// Create a client with default configuration
    pub fn new(auth: Arc<Authentication>) -> Result<Self> {
        Self::with_config(auth, HttpClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(auth: Arc<Authentication>, config: HttpClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (key, value) in &config.default_headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| Error::invalid_header(format!("{key}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::invalid_header(format!("{key}: {e}")))?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            config,
            auth,
        })
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Interceptor used for every request
    pub fn authentication(&self) -> &Authentication {
        &self.auth
    }

    /// Make a GET request for the operation at `path`
    pub async fn get(&self, url: &str, path: &str) -> Result<Response> {
        let request = self.client.request(Method::GET, url).build()?;
        self.execute(request, path).await
    }

    /// Authenticate and send `request`, an operation on `path`
    ///
    /// A 401 drops the cached token. If retries are configured and the
    /// request body can be cloned, the request is decorated again and resent.
    pub async fn execute(&self, request: Request, path: &str) -> Result<Response> {
        let method = request.method().clone();
        let mut attempt = 0;
        let mut pending = request;

        loop {
            let retry = if attempt < self.config.max_auth_retries {
                pending.try_clone()
            } else {
                None
            };

            let decorated = self.auth.decorate(pending, path).await?;
            let response = self.client.execute(decorated).await?;
            let status = response.status();
            self.auth.observe_status(status).await;

            match retry {
                Some(next) if status == StatusCode::UNAUTHORIZED => {
                    warn!(
                        "{} {} returned 401, attempt {}/{}, retrying with fresh credentials",
                        method,
                        path,
                        attempt + 1,
                        self.config.max_auth_retries + 1
                    );
                    attempt += 1;
                    pending = next;
                }
                _ => {
                    debug!("{} {} completed with {}", method, path, status.as_u16());
                    return Ok(response);
                }
            }
        }
    }
}

impl std::fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
