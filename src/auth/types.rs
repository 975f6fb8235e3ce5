//! Auth runtime types
//!
//! Tokens as received from and cached for the token endpoint, and the
//! credential placements produced for a request.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderName, HeaderValue, COOKIE};
use reqwest::Request;
use serde::{Deserialize, Serialize};

// ============================================================================
// Tokens
// ============================================================================

/// OAuth2 token endpoint response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token_type: String,
    pub access_token: String,
    /// Lifetime in seconds; tokens without one live until invalidated
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub access_token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(access_token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            access_token,
            expires_at,
        }
    }

    /// Create a token that expires in N seconds from now
    ///
    /// Lifetimes too long for `DateTime` never expire; too far in the past
    /// are already expired.
    pub fn expires_in(access_token: String, seconds: i64) -> Self {
        let expires_at = match chrono::Duration::try_seconds(seconds)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        {
            Some(at) => Some(at),
            None if seconds < 0 => Some(DateTime::<Utc>::MIN_UTC),
            None => None,
        };
        Self {
            access_token,
            expires_at,
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() >= expires_at,
            None => false, // No expiration = never expires
        }
    }
}

impl From<TokenResponse> for CachedToken {
    fn from(response: TokenResponse) -> Self {
        match response.expires_in {
            Some(secs) => CachedToken::expires_in(response.access_token, secs),
            None => CachedToken::new(response.access_token, None),
        }
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// A credential ready to be placed on a request
#[derive(Debug, Clone)]
pub enum Credential {
    /// Set a header, replacing any previous value
    Header { name: HeaderName, value: HeaderValue },
    /// `name=value` pair added to the `Cookie` header
    Cookie(String),
    /// `name=value` pair appended to the query string
    Query(String),
}

impl Credential {
    /// Build a header credential, validating name and value
    pub fn header(name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::invalid_header(format!("'{name}': {e}")))?;
        let mut value = HeaderValue::from_str(value)
            .map_err(|e| Error::invalid_header(format!("value for '{name}': {e}")))?;
        value.set_sensitive(true);
        Ok(Credential::Header { name, value })
    }

    /// Place this credential on the request
    pub fn apply(&self, request: &mut Request) -> Result<()> {
        match self {
            Credential::Header { name, value } => {
                request.headers_mut().insert(name.clone(), value.clone());
            }
            Credential::Cookie(pair) => {
                let mut cookie = request
                    .headers()
                    .get(COOKIE)
                    .map(|existing| existing.as_bytes().to_vec())
                    .unwrap_or_default();
                if !cookie.is_empty() {
                    cookie.extend_from_slice(b"; ");
                }
                cookie.extend_from_slice(pair.as_bytes());
                let mut value = HeaderValue::from_bytes(&cookie)
                    .map_err(|e| Error::invalid_header(format!("cookie: {e}")))?;
                value.set_sensitive(true);
                request.headers_mut().insert(COOKIE, value);
            }
            Credential::Query(pair) => {
                let url = request.url_mut();
                let query = match url.query() {
                    Some(existing) if !existing.is_empty() => format!("{existing}&{pair}"),
                    _ => pair.clone(),
                };
                url.set_query(Some(&query));
            }
        }
        Ok(())
    }
}
