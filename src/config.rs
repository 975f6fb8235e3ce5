//! Credential configuration
//!
//! Static, process-lifetime settings that hold the credential material the
//! interceptor applies. Loaded from YAML with `snake_case` keys.

use crate::error::{Error, Result, ResultExt};
use crate::types::{AuthenticationType, StringMap};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

// ============================================================================
// Auth Settings
// ============================================================================

/// Credentials and defaults used to satisfy security requirements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Base URI of the service; relative token endpoints resolve against it
    pub base_uri: String,

    /// Authentication used when no declared requirement can be satisfied
    #[serde(default)]
    pub authentication_type: AuthenticationType,

    /// HTTP scheme used when a scheme does not name one (e.g. `basic`)
    #[serde(default = "default_authentication_scheme")]
    pub authentication_scheme: String,

    /// Username for HTTP auth and the OAuth2 password grant body
    #[serde(default)]
    pub username: Option<String>,

    /// Password for HTTP auth and the OAuth2 password grant body
    #[serde(default)]
    pub password: Option<String>,

    /// Static token for the HTTP bearer scheme
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// API key name used when a scheme does not declare one
    #[serde(default)]
    pub api_key_name: Option<String>,

    /// Single API key value
    #[serde(default)]
    pub api_key_value: Option<String>,

    /// API key values by key name; takes precedence over `api_key_value`
    #[serde(default)]
    pub api_keys: StringMap,

    /// OAuth2 client id
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth2 client secret
    #[serde(default)]
    pub client_secret: Option<String>,

    /// OAuth2 grant type sent to the token endpoint
    #[serde(default)]
    pub grant_type: Option<String>,

    /// OAuth2 token endpoint, absolute or relative to `base_uri`
    #[serde(default)]
    pub token_endpoint: Option<String>,
}

fn default_authentication_scheme() -> String {
    "basic".to_string()
}

impl AuthSettings {
    /// Create settings with only a base URI
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            authentication_type: AuthenticationType::None,
            authentication_scheme: default_authentication_scheme(),
            username: None,
            password: None,
            bearer_token: None,
            api_key_name: None,
            api_key_value: None,
            api_keys: StringMap::new(),
            client_id: None,
            client_secret: None,
            grant_type: None,
            token_endpoint: None,
        }
    }

    /// Parse settings from YAML and validate them
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse auth settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read auth settings '{}'", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Check the settings that must hold regardless of which scheme is used
    ///
    /// Missing credential values are not errors here; they make individual
    /// requirement alternatives unsatisfiable instead.
    pub fn validate(&self) -> Result<()> {
        let base = self.parsed_base_uri()?;
        if base.cannot_be_a_base() {
            return Err(Error::config(format!(
                "base_uri must be an absolute URL: {}",
                self.base_uri
            )));
        }

        if self.authentication_scheme.is_empty() {
            return Err(Error::config("authentication_scheme cannot be empty"));
        }

        Ok(())
    }

    /// `base_uri` as a URL
    pub fn parsed_base_uri(&self) -> Result<Url> {
        Url::parse(&self.base_uri).map_err(|e| {
            Error::config(format!("Invalid base_uri '{}': {e}", self.base_uri))
        })
    }

    /// Set the fallback authentication type
    #[must_use]
    pub fn with_authentication_type(mut self, kind: AuthenticationType) -> Self {
        self.authentication_type = kind;
        self
    }

    /// Set the fallback HTTP scheme
    #[must_use]
    pub fn with_authentication_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.authentication_scheme = scheme.into();
        self
    }

    /// Set username and password
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the static bearer token
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Set the default API key name
    #[must_use]
    pub fn with_api_key_name(mut self, name: impl Into<String>) -> Self {
        self.api_key_name = Some(name.into());
        self
    }

    /// Set the single API key value
    #[must_use]
    pub fn with_api_key_value(mut self, value: impl Into<String>) -> Self {
        self.api_key_value = Some(value.into());
        self
    }

    /// Add a named API key
    #[must_use]
    pub fn with_api_key(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.api_keys.insert(name.into(), value.into());
        self
    }

    /// Set the OAuth2 client credentials and token endpoint
    #[must_use]
    pub fn with_oauth_client(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_endpoint: impl Into<String>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
        self.token_endpoint = Some(token_endpoint.into());
        self
    }

    /// Set the OAuth2 grant type
    #[must_use]
    pub fn with_grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.grant_type = Some(grant_type.into());
        self
    }
}
