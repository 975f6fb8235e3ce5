//! Credential application
//!
//! Turns a security requirement into concrete credential placements, one
//! strategy per scheme type.

use super::token::TokenCache;
use super::types::Credential;
use crate::config::AuthSettings;
use crate::document::{ApiKeyLocation, OAuthFlows, SecurityRequirement, SecurityScheme};
use crate::error::{Error, Result};
use crate::registry::SchemeRegistry;
use crate::types::{capitalize, encode_credentials, encode_pair, AuthenticationType};
use tracing::debug;

/// Outcome of resolving one requirement alternative
#[derive(Debug)]
pub enum Attempt {
    /// Every scheme of the alternative produced a credential
    Ready(Vec<Credential>),
    /// Some scheme lacks local credentials or cannot be served
    Unsatisfiable(Error),
}

/// Builds credentials for requirements using the configured material
#[derive(Debug)]
pub struct CredentialApplier {
    registry: SchemeRegistry,
    settings: AuthSettings,
    tokens: TokenCache,
}

impl CredentialApplier {
    /// Create an applier
    pub fn new(registry: SchemeRegistry, settings: AuthSettings, tokens: TokenCache) -> Self {
        Self {
            registry,
            settings,
            tokens,
        }
    }

    /// Resolve every scheme of one alternative
    ///
    /// Credential gaps come back as [`Attempt::Unsatisfiable`]; token
    /// endpoint failures and other hard errors are returned as `Err`.
    pub async fn credentials_for(&self, requirement: &SecurityRequirement) -> Result<Attempt> {
        let mut credentials = Vec::with_capacity(requirement.len());

        for (name, scopes) in requirement {
            let credential = match self.registry.require(name) {
                Ok(scheme) => self.credential_for(scheme, scopes).await,
                Err(e) => Err(e),
            };

            match credential {
                Ok(credential) => credentials.push(credential),
                Err(e) if e.is_unsatisfiable() => return Ok(Attempt::Unsatisfiable(e)),
                Err(e) => return Err(e),
            }
        }

        Ok(Attempt::Ready(credentials))
    }

    /// Credential for a single scheme
    pub async fn credential_for(
        &self,
        scheme: &SecurityScheme,
        scopes: &[String],
    ) -> Result<Credential> {
        match scheme {
            SecurityScheme::ApiKey { location, name } => self.api_key(*location, name.as_deref()),
            SecurityScheme::Http { scheme, .. } => self.http(scheme.as_deref()),
            SecurityScheme::OAuth2 { flows } => self.oauth(flows, scopes).await,
            SecurityScheme::Unsupported => Err(Error::unsupported(
                "only apiKey, http and oauth2 security schemes are supported",
            )),
        }
    }

    /// Credential for the configured fallback authentication type
    pub async fn default_credential(&self) -> Result<Option<Credential>> {
        match self.settings.authentication_type {
            AuthenticationType::None => Ok(None),
            AuthenticationType::ApiKey => self.api_key(Some(ApiKeyLocation::Header), None).map(Some),
            AuthenticationType::Http => self.http(None).map(Some),
            AuthenticationType::Oauth => self.oauth(&OAuthFlows::default(), &[]).await.map(Some),
        }
    }

    /// Token cache used for OAuth2 schemes
    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    /// Registry the requirements are resolved against
    pub fn registry(&self) -> &SchemeRegistry {
        &self.registry
    }

    fn api_key(&self, location: Option<ApiKeyLocation>, name: Option<&str>) -> Result<Credential> {
        let name = name
            .or(self.settings.api_key_name.as_deref())
            .ok_or_else(|| Error::missing_config("api_key_name"))?;

        let value = if self.settings.api_keys.is_empty() {
            self.settings
                .api_key_value
                .as_deref()
                .ok_or_else(|| Error::missing_config("api_key_value"))?
        } else {
            self.settings
                .api_keys
                .get(name)
                .map(String::as_str)
                .ok_or_else(|| Error::MissingApiKey {
                    name: name.to_string(),
                })?
        };

        match location {
            Some(ApiKeyLocation::Header) => Credential::header(name, value),
            Some(ApiKeyLocation::Cookie) => Ok(Credential::Cookie(encode_pair(name, value))),
            Some(ApiKeyLocation::Query) => Ok(Credential::Query(encode_pair(name, value))),
            Some(ApiKeyLocation::Other) | None => Err(Error::unsupported(format!(
                "API key '{name}' has no supported location (header, query or cookie)"
            ))),
        }
    }

    fn http(&self, scheme: Option<&str>) -> Result<Credential> {
        let scheme = scheme.unwrap_or(&self.settings.authentication_scheme);
        if scheme.is_empty() {
            return Err(Error::unsupported("HTTP security scheme has an empty scheme name"));
        }

        let value = if scheme.eq_ignore_ascii_case("bearer") {
            let token = self
                .settings
                .bearer_token
                .as_deref()
                .ok_or_else(|| Error::missing_config("bearer_token"))?;
            format!("Bearer {token}")
        } else {
            let username = self
                .settings
                .username
                .as_deref()
                .ok_or_else(|| Error::missing_config("username"))?;
            let password = self
                .settings
                .password
                .as_deref()
                .ok_or_else(|| Error::missing_config("password"))?;
            format!(
                "{} {}",
                capitalize(scheme),
                encode_credentials(username, password)
            )
        };

        Credential::header("Authorization", &value)
    }

    // Flows and scopes are not negotiated: every OAuth2 scheme is served
    // with the client credentials grant from settings.
    async fn oauth(&self, flows: &OAuthFlows, scopes: &[String]) -> Result<Credential> {
        debug!(
            "Using client credentials grant (declared flows: {:?}, scopes: {:?})",
            flows.declared(),
            scopes
        );
        let token = self.tokens.current_token().await?;
        Credential::header("Authorization", &format!("Bearer {token}"))
    }
}
