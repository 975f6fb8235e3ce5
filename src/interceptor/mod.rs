//! Request interceptor
//!
//! `Authentication` decorates outgoing requests with the credentials of the
//! first satisfiable security requirement of their operation, and drops the
//! cached OAuth2 token whenever a response comes back 401.
//!
//! # Example
//!
//! ```rust,ignore
//! let auth = Authentication::new(settings, ApiDocument::load("openapi.yaml")?)?;
//!
//! let request = client.get("https://api.example.com/pets").build()?;
//! let request = auth.decorate(request, "/pets").await?;
//! let response = client.execute(request).await?;
//! auth.observe_status(response.status()).await;
//! ```

use crate::auth::{Attempt, ClientCredentialsSource, Credential, CredentialApplier, TokenCache, TokenSource};
use crate::config::AuthSettings;
use crate::document::{ApiDocument, SecurityRequirement};
use crate::error::{Error, Result};
use crate::registry::SchemeRegistry;
use crate::resolver::RequirementResolver;
use crate::types::HttpMethod;
use reqwest::{Client, Request, StatusCode};
use std::sync::Arc;
use tracing::{debug, warn};

/// Header carrying the OpenAPI path template of a request
pub const OPERATION_PATH_HEADER: &str = "X-OpenAPI-Path";

/// Outbound request authentication
#[derive(Debug)]
pub struct Authentication {
    resolver: RequirementResolver,
    applier: CredentialApplier,
}

impl Authentication {
    /// Create an interceptor with a default HTTP client for token requests
    pub fn new(settings: AuthSettings, document: ApiDocument) -> Result<Self> {
        Self::with_client(settings, document, Client::new())
    }

    /// Create an interceptor that fetches tokens with `http_client`
    pub fn with_client(
        settings: AuthSettings,
        document: ApiDocument,
        http_client: Client,
    ) -> Result<Self> {
        settings.validate()?;
        let source = ClientCredentialsSource::from_settings(&settings, http_client)?;
        Ok(Self::with_token_source(settings, document, Arc::new(source)))
    }

    /// Create an interceptor over a custom token source
    pub fn with_token_source(
        settings: AuthSettings,
        document: ApiDocument,
        source: Arc<dyn TokenSource>,
    ) -> Self {
        let ApiDocument {
            schemes,
            security,
            path_requirements,
        } = document;

        Self {
            resolver: RequirementResolver::new(path_requirements, security),
            applier: CredentialApplier::new(
                SchemeRegistry::new(schemes),
                settings,
                TokenCache::new(source),
            ),
        }
    }

    /// Add credentials to `request`, an operation on `path`
    ///
    /// The request method selects the operation. Requirement alternatives
    /// are tried in order and the first satisfiable one is applied. When
    /// none is, the configured default authentication is used, and failing
    /// that the request is returned unchanged.
    pub async fn decorate(&self, mut request: Request, path: &str) -> Result<Request> {
        let method = HttpMethod::try_from(request.method())?;
        let requirements = self.resolver.resolve(path, method)?;

        match self.select_credentials(requirements).await? {
            Some(credentials) => {
                for credential in &credentials {
                    credential.apply(&mut request)?;
                }
            }
            None => debug!("No credentials apply to {} {}, sending unauthenticated", method, path),
        }

        Ok(request)
    }

    /// Decorate a request whose operation path is in [`OPERATION_PATH_HEADER`]
    ///
    /// The header is removed before the request is returned.
    pub async fn filter_request(&self, mut request: Request) -> Result<Request> {
        let path = request
            .headers_mut()
            .remove(OPERATION_PATH_HEADER)
            .ok_or_else(|| Error::invalid_argument(format!("{OPERATION_PATH_HEADER} header is missing")))?;
        let path = path
            .to_str()
            .map_err(|e| Error::invalid_argument(format!("{OPERATION_PATH_HEADER} header: {e}")))?
            .to_string();

        self.decorate(request, &path).await
    }

    /// React to a response status; a 401 drops the cached OAuth2 token
    pub async fn observe_status(&self, status: StatusCode) {
        if status == StatusCode::UNAUTHORIZED {
            warn!("Received 401 Unauthorized, invalidating cached OAuth2 token");
            self.applier.tokens().invalidate().await;
        }
    }

    /// Cache holding the OAuth2 token
    pub fn token_cache(&self) -> &TokenCache {
        self.applier.tokens()
    }

    /// Declared security schemes
    pub fn registry(&self) -> &SchemeRegistry {
        self.applier.registry()
    }

    /// Requirement resolver for the document
    pub fn resolver(&self) -> &RequirementResolver {
        &self.resolver
    }

    async fn select_credentials(
        &self,
        requirements: &[SecurityRequirement],
    ) -> Result<Option<Vec<Credential>>> {
        for (index, requirement) in requirements.iter().enumerate() {
            match self.applier.credentials_for(requirement).await? {
                Attempt::Ready(credentials) => return Ok(Some(credentials)),
                Attempt::Unsatisfiable(reason) => {
                    debug!("Skipping security requirement #{}: {}", index, reason);
                }
            }
        }

        match self.applier.default_credential().await {
            Ok(credential) => Ok(credential.map(|c| vec![c])),
            Err(e) if e.is_unsatisfiable() => {
                warn!("Default authentication cannot be applied: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
