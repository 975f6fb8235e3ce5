//! Security-related OpenAPI document types
//!
//! Only the parts of an OpenAPI 3.x document that drive authentication are
//! modelled here; everything else in the document is ignored on load.

use crate::types::HttpMethod;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One alternative of a security requirement list: scheme name to scopes.
///
/// Every scheme named in a single requirement must be satisfied together.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// Per-operation requirement lists, keyed by path then method
pub type PathSecurityRequirements = HashMap<String, HashMap<HttpMethod, Vec<SecurityRequirement>>>;

/// Where an API key is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    Header,
    Query,
    Cookie,
    /// Any `in` value this crate does not know how to place
    #[serde(other)]
    Other,
}

/// A declared security scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SecurityScheme {
    /// API key in a header, query parameter or cookie
    #[serde(rename = "apiKey")]
    ApiKey {
        #[serde(rename = "in", default)]
        location: Option<ApiKeyLocation>,
        #[serde(default)]
        name: Option<String>,
    },

    /// HTTP `Authorization` scheme
    #[serde(rename = "http")]
    Http {
        #[serde(default)]
        scheme: Option<String>,
        #[serde(rename = "bearerFormat", default)]
        bearer_format: Option<String>,
    },

    /// OAuth2, always served with the client credentials grant
    #[serde(rename = "oauth2")]
    OAuth2 {
        #[serde(default)]
        flows: OAuthFlows,
    },

    /// `openIdConnect`, `mutualTLS` or anything else
    #[serde(other)]
    Unsupported,
}

impl SecurityScheme {
    /// Document name of the scheme type
    pub fn type_name(&self) -> &'static str {
        match self {
            SecurityScheme::ApiKey { .. } => "apiKey",
            SecurityScheme::Http { .. } => "http",
            SecurityScheme::OAuth2 { .. } => "oauth2",
            SecurityScheme::Unsupported => "unsupported",
        }
    }
}

/// OAuth2 flows declared by a scheme
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthFlows {
    #[serde(default)]
    pub implicit: Option<OAuthFlow>,
    #[serde(default)]
    pub password: Option<OAuthFlow>,
    #[serde(default)]
    pub client_credentials: Option<OAuthFlow>,
    #[serde(default)]
    pub authorization_code: Option<OAuthFlow>,
}

impl OAuthFlows {
    /// Names of the declared flows
    pub fn declared(&self) -> Vec<&'static str> {
        [
            ("implicit", self.implicit.is_some()),
            ("password", self.password.is_some()),
            ("clientCredentials", self.client_credentials.is_some()),
            ("authorizationCode", self.authorization_code.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }
}

/// A single OAuth2 flow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthFlow {
    #[serde(default)]
    pub authorization_url: Option<String>,
    #[serde(default)]
    pub token_url: Option<String>,
    #[serde(default)]
    pub refresh_url: Option<String>,
    #[serde(default)]
    pub scopes: IndexMap<String, String>,
}

// ============================================================================
// Raw document shapes
// ============================================================================

/// Root of an OpenAPI document, reduced to security data
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawDocument {
    #[serde(default)]
    pub security: Vec<SecurityRequirement>,
    #[serde(default)]
    pub components: RawComponents,
    #[serde(default)]
    pub paths: IndexMap<String, RawPathItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawComponents {
    #[serde(default)]
    pub security_schemes: IndexMap<String, SecurityScheme>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawPathItem {
    #[serde(default)]
    pub get: Option<RawOperation>,
    #[serde(default)]
    pub put: Option<RawOperation>,
    #[serde(default)]
    pub post: Option<RawOperation>,
    #[serde(default)]
    pub delete: Option<RawOperation>,
    #[serde(default)]
    pub options: Option<RawOperation>,
    #[serde(default)]
    pub head: Option<RawOperation>,
    #[serde(default)]
    pub patch: Option<RawOperation>,
    #[serde(default)]
    pub trace: Option<RawOperation>,
}

impl RawPathItem {
    /// Operations declared on this path, paired with their method
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &RawOperation)> {
        [
            (HttpMethod::Get, &self.get),
            (HttpMethod::Put, &self.put),
            (HttpMethod::Post, &self.post),
            (HttpMethod::Delete, &self.delete),
            (HttpMethod::Options, &self.options),
            (HttpMethod::Head, &self.head),
            (HttpMethod::Patch, &self.patch),
            (HttpMethod::Trace, &self.trace),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawOperation {
    /// `None` when the operation inherits the document default
    #[serde(default)]
    pub security: Option<Vec<SecurityRequirement>>,
}
