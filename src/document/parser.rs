//! OpenAPI document loader
//!
//! Reads YAML or JSON documents and keeps only their security data.

use super::types::{
    PathSecurityRequirements, RawDocument, SecurityRequirement, SecurityScheme,
};
use crate::error::{Error, Result, ResultExt};
use crate::types::HttpMethod;
use indexmap::IndexMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Security data extracted from an OpenAPI document
#[derive(Debug, Clone, Default)]
pub struct ApiDocument {
    /// `components.securitySchemes`
    pub schemes: IndexMap<String, SecurityScheme>,
    /// Document-level `security`, applied to operations without their own
    pub security: Vec<SecurityRequirement>,
    /// Operation-level `security`, only for operations that declare one
    pub path_requirements: PathSecurityRequirements,
}

impl ApiDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named security scheme
    #[must_use]
    pub fn with_scheme(mut self, name: impl Into<String>, scheme: SecurityScheme) -> Self {
        self.schemes.insert(name.into(), scheme);
        self
    }

    /// Set the document-level requirement list
    #[must_use]
    pub fn with_security(mut self, security: Vec<SecurityRequirement>) -> Self {
        self.security = security;
        self
    }

    /// Set the requirement list of one operation
    #[must_use]
    pub fn with_operation(
        mut self,
        path: impl Into<String>,
        method: HttpMethod,
        security: Vec<SecurityRequirement>,
    ) -> Self {
        self.path_requirements
            .entry(path.into())
            .or_default()
            .insert(method, security);
        self
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let raw: RawDocument = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse OpenAPI YAML: {e}")))?;
        Ok(Self::from_raw(raw))
    }

    /// Parse a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawDocument = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Failed to parse OpenAPI JSON: {e}")))?;
        Ok(Self::from_raw(raw))
    }

    /// Load a document from disk, choosing the format by extension
    ///
    /// `.json` files are parsed as JSON; anything else as YAML (which also
    /// accepts JSON).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read OpenAPI document '{}'", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    fn from_raw(raw: RawDocument) -> Self {
        let mut path_requirements = PathSecurityRequirements::new();
        for (path, item) in &raw.paths {
            for (method, operation) in item.operations() {
                if let Some(security) = &operation.security {
                    path_requirements
                        .entry(path.clone())
                        .or_default()
                        .insert(method, security.clone());
                }
            }
        }

        debug!(
            "Loaded OpenAPI security: {} schemes, {} default requirements, {} paths with overrides",
            raw.components.security_schemes.len(),
            raw.security.len(),
            path_requirements.len()
        );

        Self {
            schemes: raw.components.security_schemes,
            security: raw.security,
            path_requirements,
        }
    }
}
