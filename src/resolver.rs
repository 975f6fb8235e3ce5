//! Requirement resolution
//!
//! Maps an operation (path + method) to the ordered list of requirement
//! alternatives that protect it.

use crate::document::{PathSecurityRequirements, SecurityRequirement};
use crate::error::{Error, Result};
use crate::types::HttpMethod;

/// Resolves the requirement alternatives of an operation
#[derive(Debug, Clone, Default)]
pub struct RequirementResolver {
    path_requirements: PathSecurityRequirements,
    default_requirements: Vec<SecurityRequirement>,
}

impl RequirementResolver {
    /// Create a resolver from per-operation lists and the document default
    pub fn new(
        path_requirements: PathSecurityRequirements,
        default_requirements: Vec<SecurityRequirement>,
    ) -> Self {
        Self {
            path_requirements,
            default_requirements,
        }
    }

    /// Requirement alternatives for `path` and `method`
    ///
    /// Operations that declare their own list get it verbatim, even when it
    /// is empty. Everything else gets the document default.
    pub fn resolve(&self, path: &str, method: HttpMethod) -> Result<&[SecurityRequirement]> {
        if path.is_empty() {
            return Err(Error::invalid_argument("path is empty"));
        }

        let requirements = self
            .path_requirements
            .get(path)
            .and_then(|methods| methods.get(&method))
            .unwrap_or(&self.default_requirements);

        Ok(requirements)
    }

    /// Document-level default alternatives
    pub fn default_requirements(&self) -> &[SecurityRequirement] {
        &self.default_requirements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn requirement(name: &str) -> SecurityRequirement {
        SecurityRequirement::from([(name.to_string(), Vec::new())])
    }

    fn resolver() -> RequirementResolver {
        let mut paths = PathSecurityRequirements::new();
        paths.entry("/pets".to_string()).or_default().insert(
            HttpMethod::Post,
            vec![requirement("oauth"), requirement("basic")],
        );
        paths
            .entry("/health".to_string())
            .or_default()
            .insert(HttpMethod::Get, vec![]);

        RequirementResolver::new(paths, vec![requirement("apiKey")])
    }

    #[test]
    fn test_resolve_operation_override() {
        let resolver = resolver();
        let reqs = resolver.resolve("/pets", HttpMethod::Post).unwrap();
        assert_eq!(reqs, &[requirement("oauth"), requirement("basic")]);
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let resolver = resolver();

        // Known path, other method
        let reqs = resolver.resolve("/pets", HttpMethod::Get).unwrap();
        assert_eq!(reqs, &[requirement("apiKey")]);

        // Unknown path
        let reqs = resolver.resolve("/owners", HttpMethod::Post).unwrap();
        assert_eq!(reqs, resolver.default_requirements());
    }

    #[test]
    fn test_resolve_explicit_empty_list() {
        let resolver = resolver();
        assert!(resolver.resolve("/health", HttpMethod::Get).unwrap().is_empty());
    }

    #[test]
    fn test_resolve_empty_default() {
        let resolver = RequirementResolver::default();
        assert!(resolver.resolve("/pets", HttpMethod::Get).unwrap().is_empty());
    }

    #[test]
    fn test_resolve_empty_path() {
        let resolver = resolver();
        let result = resolver.resolve("", HttpMethod::Get);
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }
}
