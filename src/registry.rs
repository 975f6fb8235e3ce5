//! Security scheme registry
//!
//! Read-only lookup from scheme name to its declaration, built once from
//! the parsed document.

use crate::document::SecurityScheme;
use crate::error::{Error, Result};
use indexmap::IndexMap;

/// Named security schemes of a document
#[derive(Debug, Clone, Default)]
pub struct SchemeRegistry {
    schemes: IndexMap<String, SecurityScheme>,
}

impl SchemeRegistry {
    /// Create a registry from named schemes
    pub fn new(schemes: IndexMap<String, SecurityScheme>) -> Self {
        Self { schemes }
    }

    /// Look up a scheme by name
    pub fn get(&self, name: &str) -> Option<&SecurityScheme> {
        self.schemes.get(name)
    }

    /// Look up a scheme by name, failing if it is not declared
    pub fn require(&self, name: &str) -> Result<&SecurityScheme> {
        self.get(name).ok_or_else(|| Error::UnknownScheme {
            name: name.to_string(),
        })
    }

    /// Iterate schemes in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SecurityScheme)> {
        self.schemes.iter().map(|(name, scheme)| (name.as_str(), scheme))
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

impl FromIterator<(String, SecurityScheme)> for SchemeRegistry {
    fn from_iter<I: IntoIterator<Item = (String, SecurityScheme)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
