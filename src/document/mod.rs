//! OpenAPI document module
//!
//! Extracts the security schemes, the document-level requirement list and
//! the per-operation requirement lists from an OpenAPI 3.x document.

mod parser;
mod types;

pub use parser::ApiDocument;
pub use types::{
    ApiKeyLocation, OAuthFlow, OAuthFlows, PathSecurityRequirements, SecurityRequirement,
    SecurityScheme,
};
