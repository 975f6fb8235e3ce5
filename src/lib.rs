//! # openapi-auth
//!
//! Authenticates outgoing HTTP requests from the security requirements of an
//! OpenAPI document.
//!
//! ## Features
//!
//! - **Requirement Resolution**: Operation-level `security` with fallback to the document default
//! - **Multiple Auth Types**: API Key (header, query, cookie), HTTP Basic/Bearer/other, OAuth2
//! - **Token Caching**: One client-credentials token shared by all requests, refreshed on expiry
//! - **401 Handling**: Unauthorized responses invalidate the cached token
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use openapi_auth::{ApiDocument, AuthSettings, Authentication, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let document = ApiDocument::load("openapi.yaml")?;
//!     let settings = AuthSettings::load("auth.yaml")?;
//!     let auth = Authentication::new(settings, document)?;
//!
//!     let client = reqwest::Client::new();
//!     let request = client.get("https://api.example.com/pets").build()?;
//!     let request = auth.decorate(request, "/pets").await?;
//!
//!     let response = client.execute(request).await?;
//!     auth.observe_status(response.status()).await;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Authentication                              │
//! │  decorate(request, path)    observe_status(status)              │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴──┬─────────────────┬─────────────┐
//! │  Resolver    │  Registry        │  Applier        │ Token Cache │
//! ├──────────────┼──────────────────┼─────────────────┼─────────────┤
//! │ path+method  │ name → scheme    │ API Key         │ fetch once  │
//! │ alternatives │                  │ HTTP            │ expiry      │
//! │ default      │                  │ OAuth2          │ invalidate  │
//! └──────────────┴──────────────────┴─────────────────┴─────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication settings
pub mod config;

/// OpenAPI security model and document loading
pub mod document;

/// Security scheme registry
pub mod registry;

/// Operation requirement resolution
pub mod resolver;

/// Credential building and OAuth2 token caching
pub mod auth;

/// Request interceptor
pub mod interceptor;

/// HTTP client with request authentication
pub mod http;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::{CredentialApplier, TokenCache, TokenSource};
pub use config::AuthSettings;
pub use document::{ApiDocument, SecurityRequirement, SecurityScheme};
pub use http::AuthenticatedClient;
pub use interceptor::{Authentication, OPERATION_PATH_HEADER};
pub use registry::SchemeRegistry;
pub use resolver::RequirementResolver;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
