//! Authentication module
//!
//! Supports: API Key (header, query, cookie), HTTP schemes (Basic, Bearer and
//! any other `Authorization` scheme), OAuth2 client credentials
//!
//! The `CredentialApplier` builds credentials per scheme type and owns the
//! `TokenCache` that keeps the OAuth2 access token.

mod applier;
mod token;
mod types;

pub use applier::{Attempt, CredentialApplier};
pub use token::{ClientCredentialsSource, TokenCache, TokenSource};
pub use types::{CachedToken, Credential, TokenResponse};
