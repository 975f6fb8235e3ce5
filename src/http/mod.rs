//! HTTP client module
//!
//! Sends requests through the authentication interceptor.
//!
//! # Features
//!
//! - **Request Decoration**: Credentials chosen per OpenAPI operation
//! - **Token Invalidation**: 401 responses drop the cached OAuth2 token
//! - **Auth Retries**: Optional resend with fresh credentials after a 401

mod client;

pub use client::{AuthenticatedClient, HttpClientConfig, HttpClientConfigBuilder};

#[cfg(test)]
mod tests;
