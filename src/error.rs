//! Error types for openapi-auth
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for openapi-auth
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required configuration: {field}")]
    ConfigurationMissing { field: String },

    #[error("Missing API key '{name}' in the api_keys table")]
    MissingApiKey { name: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Security Scheme Errors
    // ============================================================================
    #[error("Security scheme '{name}' is not declared")]
    UnknownScheme { name: String },

    #[error("Unsupported security scheme: {message}")]
    UnsupportedScheme { message: String },

    // ============================================================================
    // Token Errors
    // ============================================================================
    #[error("Token fetch failed: {message}")]
    TokenFetch { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid header: {message}")]
    InvalidHeader { message: String },

    // ============================================================================
    // Caller Errors
    // ============================================================================
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing configuration error
    pub fn missing_config(field: impl Into<String>) -> Self {
        Self::ConfigurationMissing {
            field: field.into(),
        }
    }

    /// Create an unsupported scheme error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedScheme {
            message: message.into(),
        }
    }

    /// Create a token fetch error
    pub fn token_fetch(message: impl Into<String>) -> Self {
        Self::TokenFetch {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an invalid header error
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Whether this error only means a requirement alternative cannot be
    /// satisfied with the locally configured credentials.
    ///
    /// Such errors are swallowed while trying alternatives; everything else
    /// reaches the caller.
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(
            self,
            Error::ConfigurationMissing { .. }
                | Error::MissingApiKey { .. }
                | Error::UnknownScheme { .. }
                | Error::UnsupportedScheme { .. }
        )
    }
}

/// Result type alias for openapi-auth
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
