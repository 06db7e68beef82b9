//! Directions client error types.

use std::path::PathBuf;

use super::convert::ConversionError;

/// Errors from a directions provider.
#[derive(Debug, thiserror::Error)]
pub enum DirectionsError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Provider returned an error status or error code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the provider
    #[error("rate limited by directions provider")]
    RateLimited,

    /// Invalid API key or unauthorized
    #[error("unauthorized (invalid API key)")]
    Unauthorized,

    /// Client could not be built from its configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Response parsed but held unusable route data
    #[error("invalid route data: {0}")]
    Conversion(#[from] ConversionError),

    /// A fixture file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The client itself failed, before reaching the provider
    #[error("internal error: {0}")]
    Internal(String),
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_ref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}
