//! Error types for the Yahoo chart client.

use thiserror::Error;

/// Errors that can occur when using the Yahoo chart API.
#[derive(Debug, Error)]
pub enum YahooError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error payload.
    #[error("Yahoo API error: {0}")]
    Api(String),

    /// Non-success HTTP status without an error payload.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// No data available.
    #[error("No data available for {0}")]
    NoData(String),

    /// Invalid timeout configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
