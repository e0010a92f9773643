//! Gateway error types.

use thiserror::Error;

/// Errors surfaced by the exchange gateway.
///
/// Kept `Clone` so scripted test doubles can replay the same error
/// across retry attempts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Transport-level failure: connect error, timeout, TLS.
    #[error("http error: {0}")]
    Http(String),

    /// The exchange answered with a non-success status.
    #[error("exchange rejected request ({label}): {message}")]
    Rejected { label: String, message: String },

    /// The response body could not be decoded.
    #[error("response parse error: {0}")]
    Parse(String),

    /// API key or secret missing at construction time.
    #[error("missing exchange API credentials")]
    MissingCredentials,
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
