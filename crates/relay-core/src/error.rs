//! Error types for relay-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("action must be BUY or SELL, got: {0}")]
    InvalidAction(String),

    #[error("order type must be market or limit, got: {0}")]
    InvalidOrderType(String),

    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error("quantity must be positive, got: {0}")]
    NonPositiveQuantity(String),

    #[error("limit order requires a price")]
    MissingLimitPrice,

    #[error("price must be positive, got: {0}")]
    NonPositivePrice(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
