//! Error types for sigrelay-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid side: {0}")]
    InvalidSide(String),

    #[error("Invalid order type: {0}")]
    InvalidOrderType(String),

    #[error("Invalid client order id: {0}")]
    InvalidClientOrderId(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
