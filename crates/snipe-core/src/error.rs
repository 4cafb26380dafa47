//! Error types for snipe-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid trade intent: {0}")]
    InvalidIntent(String),

    #[error("Symbol {0} not present in exchange metadata")]
    SymbolNotListed(String),

    #[error("Decimal parse error: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Invalid launch instant {value}: {reason}")]
    InvalidLaunchInstant { value: String, reason: String },
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
