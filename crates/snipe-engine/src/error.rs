//! Engine error types.

use snipe_core::CoreError;
use snipe_gateway::GatewayError;
use thiserror::Error;

/// Engine error types.
///
/// Transient gateway failures never surface here; polling stages absorb
/// them. What remains is fatal for the run (or the external abort).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Run aborted by cancellation signal")]
    Cancelled,

    #[error("Clock synchronization failed: {0}")]
    ClockSync(#[source] GatewayError),

    #[error("Listing detection failed: {0}")]
    ListingDetection(String),

    #[error("Price fetch failed: {0}")]
    PriceUnavailable(String),

    #[error("No sellable {0} balance")]
    NoBalance(String),

    #[error("Order planning failed: {0}")]
    Plan(String),

    #[error("Order submission failed: {0}")]
    Submission(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
