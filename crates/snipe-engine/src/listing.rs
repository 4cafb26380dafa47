//! Listing detection: poll metadata until the pair is tradable.

use crate::error::{EngineError, EngineResult};
use crate::gateway::Gateway;
use crate::poll::{poll_until, Outcome, PollConfig, PollError};
use snipe_core::ExchangeInfo;
use snipe_gateway::GatewayError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Poll exchange metadata every `interval` until `symbol` is present
/// and open for trading, returning the full snapshot for precision
/// resolution.
///
/// Listing delays are expected, so transient gateway errors are logged
/// and retried indefinitely; only cancellation ends this stage early.
pub async fn wait_for_listing(
    gateway: &dyn Gateway,
    symbol: &str,
    interval: Duration,
    cancel: &CancellationToken,
) -> EngineResult<ExchangeInfo> {
    info!(symbol, "waiting for pair listing");

    let config = PollConfig {
        interval,
        max_attempts: None,
    };

    let result = poll_until(&config, cancel, "listing detect", |_: &GatewayError| true, || async move {
        let info = gateway.exchange_info().await?;
        if info.is_tradable(symbol) {
            Ok(Outcome::Ready(info))
        } else {
            debug!(symbol, "pair not yet tradable");
            Ok(Outcome::Pending)
        }
    })
    .await;

    match result {
        Ok(info) => {
            info!(symbol, "pair is listed and tradable");
            Ok(info)
        }
        Err(PollError::Cancelled) => Err(EngineError::Cancelled),
        // With every error retryable and no attempt bound, these arms
        // cannot fire; keep the mapping total.
        Err(PollError::Fatal(e)) => Err(EngineError::ListingDetection(e.to_string())),
        Err(PollError::Exhausted { attempts, .. }) => Err(EngineError::ListingDetection(format!(
            "exhausted after {attempts} attempts"
        ))),
    }
}
