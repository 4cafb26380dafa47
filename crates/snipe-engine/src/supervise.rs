//! Fill supervision: poll a resting order until it resolves.
//!
//! The supervisor owns the order handle from submission onward and
//! guarantees the run never walks away from a live order: a
//! non-terminal order is canceled when the timeout elapses, and a
//! best-effort cancel runs before an external abort propagates.
//!
//! Terminal flow: polling (`Pending`) ends in a fill, another terminal
//! status, a timeout-triggered cancellation (`Canceling` ->
//! `Canceled`), or an abort.

use crate::error::{EngineError, EngineResult};
use crate::gateway::Gateway;
use crate::poll::cancellable_sleep;
use snipe_core::{OrderHandle, OrderReport, OrderStatus};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// How supervision of one order concluded.
#[derive(Debug, Clone)]
pub enum FillOutcome {
    /// The order filled completely.
    Filled(OrderReport),
    /// The order reached a terminal status other than filled
    /// (canceled externally, rejected, expired).
    Closed(OrderReport),
    /// The timeout elapsed and cancellation was issued. `canceled`
    /// carries the exchange's response when the cancel (or the
    /// post-race final query) got one.
    TimedOut { canceled: Option<OrderReport> },
}

/// Poll the order every `poll_interval` until it is terminal, the
/// timeout elapses, or the run is aborted.
///
/// Transient poll errors are logged and retried; they never end
/// supervision. The timeout window is measured on the monotonic clock
/// from handoff, so it cannot be stretched by wall-clock adjustments.
pub async fn supervise_fill(
    gateway: &dyn Gateway,
    handle: &OrderHandle,
    timeout: Duration,
    poll_interval: Duration,
    cancel: &CancellationToken,
) -> EngineResult<FillOutcome> {
    let started = tokio::time::Instant::now();
    info!(
        order = %handle,
        timeout_secs = timeout.as_secs(),
        "supervising order until fill or timeout"
    );

    loop {
        if cancel.is_cancelled() {
            return abort_with_cleanup(gateway, handle).await;
        }
        if started.elapsed() >= timeout {
            return cancel_on_timeout(gateway, handle).await;
        }

        match gateway.get_order(&handle.symbol, handle.order_id).await {
            Ok(report) if report.status == OrderStatus::Filled => {
                info!(order = %handle, executed = %report.executed_qty, "order filled");
                return Ok(FillOutcome::Filled(report));
            }
            Ok(report) if report.status.is_terminal() => {
                warn!(order = %handle, status = %report.status, "order closed without fill");
                return Ok(FillOutcome::Closed(report));
            }
            Ok(report) => {
                debug!(
                    order = %handle,
                    status = %report.status,
                    executed = %report.executed_qty,
                    "order still open"
                );
            }
            Err(e) => {
                warn!(order = %handle, error = %e, "order status poll failed; will retry");
            }
        }

        if !cancellable_sleep(poll_interval, cancel).await {
            return abort_with_cleanup(gateway, handle).await;
        }
    }
}

/// Timeout path: issue exactly one cancellation, treating "order not
/// found" as the benign race where the order resolved naturally first.
async fn cancel_on_timeout(
    gateway: &dyn Gateway,
    handle: &OrderHandle,
) -> EngineResult<FillOutcome> {
    info!(order = %handle, "timeout reached; canceling order");

    match gateway.cancel_order(&handle.symbol, handle.order_id).await {
        Ok(report) => {
            info!(order = %handle, status = %report.status, "order canceled");
            Ok(FillOutcome::TimedOut {
                canceled: Some(report),
            })
        }
        Err(e) if e.is_unknown_order() => {
            // the order resolved between the last poll and the cancel
            info!(order = %handle, "cancel raced a natural resolution; fetching final state");
            match gateway.get_order(&handle.symbol, handle.order_id).await {
                Ok(report) if report.status == OrderStatus::Filled => {
                    info!(order = %handle, "order had filled before the cancel");
                    Ok(FillOutcome::Filled(report))
                }
                Ok(report) => Ok(FillOutcome::Closed(report)),
                Err(probe) => {
                    warn!(order = %handle, error = %probe, "final state unavailable after cancel race");
                    Ok(FillOutcome::TimedOut { canceled: None })
                }
            }
        }
        Err(e) => {
            error!(order = %handle, error = %e, "cancel failed; stopping supervision");
            Ok(FillOutcome::TimedOut { canceled: None })
        }
    }
}

/// Abort path: one best-effort cancellation before the abort
/// propagates. A resting order must not outlive program intent.
async fn abort_with_cleanup(
    gateway: &dyn Gateway,
    handle: &OrderHandle,
) -> EngineResult<FillOutcome> {
    warn!(order = %handle, "abort requested with order outstanding; attempting cancellation");

    match gateway.cancel_order(&handle.symbol, handle.order_id).await {
        Ok(report) => info!(order = %handle, status = %report.status, "order canceled on abort"),
        Err(e) if e.is_unknown_order() => {
            info!(order = %handle, "order already resolved before abort cancel")
        }
        Err(e) => error!(order = %handle, error = %e, "best-effort cancel on abort failed"),
    }

    Err(EngineError::Cancelled)
}
