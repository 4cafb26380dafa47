//! The one sleep-and-retry primitive shared by every polling stage.
//!
//! Launch synchronization, listing detection, price fetching, and
//! order submission all reduce to the same loop: run an operation,
//! decide between done / not yet / failed, sleep, try again. This
//! module owns that loop so each stage only supplies its operation,
//! its interval, its attempt bound, and its retryable-error predicate.
//! Every sleep races the shared cancellation token.

use std::fmt;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Polling parameters for one stage.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Delay between operation attempts.
    pub interval: Duration,
    /// Total operation invocations allowed; `None` polls until ready
    /// or cancelled.
    pub max_attempts: Option<u32>,
}

/// What one operation invocation concluded.
#[derive(Debug)]
pub enum Outcome<T> {
    /// The awaited condition holds; polling stops with this value.
    Ready(T),
    /// Nothing wrong, the condition simply does not hold yet.
    Pending,
}

/// Why polling stopped without a value.
#[derive(Debug)]
pub enum PollError<E> {
    /// The shared cancellation token fired.
    Cancelled,
    /// The operation failed and the predicate ruled out a retry.
    Fatal(E),
    /// The attempt bound was spent. `last` carries the most recent
    /// operation error, when the final attempts failed rather than
    /// merely pended.
    Exhausted { attempts: u32, last: Option<E> },
}

/// Run `op` every `interval` until it yields [`Outcome::Ready`], an
/// unretryable error, attempt exhaustion, or cancellation.
///
/// Errors passing `is_retryable` are logged at WARN and retried;
/// anything else returns [`PollError::Fatal`] immediately. The attempt
/// bound counts invocations, so a bounded stage terminates even if the
/// operation keeps pending.
pub async fn poll_until<T, E, F, Fut, R>(
    config: &PollConfig,
    cancel: &CancellationToken,
    what: &str,
    is_retryable: R,
    mut op: F,
) -> Result<T, PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<Outcome<T>, E>>,
    E: fmt::Display,
    R: Fn(&E) -> bool,
{
    let mut attempts = 0u32;
    let mut last_error: Option<E> = None;

    loop {
        if cancel.is_cancelled() {
            return Err(PollError::Cancelled);
        }

        attempts += 1;
        match op().await {
            Ok(Outcome::Ready(value)) => return Ok(value),
            Ok(Outcome::Pending) => {}
            Err(e) if is_retryable(&e) => {
                warn!(stage = what, attempt = attempts, error = %e, "retrying after error");
                last_error = Some(e);
            }
            Err(e) => return Err(PollError::Fatal(e)),
        }

        if let Some(max) = config.max_attempts {
            if attempts >= max {
                return Err(PollError::Exhausted {
                    attempts,
                    last: last_error,
                });
            }
        }

        if !cancellable_sleep(config.interval, cancel).await {
            return Err(PollError::Cancelled);
        }
    }
}

/// Sleep for `interval` unless the token fires first. Returns false on
/// cancellation.
pub(crate) async fn cancellable_sleep(interval: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(interval) => true,
    }
}
