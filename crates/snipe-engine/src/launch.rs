//! Launch synchronization against the exchange clock.
//!
//! The local process clock is never consulted: skew between this host
//! and the exchange would defeat precise listing-time execution. Each
//! tick is a fresh server-time round trip.

use crate::error::{EngineError, EngineResult};
use crate::gateway::Gateway;
use crate::poll::{poll_until, Outcome, PollConfig, PollError};
use chrono::{DateTime, Utc};
use snipe_gateway::GatewayError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Interval between exchange clock samples.
const CLOCK_SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Block until the exchange clock reaches `launch_at - lead`.
///
/// Returns immediately when the first sample is already at or past the
/// wake-up instant. A gateway error here is fatal: a missed
/// synchronization undermines the whole run, so there is no retry.
pub async fn wait_for_launch(
    gateway: &dyn Gateway,
    launch_at: DateTime<Utc>,
    lead: Duration,
    cancel: &CancellationToken,
) -> EngineResult<()> {
    let wake_at_ms = launch_at.timestamp_millis() - lead.as_millis() as i64;
    info!(
        launch_at = %launch_at,
        lead_secs = lead.as_secs(),
        "synchronizing against exchange clock"
    );

    let config = PollConfig {
        interval: CLOCK_SAMPLE_INTERVAL,
        max_attempts: None,
    };

    let result = poll_until(&config, cancel, "launch sync", |_| false, || async move {
        let now_ms = gateway.server_time().await? as i64;
        if now_ms >= wake_at_ms {
            return Ok(Outcome::Ready(()));
        }
        let remaining_ms = wake_at_ms - now_ms;
        info!(
            remaining_secs = remaining_ms / 1000,
            "waiting for launch window"
        );
        Ok(Outcome::Pending)
    })
    .await;

    match result {
        Ok(()) => {
            info!("launch window reached");
            Ok(())
        }
        Err(PollError::Cancelled) => Err(EngineError::Cancelled),
        Err(PollError::Fatal(e)) => Err(EngineError::ClockSync(e)),
        // Unbounded polling cannot exhaust; keep the error path total.
        Err(PollError::Exhausted { last, .. }) => Err(EngineError::ClockSync(last.unwrap_or(
            GatewayError::Transport {
                message: "clock sampling ended unexpectedly".to_string(),
                ambiguous: false,
            },
        ))),
    }
}
