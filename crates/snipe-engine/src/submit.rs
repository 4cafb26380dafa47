//! Order submission with bounded retries and ambiguity reconciliation.
//!
//! At most one order may rest on the book per successful attempt. A
//! placement failure where the request may still have reached the
//! matching engine (timeout, dropped connection) is therefore never
//! retried blindly: the attempt's client order id is queried first,
//! and a found order counts as a successful placement.

use crate::error::{EngineError, EngineResult};
use crate::gateway::Gateway;
use crate::poll::{poll_until, Outcome, PollConfig, PollError};
use snipe_core::{OrderPlan, OrderReport};
use snipe_gateway::GatewayError;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

/// Placement attempts before the run fails.
const SUBMIT_ATTEMPTS: u32 = 3;
/// Fixed backoff between placement attempts.
const SUBMIT_BACKOFF: Duration = Duration::from_millis(500);

/// Why one placement attempt failed.
#[derive(Debug, Error)]
enum AttemptError {
    /// The exchange (or transport) rejected the attempt and no order
    /// rests. Retryable per the inner classification.
    #[error("{0}")]
    Rejected(GatewayError),
    /// The placement outcome is unknown and the reconciliation query
    /// failed too; retrying could put a second order on the book.
    #[error("placement outcome unknown ({placement}); reconciliation failed ({probe})")]
    Unresolved {
        placement: GatewayError,
        probe: GatewayError,
    },
}

/// Place the planned limit sell, retrying recoverable rejections up to
/// the attempt bound with a short fixed backoff.
///
/// Returns the exchange's acknowledgement; its handle is what the fill
/// supervisor owns from here on. On terminal failure no order rests on
/// the book.
pub async fn submit_order(
    gateway: &dyn Gateway,
    symbol: &str,
    plan: &OrderPlan,
    cancel: &CancellationToken,
) -> EngineResult<OrderReport> {
    let config = PollConfig {
        interval: SUBMIT_BACKOFF,
        max_attempts: Some(SUBMIT_ATTEMPTS),
    };

    let mut attempt = 0u32;
    let result = poll_until(
        &config,
        cancel,
        "order submit",
        |e: &AttemptError| matches!(e, AttemptError::Rejected(g) if g.is_retryable()),
        || {
            attempt += 1;
            info!(attempt, max_attempts = SUBMIT_ATTEMPTS, %plan.price, %plan.quantity, "placing limit sell order");
            let client_order_id = new_client_order_id();
            async move { place_once(gateway, symbol, plan, client_order_id).await }
        },
    )
    .await;

    match result {
        Ok(report) => {
            info!(
                order_id = report.order_id,
                status = %report.status,
                "order placed"
            );
            Ok(report)
        }
        Err(PollError::Cancelled) => Err(EngineError::Cancelled),
        Err(PollError::Fatal(e)) => Err(EngineError::Submission(e.to_string())),
        Err(PollError::Exhausted { attempts, last }) => {
            Err(EngineError::Submission(match last {
                Some(e) => format!("exhausted {attempts} attempts: {e}"),
                None => format!("exhausted {attempts} attempts"),
            }))
        }
    }
}

/// One placement attempt, reconciling ambiguous failures before they
/// can be retried.
async fn place_once(
    gateway: &dyn Gateway,
    symbol: &str,
    plan: &OrderPlan,
    client_order_id: String,
) -> Result<Outcome<OrderReport>, AttemptError> {
    match gateway
        .place_limit_sell(symbol, plan.quantity, plan.price, &client_order_id)
        .await
    {
        Ok(report) => Ok(Outcome::Ready(report)),
        Err(placement) if placement.is_ambiguous() => {
            warn!(
                error = %placement,
                client_order_id,
                "placement outcome ambiguous; querying order before any retry"
            );
            match gateway
                .get_order_by_client_id(symbol, &client_order_id)
                .await
            {
                Ok(report) => {
                    info!(
                        order_id = report.order_id,
                        "ambiguous placement did reach the book"
                    );
                    Ok(Outcome::Ready(report))
                }
                // provably never placed; retrying is safe
                Err(probe) if probe.is_unknown_order() => Err(AttemptError::Rejected(placement)),
                Err(probe) => Err(AttemptError::Unresolved { placement, probe }),
            }
        }
        Err(placement) => Err(AttemptError::Rejected(placement)),
    }
}

/// Fresh client order id for one placement attempt.
fn new_client_order_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayCall, MockGateway};
    use rust_decimal_macros::dec;
    use snipe_core::{OrderSide, OrderStatus, OrderType, Price, Qty, TimeInForce};

    fn plan() -> OrderPlan {
        OrderPlan {
            price: Price::new(dec!(99.00)),
            quantity: Qty::new(dec!(100)),
        }
    }

    fn ack(order_id: u64, client_order_id: &str) -> OrderReport {
        OrderReport {
            symbol: "ALTUSDT".to_string(),
            order_id,
            client_order_id: client_order_id.to_string(),
            status: OrderStatus::New,
            order_type: OrderType::Limit,
            side: OrderSide::Sell,
            price: Price::new(dec!(99.00)),
            orig_qty: Qty::new(dec!(100)),
            executed_qty: Qty::ZERO,
            cumulative_quote_qty: dec!(0),
            time_in_force: TimeInForce::Gtc,
            fills: vec![],
        }
    }

    fn rate_limited() -> GatewayError {
        GatewayError::Api {
            status: 429,
            code: -1003,
            message: "Too many requests.".to_string(),
        }
    }

    fn rejected() -> GatewayError {
        GatewayError::Api {
            status: 400,
            code: -1013,
            message: "Filter failure: LOT_SIZE".to_string(),
        }
    }

    fn ambiguous_timeout() -> GatewayError {
        GatewayError::Transport {
            message: "operation timed out".to_string(),
            ambiguous: true,
        }
    }

    fn not_found() -> GatewayError {
        GatewayError::Api {
            status: 400,
            code: -2013,
            message: "Order does not exist.".to_string(),
        }
    }

    fn place_calls(mock: &MockGateway) -> usize {
        mock.count_calls(|c| matches!(c, GatewayCall::PlaceLimitSell { .. }))
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let mock = MockGateway::new();
        mock.push_place_result(Ok(ack(7, "cid-1")));

        let cancel = CancellationToken::new();
        let report = submit_order(&mock, "ALTUSDT", &plan(), &cancel)
            .await
            .unwrap();

        assert_eq!(report.order_id, 7);
        assert_eq!(place_calls(&mock), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_recoverable_rejections() {
        let mock = MockGateway::new();
        mock.push_place_result(Err(rate_limited()));
        mock.push_place_result(Err(rate_limited()));
        mock.push_place_result(Ok(ack(8, "cid-3")));

        let cancel = CancellationToken::new();
        let report = submit_order(&mock, "ALTUSDT", &plan(), &cancel)
            .await
            .unwrap();

        assert_eq!(report.order_id, 8);
        assert_eq!(place_calls(&mock), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_is_terminal_with_no_resting_order() {
        let mock = MockGateway::new();
        for _ in 0..3 {
            mock.push_place_result(Err(rate_limited()));
        }

        let cancel = CancellationToken::new();
        let err = submit_order(&mock, "ALTUSDT", &plan(), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Submission(_)));
        assert_eq!(place_calls(&mock), 3);
        // no reconciliation queries were needed: every failure was definitive
        assert_eq!(
            mock.count_calls(|c| matches!(c, GatewayCall::GetOrderByClientId { .. })),
            0
        );
    }

    #[tokio::test]
    async fn test_hard_rejection_fails_without_retry() {
        let mock = MockGateway::new();
        mock.push_place_result(Err(rejected()));

        let cancel = CancellationToken::new();
        let err = submit_order(&mock, "ALTUSDT", &plan(), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Submission(_)));
        assert_eq!(place_calls(&mock), 1);
    }

    #[tokio::test]
    async fn test_ambiguous_failure_with_resting_order_is_success() {
        let mock = MockGateway::new();
        mock.push_place_result(Err(ambiguous_timeout()));
        // reconciliation finds the order on the book
        mock.push_client_id_query(Ok(ack(9, "cid-1")));

        let cancel = CancellationToken::new();
        let report = submit_order(&mock, "ALTUSDT", &plan(), &cancel)
            .await
            .unwrap();

        assert_eq!(report.order_id, 9);
        // exactly one placement; the timeout did not trigger a second order
        assert_eq!(place_calls(&mock), 1);
        assert_eq!(
            mock.count_calls(|c| matches!(c, GatewayCall::GetOrderByClientId { .. })),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_ambiguous_failure_proven_absent_is_retried() {
        let mock = MockGateway::new();
        mock.push_place_result(Err(ambiguous_timeout()));
        mock.push_client_id_query(Err(not_found()));
        mock.push_place_result(Ok(ack(10, "cid-2")));

        let cancel = CancellationToken::new();
        let report = submit_order(&mock, "ALTUSDT", &plan(), &cancel)
            .await
            .unwrap();

        assert_eq!(report.order_id, 10);
        assert_eq!(place_calls(&mock), 2);
    }

    #[tokio::test]
    async fn test_unresolved_ambiguity_stops_the_run() {
        let mock = MockGateway::new();
        mock.push_place_result(Err(ambiguous_timeout()));
        // the probe fails with something other than "unknown order"
        mock.push_client_id_query(Err(GatewayError::Transport {
            message: "connection reset".to_string(),
            ambiguous: false,
        }));

        let cancel = CancellationToken::new();
        let err = submit_order(&mock, "ALTUSDT", &plan(), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Submission(_)));
        // no blind retry after an unprovable outcome
        assert_eq!(place_calls(&mock), 1);
    }

    #[tokio::test]
    async fn test_each_attempt_uses_fresh_client_order_id() {
        let mock = MockGateway::new();
        mock.push_place_result(Err(rate_limited()));
        mock.push_place_result(Ok(ack(11, "cid-2")));

        let cancel = CancellationToken::new();
        submit_order(&mock, "ALTUSDT", &plan(), &cancel)
            .await
            .unwrap();

        let ids: Vec<String> = mock
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                GatewayCall::PlaceLimitSell {
                    client_order_id, ..
                } => Some(client_order_id),
                _ => None,
            })
            .collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert!(ids.iter().all(|id| id.len() == 32));
    }
}
