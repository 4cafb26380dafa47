//! Main application orchestration.
//!
//! Wires the pipeline stages in order:
//! launch sync -> listing detect -> (price || balance) -> plan ->
//! submit -> supervise. One cancellation token, tripped by ctrl-c,
//! threads through every stage; the gateway is owned by `run` so the
//! connection is released on every exit path.

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::report;
use snipe_core::{CoreError, SymbolFilters, TradeIntent};
use snipe_engine::{
    fetch_market_inputs, plan_order, submit_order, supervise_fill, wait_for_launch,
    wait_for_listing, FillOutcome, Gateway, LiveGateway,
};
use snipe_gateway::RestClient;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Main application.
pub struct Application {
    config: AppConfig,
    intent: TradeIntent,
}

impl Application {
    /// Create a new application, validating the trade intent up front.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let intent = config.trade_intent()?;
        Ok(Self { config, intent })
    }

    /// Run the full sequence against the live exchange.
    pub async fn run(self) -> AppResult<()> {
        let credentials = self.config.credentials()?;
        let client = RestClient::new(
            &self.config.exchange.base_url,
            credentials,
            self.config.exchange.recv_window_ms,
        )?;
        let gateway = LiveGateway::new(client);

        // One shared cancellation signal; the interrupt handler trips
        // it and every suspension point in the pipeline honors it.
        let cancel = CancellationToken::new();
        let signal_token = cancel.clone();
        let signal_task = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received; aborting run");
                signal_token.cancel();
            }
        });

        // The gateway is scoped to this call: whatever happens inside
        // the pipeline, the connection pool is dropped when we return.
        let result = self.run_with(&gateway, &cancel).await;
        signal_task.abort();
        result
    }

    /// Run the pipeline against any gateway.
    ///
    /// Split from [`run`](Self::run) so scenarios can drive the whole
    /// sequence against a scripted gateway.
    pub async fn run_with(
        &self,
        gateway: &dyn Gateway,
        cancel: &CancellationToken,
    ) -> AppResult<()> {
        let intent = &self.intent;

        wait_for_launch(gateway, intent.launch_at, intent.launch_lead, cancel).await?;

        let info = wait_for_listing(
            gateway,
            &intent.symbol,
            intent.listing_poll_interval,
            cancel,
        )
        .await?;

        let filters = SymbolFilters::resolve(&info, &intent.symbol)?;
        let base_asset = info
            .symbol(&intent.symbol)
            .map(|s| s.base_asset.clone())
            .ok_or_else(|| CoreError::SymbolNotListed(intent.symbol.clone()))?;
        info!(
            symbol = %intent.symbol,
            base_asset,
            price_decimals = filters.price_decimals,
            qty_decimals = filters.qty_decimals,
            "symbol filters resolved"
        );

        let inputs = fetch_market_inputs(gateway, intent, &base_asset, cancel).await?;
        let plan = plan_order(intent, &filters, &inputs)?;

        let ack = submit_order(gateway, &intent.symbol, &plan, cancel).await?;
        let handle = ack.handle();

        let outcome = supervise_fill(
            gateway,
            &handle,
            intent.order_timeout,
            intent.status_poll_interval,
            cancel,
        )
        .await?;

        match outcome {
            FillOutcome::Filled(final_report) => {
                info!(order_id = final_report.order_id, "sale completed");
                report::print_order_report(&final_report);
            }
            FillOutcome::Closed(final_report) => {
                warn!(
                    order_id = final_report.order_id,
                    status = %final_report.status,
                    "order closed without fill"
                );
            }
            FillOutcome::TimedOut { canceled } => match canceled {
                Some(final_report) => info!(
                    order_id = final_report.order_id,
                    status = %final_report.status,
                    "order canceled after timeout"
                ),
                None => warn!(
                    order_id = handle.order_id,
                    "cancellation outcome unknown after timeout; check the exchange"
                ),
            },
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> AppConfig {
        toml::from_str(
            r#"
            [trade]
            symbol = "ALTUSDT"
            quantity = "100"
            price_offset_pct = "1.0"
            launch_at = "2025-05-29 12:00:00"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_new_validates_intent() {
        assert!(Application::new(sample_config()).is_ok());

        let mut config = sample_config();
        config.trade.price_offset_pct = rust_decimal::Decimal::from(100);
        assert!(Application::new(config).is_err());
    }
}
