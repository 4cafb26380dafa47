//! Order planning: market inputs and the precision-compliant sell.

use crate::error::{EngineError, EngineResult};
use crate::gateway::Gateway;
use crate::poll::{poll_until, Outcome, PollConfig, PollError};
use snipe_core::{free_balance, OrderPlan, Price, Qty, SymbolFilters, TradeIntent};
use snipe_gateway::GatewayError;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Market state gathered just before planning.
#[derive(Debug, Clone)]
pub struct MarketInputs {
    /// Current traded price.
    pub price: Price,
    /// Free base-asset balance, or `None` when the balance could not
    /// be fetched (the configured quantity is used as-is then).
    pub free_balance: Option<Qty>,
    /// The pair's base asset, for diagnostics.
    pub base_asset: String,
}

/// Fetch the current price and the free base-asset balance.
///
/// The two reads are independent and run concurrently; this is the
/// pipeline's only point of parallelism. The price is mandatory, with
/// bounded retries and then a fatal error (a zero ticker price counts
/// as not yet available); the balance is best-effort.
pub async fn fetch_market_inputs(
    gateway: &dyn Gateway,
    intent: &TradeIntent,
    base_asset: &str,
    cancel: &CancellationToken,
) -> EngineResult<MarketInputs> {
    let price_config = PollConfig {
        interval: intent.price_fetch_delay,
        max_attempts: Some(intent.price_fetch_retries),
    };

    let price_fut = poll_until(
        &price_config,
        cancel,
        "price fetch",
        GatewayError::is_retryable,
        || async move {
            let price = gateway.ticker_price(&intent.symbol).await?;
            if price.is_positive() {
                Ok(Outcome::Ready(price))
            } else {
                warn!(symbol = %intent.symbol, "ticker returned zero price");
                Ok(Outcome::Pending)
            }
        },
    );

    let balance_fut = async {
        match gateway.account_balances().await {
            Ok(balances) => Some(free_balance(&balances, base_asset)),
            Err(e) => {
                warn!(error = %e, "balance fetch failed; will sell the configured quantity");
                None
            }
        }
    };

    let (price_result, balance) = tokio::join!(price_fut, balance_fut);

    let price = price_result.map_err(|e| match e {
        PollError::Cancelled => EngineError::Cancelled,
        PollError::Fatal(g) => EngineError::PriceUnavailable(g.to_string()),
        PollError::Exhausted { attempts, last } => EngineError::PriceUnavailable(match last {
            Some(g) => format!("exhausted {attempts} attempts: {g}"),
            None => format!("ticker price still zero after {attempts} attempts"),
        }),
    })?;

    info!(
        symbol = %intent.symbol,
        %price,
        balance = ?balance.map(|b| b.to_string()),
        "market inputs fetched"
    );

    Ok(MarketInputs {
        price,
        free_balance: balance,
        base_asset: base_asset.to_string(),
    })
}

/// Compute the limit sell for one submission attempt.
///
/// Target price is the current price minus the configured offset,
/// truncated (never rounded up) to the pair's price precision; the
/// quantity is capped by the free balance when known and truncated to
/// the quantity precision. All arithmetic is exact decimal.
pub fn plan_order(
    intent: &TradeIntent,
    filters: &SymbolFilters,
    inputs: &MarketInputs,
) -> EngineResult<OrderPlan> {
    let price = inputs
        .price
        .with_discount_pct(intent.price_offset_pct)
        .trunc_to_decimals(filters.price_decimals);

    let sellable = match inputs.free_balance {
        Some(balance) => intent.quantity.min(balance),
        None => intent.quantity,
    };
    let quantity = sellable.trunc_to_decimals(filters.qty_decimals);

    if !quantity.is_positive() {
        return Err(EngineError::NoBalance(inputs.base_asset.clone()));
    }
    if !price.is_positive() {
        return Err(EngineError::Plan(format!(
            "target price {} truncates to zero at {} decimals",
            inputs.price.with_discount_pct(intent.price_offset_pct),
            filters.price_decimals
        )));
    }

    info!(
        %price,
        %quantity,
        market_price = %inputs.price,
        offset_pct = %intent.price_offset_pct,
        "order planned"
    );

    Ok(OrderPlan { price, quantity })
}
