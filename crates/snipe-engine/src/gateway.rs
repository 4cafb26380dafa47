//! Exchange gateway trait for the pipeline stages.
//!
//! A trait-based abstraction over the exchange's remote surface,
//! allowing:
//! - Dependency injection for testing
//! - Separation of sequencing logic from transport

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::Mutex;
use snipe_core::{AssetBalance, ExchangeInfo, OrderReport, Price, Qty};
use snipe_gateway::{GatewayError, GatewayResult};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// The exchange surface consumed by the pipeline.
///
/// Treated as an unreliable, latent, rate-limited collaborator; every
/// method is one remote round trip.
pub trait Gateway: Send + Sync {
    /// Current exchange clock, Unix milliseconds.
    fn server_time(&self) -> BoxFuture<'_, GatewayResult<u64>>;

    /// Full exchange metadata snapshot.
    fn exchange_info(&self) -> BoxFuture<'_, GatewayResult<ExchangeInfo>>;

    /// Latest traded price for a symbol.
    fn ticker_price<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, GatewayResult<Price>>;

    /// All account balances.
    fn account_balances(&self) -> BoxFuture<'_, GatewayResult<Vec<AssetBalance>>>;

    /// Place a limit sell; `client_order_id` must be unique per attempt.
    fn place_limit_sell<'a>(
        &'a self,
        symbol: &'a str,
        quantity: Qty,
        price: Price,
        client_order_id: &'a str,
    ) -> BoxFuture<'a, GatewayResult<OrderReport>>;

    /// Query an order by exchange-assigned id.
    fn get_order<'a>(
        &'a self,
        symbol: &'a str,
        order_id: u64,
    ) -> BoxFuture<'a, GatewayResult<OrderReport>>;

    /// Query an order by the client-assigned id it was placed with.
    fn get_order_by_client_id<'a>(
        &'a self,
        symbol: &'a str,
        client_order_id: &'a str,
    ) -> BoxFuture<'a, GatewayResult<OrderReport>>;

    /// Cancel a resting order.
    fn cancel_order<'a>(
        &'a self,
        symbol: &'a str,
        order_id: u64,
    ) -> BoxFuture<'a, GatewayResult<OrderReport>>;
}

/// Arc wrapper for Gateway trait objects.
pub type DynGateway = Arc<dyn Gateway>;

/// One recorded call against the mock gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    ServerTime,
    ExchangeInfo,
    TickerPrice {
        symbol: String,
    },
    AccountBalances,
    PlaceLimitSell {
        symbol: String,
        quantity: Qty,
        price: Price,
        client_order_id: String,
    },
    GetOrder {
        symbol: String,
        order_id: u64,
    },
    GetOrderByClientId {
        symbol: String,
        client_order_id: String,
    },
    CancelOrder {
        symbol: String,
        order_id: u64,
    },
}

/// Scripted gateway for testing.
///
/// Each method pops the next scripted response from its queue and
/// records the call for verification. An empty queue yields a
/// non-ambiguous transport error, so under-scripted tests fail loudly
/// through the normal error paths.
#[derive(Default)]
pub struct MockGateway {
    server_times: Mutex<VecDeque<GatewayResult<u64>>>,
    exchange_infos: Mutex<VecDeque<GatewayResult<ExchangeInfo>>>,
    ticker_prices: Mutex<VecDeque<GatewayResult<Price>>>,
    balances: Mutex<VecDeque<GatewayResult<Vec<AssetBalance>>>>,
    place_results: Mutex<VecDeque<GatewayResult<OrderReport>>>,
    order_queries: Mutex<VecDeque<GatewayResult<OrderReport>>>,
    client_id_queries: Mutex<VecDeque<GatewayResult<OrderReport>>>,
    cancel_results: Mutex<VecDeque<GatewayResult<OrderReport>>>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_server_time(&self, result: GatewayResult<u64>) {
        self.server_times.lock().push_back(result);
    }

    pub fn push_exchange_info(&self, result: GatewayResult<ExchangeInfo>) {
        self.exchange_infos.lock().push_back(result);
    }

    pub fn push_ticker_price(&self, result: GatewayResult<Price>) {
        self.ticker_prices.lock().push_back(result);
    }

    pub fn push_balances(&self, result: GatewayResult<Vec<AssetBalance>>) {
        self.balances.lock().push_back(result);
    }

    pub fn push_place_result(&self, result: GatewayResult<OrderReport>) {
        self.place_results.lock().push_back(result);
    }

    pub fn push_order_query(&self, result: GatewayResult<OrderReport>) {
        self.order_queries.lock().push_back(result);
    }

    pub fn push_client_id_query(&self, result: GatewayResult<OrderReport>) {
        self.client_id_queries.lock().push_back(result);
    }

    pub fn push_cancel_result(&self, result: GatewayResult<OrderReport>) {
        self.cancel_results.lock().push_back(result);
    }

    /// All calls recorded so far, in order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().clone()
    }

    /// Number of recorded calls matching a predicate.
    pub fn count_calls(&self, pred: impl Fn(&GatewayCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().push(call);
    }

    fn next<T>(queue: &Mutex<VecDeque<GatewayResult<T>>>, what: &str) -> GatewayResult<T> {
        queue.lock().pop_front().unwrap_or_else(|| {
            Err(GatewayError::Transport {
                message: format!("mock gateway: no scripted {what} response"),
                ambiguous: false,
            })
        })
    }
}

impl Gateway for MockGateway {
    fn server_time(&self) -> BoxFuture<'_, GatewayResult<u64>> {
        self.record(GatewayCall::ServerTime);
        let result = Self::next(&self.server_times, "server_time");
        Box::pin(async move { result })
    }

    fn exchange_info(&self) -> BoxFuture<'_, GatewayResult<ExchangeInfo>> {
        self.record(GatewayCall::ExchangeInfo);
        let result = Self::next(&self.exchange_infos, "exchange_info");
        Box::pin(async move { result })
    }

    fn ticker_price<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, GatewayResult<Price>> {
        self.record(GatewayCall::TickerPrice {
            symbol: symbol.to_string(),
        });
        let result = Self::next(&self.ticker_prices, "ticker_price");
        Box::pin(async move { result })
    }

    fn account_balances(&self) -> BoxFuture<'_, GatewayResult<Vec<AssetBalance>>> {
        self.record(GatewayCall::AccountBalances);
        let result = Self::next(&self.balances, "account_balances");
        Box::pin(async move { result })
    }

    fn place_limit_sell<'a>(
        &'a self,
        symbol: &'a str,
        quantity: Qty,
        price: Price,
        client_order_id: &'a str,
    ) -> BoxFuture<'a, GatewayResult<OrderReport>> {
        self.record(GatewayCall::PlaceLimitSell {
            symbol: symbol.to_string(),
            quantity,
            price,
            client_order_id: client_order_id.to_string(),
        });
        let result = Self::next(&self.place_results, "place_limit_sell");
        Box::pin(async move { result })
    }

    fn get_order<'a>(
        &'a self,
        symbol: &'a str,
        order_id: u64,
    ) -> BoxFuture<'a, GatewayResult<OrderReport>> {
        self.record(GatewayCall::GetOrder {
            symbol: symbol.to_string(),
            order_id,
        });
        let result = Self::next(&self.order_queries, "get_order");
        Box::pin(async move { result })
    }

    fn get_order_by_client_id<'a>(
        &'a self,
        symbol: &'a str,
        client_order_id: &'a str,
    ) -> BoxFuture<'a, GatewayResult<OrderReport>> {
        self.record(GatewayCall::GetOrderByClientId {
            symbol: symbol.to_string(),
            client_order_id: client_order_id.to_string(),
        });
        let result = Self::next(&self.client_id_queries, "get_order_by_client_id");
        Box::pin(async move { result })
    }

    fn cancel_order<'a>(
        &'a self,
        symbol: &'a str,
        order_id: u64,
    ) -> BoxFuture<'a, GatewayResult<OrderReport>> {
        self.record(GatewayCall::CancelOrder {
            symbol: symbol.to_string(),
            order_id,
        });
        let result = Self::next(&self.cancel_results, "cancel_order");
        Box::pin(async move { result })
    }
}
