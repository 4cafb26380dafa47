//! Typed REST client for the exchange API.

use crate::credentials::Credentials;
use crate::error::{GatewayError, GatewayResult};
use crate::sign::sign_query;
use crate::wire::{decode_body, AccountInfo, ServerTime, TickerPrice, WireOrder};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use snipe_core::{
    AssetBalance, ExchangeInfo, OrderReport, OrderSide, OrderType, Price, Qty, TimeInForce,
};
use std::time::Duration;
use tracing::debug;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Header carrying the API key on signed requests.
const API_KEY_HEADER: &str = "X-MBX-APIKEY";

const PATH_TIME: &str = "/api/v3/time";
const PATH_EXCHANGE_INFO: &str = "/api/v3/exchangeInfo";
const PATH_TICKER_PRICE: &str = "/api/v3/ticker/price";
const PATH_ACCOUNT: &str = "/api/v3/account";
const PATH_ORDER: &str = "/api/v3/order";

/// Authenticated REST client.
///
/// One instance is created per run and shared by every stage; dropping
/// it releases the underlying connection pool.
pub struct RestClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
    recv_window_ms: u64,
}

impl RestClient {
    /// Create a new client against `base_url`
    /// (e.g. "https://api.binance.com").
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        recv_window_ms: u64,
    ) -> GatewayResult<Self> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            credentials,
            recv_window_ms,
        })
    }

    /// Current exchange clock, in Unix milliseconds.
    pub async fn server_time(&self) -> GatewayResult<u64> {
        let time: ServerTime = self.get_public(PATH_TIME, &[]).await?;
        Ok(time.server_time)
    }

    /// Full exchange metadata snapshot.
    pub async fn exchange_info(&self) -> GatewayResult<ExchangeInfo> {
        self.get_public(PATH_EXCHANGE_INFO, &[]).await
    }

    /// Latest traded price for one symbol.
    pub async fn ticker_price(&self, symbol: &str) -> GatewayResult<Price> {
        let ticker: TickerPrice = self
            .get_public(PATH_TICKER_PRICE, &[("symbol", symbol)])
            .await?;
        Ok(Price::new(ticker.price))
    }

    /// All account balances.
    pub async fn account_balances(&self) -> GatewayResult<Vec<AssetBalance>> {
        let account: AccountInfo = self.send_signed(Method::GET, PATH_ACCOUNT, vec![]).await?;
        Ok(account.balances)
    }

    /// Place a limit sell (GTC). `client_order_id` must be unique per
    /// attempt; it is the key for reconciling ambiguous failures.
    pub async fn place_limit_sell(
        &self,
        symbol: &str,
        quantity: Qty,
        price: Price,
        client_order_id: &str,
    ) -> GatewayResult<OrderReport> {
        debug!(%symbol, %quantity, %price, client_order_id, "placing limit sell");
        let params = vec![
            ("symbol", symbol.to_string()),
            ("side", OrderSide::Sell.to_string()),
            ("type", OrderType::Limit.to_string()),
            ("timeInForce", TimeInForce::Gtc.to_string()),
            ("quantity", quantity.to_string()),
            ("price", price.to_string()),
            ("newClientOrderId", client_order_id.to_string()),
            ("newOrderRespType", "FULL".to_string()),
        ];
        let order: WireOrder = self.send_signed(Method::POST, PATH_ORDER, params).await?;
        Ok(order.into_report())
    }

    /// Query an order by exchange-assigned id.
    pub async fn get_order(&self, symbol: &str, order_id: u64) -> GatewayResult<OrderReport> {
        let params = vec![
            ("symbol", symbol.to_string()),
            ("orderId", order_id.to_string()),
        ];
        let order: WireOrder = self.send_signed(Method::GET, PATH_ORDER, params).await?;
        Ok(order.into_report())
    }

    /// Query an order by the client-assigned id it was placed with.
    pub async fn get_order_by_client_id(
        &self,
        symbol: &str,
        client_order_id: &str,
    ) -> GatewayResult<OrderReport> {
        let params = vec![
            ("symbol", symbol.to_string()),
            ("origClientOrderId", client_order_id.to_string()),
        ];
        let order: WireOrder = self.send_signed(Method::GET, PATH_ORDER, params).await?;
        Ok(order.into_report())
    }

    /// Cancel a resting order.
    pub async fn cancel_order(&self, symbol: &str, order_id: u64) -> GatewayResult<OrderReport> {
        debug!(%symbol, order_id, "canceling order");
        let params = vec![
            ("symbol", symbol.to_string()),
            ("orderId", order_id.to_string()),
        ];
        let order: WireOrder = self.send_signed(Method::DELETE, PATH_ORDER, params).await?;
        Ok(order.into_report())
    }

    async fn get_public<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> GatewayResult<T> {
        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            let joined = query
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&joined);
        }
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| GatewayError::from_transport(&e))?;
        Self::read(response).await
    }

    /// Sign and send an authenticated request. The signature covers the
    /// exact query string sent, so the string is assembled by hand
    /// rather than through the client's parameter encoder.
    async fn send_signed<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> GatewayResult<T> {
        params.push(("recvWindow", self.recv_window_ms.to_string()));
        params.push(("timestamp", request_timestamp_ms().to_string()));

        let query = join_params(&params);
        let signature = sign_query(&query, self.credentials.api_secret());
        let url = format!(
            "{}{}?{}&signature={}",
            self.base_url, path, query, signature
        );

        let response = self
            .http
            .request(method, &url)
            .header(API_KEY_HEADER, self.credentials.api_key())
            .send()
            .await
            .map_err(|e| GatewayError::from_transport(&e))?;
        Self::read(response).await
    }

    async fn read<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::from_transport(&e))?;
        decode_body(status, &body)
    }
}

fn join_params(params: &[(&'static str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Timestamp attached to signed requests. This is request plumbing for
/// the exchange's replay protection, not launch timing; launch timing
/// only ever uses `server_time`.
fn request_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_join_params_preserves_order() {
        let params = vec![
            ("symbol", "ALTUSDT".to_string()),
            ("side", "SELL".to_string()),
            ("quantity", Qty::new(dec!(99.9)).to_string()),
        ];
        assert_eq!(join_params(&params), "symbol=ALTUSDT&side=SELL&quantity=99.9");
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = RestClient::new(
            "https://api.example.com/",
            Credentials::new("k", "s"),
            5000,
        )
        .unwrap();
        assert_eq!(client.base_url, "https://api.example.com");
    }
}
