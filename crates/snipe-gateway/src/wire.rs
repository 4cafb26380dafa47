//! Wire-format types for the exchange's JSON payloads.
//!
//! The exchange encodes prices and quantities as strings; everything
//! decodes into `rust_decimal::Decimal` before reaching domain types.

use crate::error::{GatewayError, GatewayResult};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use snipe_core::{
    AssetBalance, Fill, OrderReport, OrderSide, OrderStatus, OrderType, Price, Qty, TimeInForce,
};

/// Server clock sample.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ServerTime {
    pub server_time: u64,
}

/// Latest price for one symbol.
#[derive(Debug, Deserialize)]
pub(crate) struct TickerPrice {
    #[allow(dead_code)]
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

/// Account snapshot; only the balances are consumed.
#[derive(Debug, Deserialize)]
pub(crate) struct AccountInfo {
    #[serde(default)]
    pub balances: Vec<AssetBalance>,
}

/// Order payload shared by placement acknowledgements, status queries,
/// and cancel responses. Fields absent from a given response kind fall
/// back to defaults.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireOrder {
    pub symbol: String,
    pub order_id: u64,
    #[serde(default)]
    pub client_order_id: String,
    /// Cancel responses identify the canceled order here instead.
    #[serde(default)]
    pub orig_client_order_id: Option<String>,
    pub status: OrderStatus,
    #[serde(default)]
    pub time_in_force: TimeInForce,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: OrderSide,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub orig_qty: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub executed_qty: Decimal,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub cummulative_quote_qty: Decimal,
    #[serde(default)]
    pub fills: Vec<WireFill>,
}

/// Per-fill row in a FULL placement acknowledgement.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireFill {
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub qty: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub commission: Decimal,
    pub commission_asset: String,
}

impl WireOrder {
    /// Convert into the domain-level order snapshot.
    pub(crate) fn into_report(self) -> OrderReport {
        let client_order_id = if !self.client_order_id.is_empty() {
            self.client_order_id
        } else {
            self.orig_client_order_id.unwrap_or_default()
        };
        OrderReport {
            symbol: self.symbol,
            order_id: self.order_id,
            client_order_id,
            status: self.status,
            order_type: self.order_type,
            side: self.side,
            price: Price::new(self.price),
            orig_qty: Qty::new(self.orig_qty),
            executed_qty: Qty::new(self.executed_qty),
            cumulative_quote_qty: self.cummulative_quote_qty,
            time_in_force: self.time_in_force,
            fills: self
                .fills
                .into_iter()
                .map(|f| Fill {
                    price: Price::new(f.price),
                    qty: Qty::new(f.qty),
                    commission: f.commission,
                    commission_asset: f.commission_asset,
                })
                .collect(),
        }
    }
}

/// Exchange error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: i64,
    msg: String,
}

/// Decode a response body, mapping non-success statuses to classified
/// API errors. Pure so the mapping is unit-testable without a server.
pub(crate) fn decode_body<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> GatewayResult<T> {
    if status.is_success() {
        return serde_json::from_slice(body).map_err(|e| GatewayError::Decode(e.to_string()));
    }

    // Error payloads carry {code, msg}; anything else is surfaced raw.
    let (code, message) = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(err) => (err.code, err.msg),
        Err(_) => (-1, String::from_utf8_lossy(body).into_owned()),
    };
    Err(GatewayError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const PLACE_ACK_FULL: &str = r#"{
        "symbol": "ALTUSDT",
        "orderId": 28,
        "orderListId": -1,
        "clientOrderId": "6gCrw2kRUAF9CvJDGP16IP",
        "transactTime": 1507725176595,
        "price": "99.00000000",
        "origQty": "100.00000000",
        "executedQty": "10.00000000",
        "cummulativeQuoteQty": "990.00000000",
        "status": "PARTIALLY_FILLED",
        "timeInForce": "GTC",
        "type": "LIMIT",
        "side": "SELL",
        "fills": [
            {"price": "99.00000000", "qty": "10.00000000", "commission": "0.99000000", "commissionAsset": "USDT", "tradeId": 56}
        ]
    }"#;

    const QUERY_RESPONSE: &str = r#"{
        "symbol": "ALTUSDT",
        "orderId": 28,
        "orderListId": -1,
        "clientOrderId": "6gCrw2kRUAF9CvJDGP16IP",
        "price": "99.00000000",
        "origQty": "100.00000000",
        "executedQty": "0.00000000",
        "cummulativeQuoteQty": "0.00000000",
        "status": "NEW",
        "timeInForce": "GTC",
        "type": "LIMIT",
        "side": "SELL",
        "stopPrice": "0.0",
        "time": 1499827319559,
        "updateTime": 1499827319559,
        "isWorking": true
    }"#;

    const CANCEL_RESPONSE: &str = r#"{
        "symbol": "ALTUSDT",
        "origClientOrderId": "6gCrw2kRUAF9CvJDGP16IP",
        "orderId": 28,
        "orderListId": -1,
        "clientOrderId": "",
        "price": "99.00000000",
        "origQty": "100.00000000",
        "executedQty": "0.00000000",
        "cummulativeQuoteQty": "0.00000000",
        "status": "CANCELED",
        "timeInForce": "GTC",
        "type": "LIMIT",
        "side": "SELL"
    }"#;

    #[test]
    fn test_decode_place_ack_with_fills() {
        let report = decode_body::<WireOrder>(StatusCode::OK, PLACE_ACK_FULL.as_bytes())
            .unwrap()
            .into_report();
        assert_eq!(report.order_id, 28);
        assert_eq!(report.status, OrderStatus::PartiallyFilled);
        assert_eq!(report.price, Price::new(dec!(99)));
        assert_eq!(report.orig_qty, Qty::new(dec!(100)));
        assert_eq!(report.cumulative_quote_qty, dec!(990));
        assert_eq!(report.fills.len(), 1);
        assert_eq!(report.fills[0].commission_asset, "USDT");
    }

    #[test]
    fn test_decode_query_without_fills() {
        let report = decode_body::<WireOrder>(StatusCode::OK, QUERY_RESPONSE.as_bytes())
            .unwrap()
            .into_report();
        assert_eq!(report.status, OrderStatus::New);
        assert!(report.fills.is_empty());
        assert_eq!(report.client_order_id, "6gCrw2kRUAF9CvJDGP16IP");
    }

    #[test]
    fn test_cancel_response_client_id_fallback() {
        let report = decode_body::<WireOrder>(StatusCode::OK, CANCEL_RESPONSE.as_bytes())
            .unwrap()
            .into_report();
        assert_eq!(report.status, OrderStatus::Canceled);
        assert_eq!(report.client_order_id, "6gCrw2kRUAF9CvJDGP16IP");
    }

    #[test]
    fn test_decode_error_body() {
        let err = decode_body::<WireOrder>(
            StatusCode::BAD_REQUEST,
            br#"{"code": -2013, "msg": "Order does not exist."}"#,
        )
        .unwrap_err();
        assert!(err.is_unknown_order());
        match err {
            GatewayError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, -2013);
                assert_eq!(message, "Order does not exist.");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_non_json_error_body() {
        let err =
            decode_body::<WireOrder>(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>")
                .unwrap_err();
        assert!(err.is_retryable());
        assert!(!err.is_unknown_order());
    }

    #[test]
    fn test_decode_garbage_success_body() {
        let err = decode_body::<ServerTime>(StatusCode::OK, b"not json").unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
        assert!(err.is_retryable());
    }
}
