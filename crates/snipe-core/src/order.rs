//! Order types: sides, statuses, plans, handles, and fill reports.

use crate::decimal::{Price, Qty};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Limit,
    Market,
    LimitMaker,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Limit => write!(f, "LIMIT"),
            OrderType::Market => write!(f, "MARKET"),
            OrderType::LimitMaker => write!(f, "LIMIT_MAKER"),
        }
    }
}

/// Time in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good until canceled.
    #[default]
    Gtc,
    /// Immediate or cancel.
    Ioc,
    /// Fill or kill.
    Fok,
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeInForce::Gtc => write!(f, "GTC"),
            TimeInForce::Ioc => write!(f, "IOC"),
            TimeInForce::Fok => write!(f, "FOK"),
        }
    }
}

/// Exchange-side order status.
///
/// `is_terminal` is the single source of truth for when supervision
/// stops: a terminal order never transitions again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    PendingCancel,
    Filled,
    Canceled,
    Rejected,
    Expired,
}

impl OrderStatus {
    /// True once no further state transition can occur.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled
                | OrderStatus::Canceled
                | OrderStatus::Rejected
                | OrderStatus::Expired
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::New => "NEW",
            OrderStatus::PartiallyFilled => "PARTIALLY_FILLED",
            OrderStatus::PendingCancel => "PENDING_CANCEL",
            OrderStatus::Filled => "FILLED",
            OrderStatus::Canceled => "CANCELED",
            OrderStatus::Rejected => "REJECTED",
            OrderStatus::Expired => "EXPIRED",
        };
        write!(f, "{s}")
    }
}

/// A computed limit-sell submission: price and quantity already
/// truncated to the pair's tick/step grid. Consumed once by the
/// submitter, then discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderPlan {
    pub price: Price,
    pub quantity: Qty,
}

/// Identity of a resting order, returned by successful submission.
///
/// Owned by the fill supervisor for its whole lifetime; invalid once a
/// terminal status is observed or cancellation succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderHandle {
    pub symbol: String,
    pub order_id: u64,
    pub client_order_id: String,
}

impl fmt::Display for OrderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.symbol, self.order_id)
    }
}

/// One execution against a resting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fill {
    pub price: Price,
    pub qty: Qty,
    pub commission: Decimal,
    pub commission_asset: String,
}

/// Snapshot of an order as reported by the exchange.
///
/// Produced from both the placement acknowledgement and later status
/// queries; query responses carry no per-fill rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReport {
    pub symbol: String,
    pub order_id: u64,
    pub client_order_id: String,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub side: OrderSide,
    pub price: Price,
    pub orig_qty: Qty,
    pub executed_qty: Qty,
    pub cumulative_quote_qty: Decimal,
    pub time_in_force: TimeInForce,
    pub fills: Vec<Fill>,
}

impl OrderReport {
    /// Handle for follow-up queries and cancellation.
    #[must_use]
    pub fn handle(&self) -> OrderHandle {
        OrderHandle {
            symbol: self.symbol.clone(),
            order_id: self.order_id,
            client_order_id: self.client_order_id.clone(),
        }
    }
}
