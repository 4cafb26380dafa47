//! Core domain types for the listing-snipe sell bot.
//!
//! This crate provides fundamental types used throughout the sequencer:
//! - `Price`, `Qty`: Precision-safe numeric types
//! - `SymbolFilters`: Per-pair rounding rules derived from exchange metadata
//! - `ExchangeInfo`, `SymbolInfo`: Exchange metadata model
//! - `TradeIntent`: Validated, immutable trade parameters
//! - Order enums and the fill-report data model

pub mod account;
pub mod decimal;
pub mod error;
pub mod exchange_info;
pub mod filters;
pub mod intent;
pub mod order;

pub use account::{free_balance, AssetBalance};
pub use decimal::{Price, Qty};
pub use error::{CoreError, Result};
pub use exchange_info::{ExchangeInfo, SymbolFilter, SymbolInfo};
pub use filters::{SymbolFilters, DEFAULT_FILTER_DECIMALS};
pub use intent::{parse_launch_instant, TradeIntent};
pub use order::{
    Fill, OrderHandle, OrderPlan, OrderReport, OrderSide, OrderStatus, OrderType, TimeInForce,
};
