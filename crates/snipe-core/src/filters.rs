//! Per-pair rounding rules derived from exchange metadata.

use crate::error::{CoreError, Result};
use crate::exchange_info::{ExchangeInfo, SymbolFilter, SymbolInfo};
use rust_decimal::Decimal;

/// Decimal places assumed when a pair declares no filter of a kind.
/// A documented fallback, not a silent zero.
pub const DEFAULT_FILTER_DECIMALS: u32 = 6;

/// Rounding rules for one trading pair: decimal places allowed for
/// price (from tick size) and quantity (from step size).
///
/// Derived once per run from the metadata snapshot; immutable after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolFilters {
    pub price_decimals: u32,
    pub qty_decimals: u32,
}

impl SymbolFilters {
    /// Resolve rounding rules for `symbol` from a metadata snapshot.
    ///
    /// Pure and idempotent; fails only when the symbol is absent from
    /// the snapshot.
    pub fn resolve(info: &ExchangeInfo, symbol: &str) -> Result<Self> {
        let sym = info
            .symbol(symbol)
            .ok_or_else(|| CoreError::SymbolNotListed(symbol.to_string()))?;
        Ok(Self::from_symbol(sym))
    }

    /// Derive rounding rules from one pair's declared filters.
    #[must_use]
    pub fn from_symbol(sym: &SymbolInfo) -> Self {
        let price_decimals = sym
            .filters
            .iter()
            .find_map(|f| match f {
                SymbolFilter::Price { tick_size } => Some(decimals_of(*tick_size)),
                _ => None,
            })
            .unwrap_or(DEFAULT_FILTER_DECIMALS);

        let qty_decimals = sym
            .filters
            .iter()
            .find_map(|f| match f {
                SymbolFilter::LotSize { step_size } => Some(decimals_of(*step_size)),
                _ => None,
            })
            .unwrap_or(DEFAULT_FILTER_DECIMALS);

        Self {
            price_decimals,
            qty_decimals,
        }
    }
}

/// Decimal places of a tick/step increment.
///
/// The exchange pads increments with trailing zeros ("0.01000000"), so
/// normalize first: 0.01000000 -> 2, 0.5 -> 1, 1 -> 0.
fn decimals_of(increment: Decimal) -> u32 {
    if increment.is_zero() {
        return DEFAULT_FILTER_DECIMALS;
    }
    increment.normalize().scale()
}
