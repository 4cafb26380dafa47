//! Account balance types.

use crate::decimal::Qty;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Balance of a single asset as reported by the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetBalance {
    pub asset: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub free: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub locked: Decimal,
}

/// Free (sellable) amount of `asset`, or zero when the account carries
/// no row for it.
#[must_use]
pub fn free_balance(balances: &[AssetBalance], asset: &str) -> Qty {
    balances
        .iter()
        .find(|b| b.asset == asset)
        .map(|b| Qty::new(b.free))
        .unwrap_or(Qty::ZERO)
}
