//! Precision-safe decimal types for trading.
//!
//! Uses `rust_decimal` for exact decimal arithmetic, avoiding
//! floating-point rounding errors critical in financial calculations.
//! Rounding toward the tick grid is always truncation (round toward
//! zero): a planned price or quantity must never exceed the exact value
//! it was derived from.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

/// Price with exact decimal precision.
///
/// Wraps `Decimal` to provide type safety and prevent mixing
/// prices with quantities in calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Apply a percentage discount: `price - price * pct / 100`.
    ///
    /// Exact decimal arithmetic; no rounding is applied here.
    #[inline]
    pub fn with_discount_pct(&self, pct: Decimal) -> Self {
        Self(self.0 - (self.0 * pct / Decimal::from(100)))
    }

    /// Truncate to a number of decimal places (round toward zero).
    ///
    /// The result is always <= the input for non-negative prices.
    #[inline]
    pub fn trunc_to_decimals(&self, decimals: u32) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(decimals, RoundingStrategy::ToZero),
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<Decimal> for Price {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

/// Quantity with exact decimal precision.
///
/// Wraps `Decimal` to provide type safety and prevent mixing
/// quantities with prices in calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Qty(pub Decimal);

impl Qty {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// The smaller of two quantities.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    /// Truncate to a number of decimal places (round toward zero).
    ///
    /// The result is always <= the input for non-negative quantities.
    #[inline]
    pub fn trunc_to_decimals(&self, decimals: u32) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(decimals, RoundingStrategy::ToZero),
        )
    }

    /// Notional value: quantity * price.
    #[inline]
    pub fn notional(&self, price: Price) -> Decimal {
        self.0 * price.0
    }
}

impl fmt::Display for Qty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Qty {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Qty {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

impl Add for Qty {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Qty {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_discount_exact() {
        // 100.00 at 1% off must be exactly 99.00, not 99.0001 from float noise
        let price = Price::new(dec!(100.00));
        let target = price.with_discount_pct(dec!(1.0)).trunc_to_decimals(2);
        assert_eq!(target.0, dec!(99.00));
    }

    #[test]
    fn test_price_truncates_never_rounds_up() {
        let price = Price::new(dec!(99.019));
        assert_eq!(price.trunc_to_decimals(2).0, dec!(99.01));

        let exact = Price::new(dec!(12345.6789)).with_discount_pct(dec!(0.37));
        let truncated = exact.trunc_to_decimals(2);
        assert!(truncated.0 <= exact.0);
    }

    #[test]
    fn test_qty_trunc_to_decimals() {
        let qty = Qty::new(dec!(1.23456789));
        assert_eq!(qty.trunc_to_decimals(3).0, dec!(1.234));
        assert_eq!(qty.trunc_to_decimals(0).0, dec!(1));
    }

    #[test]
    fn test_qty_min() {
        let requested = Qty::new(dec!(100));
        let balance = Qty::new(dec!(42.5));
        assert_eq!(requested.min(balance), balance);
        assert_eq!(balance.min(requested), balance);
    }

    #[test]
    fn test_notional_calculation() {
        let qty = Qty::new(dec!(0.5));
        let price = Price::new(dec!(50000));
        assert_eq!(qty.notional(price), dec!(25000));
    }

    #[test]
    fn test_parse_from_str() {
        let price: Price = "0.00012345".parse().unwrap();
        assert_eq!(price.0, dec!(0.00012345));
        assert!("not-a-price".parse::<Qty>().is_err());
    }
}
