//! The immutable trade parameters for one run.

use crate::decimal::Qty;
use crate::error::{CoreError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::time::Duration;

/// Wall-clock format of the configured launch instant (UTC).
pub const LAUNCH_INSTANT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Everything the sequencer needs for one run, validated once at
/// startup and never mutated. The launch instant in particular is a
/// fixed point in time; it is never recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeIntent {
    /// Trading pair to sell into (e.g. "ALTUSDT").
    pub symbol: String,
    /// Base-asset quantity to sell.
    pub quantity: Qty,
    /// Percent below market price to place the limit (0 <= pct < 100).
    pub price_offset_pct: Decimal,
    /// Cancel the order when it has not filled within this window.
    pub order_timeout: Duration,
    /// Interval between tradable-pair metadata polls.
    pub listing_poll_interval: Duration,
    /// Interval between order status polls.
    pub status_poll_interval: Duration,
    /// Bounded attempts for the initial price fetch.
    pub price_fetch_retries: u32,
    /// Delay between price fetch attempts.
    pub price_fetch_delay: Duration,
    /// Instant trading is expected to start (UTC).
    pub launch_at: DateTime<Utc>,
    /// Wake up this long before the launch instant.
    pub launch_lead: Duration,
}

impl TradeIntent {
    /// Enforce the intent invariants.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(CoreError::InvalidIntent("symbol must not be empty".into()));
        }
        if !self.quantity.is_positive() {
            return Err(CoreError::InvalidIntent(format!(
                "quantity must be > 0, got {}",
                self.quantity
            )));
        }
        if self.price_offset_pct < Decimal::ZERO || self.price_offset_pct >= Decimal::from(100) {
            return Err(CoreError::InvalidIntent(format!(
                "price offset must be in [0, 100), got {}",
                self.price_offset_pct
            )));
        }
        if self.price_fetch_retries == 0 {
            return Err(CoreError::InvalidIntent(
                "price fetch retries must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

/// Parse a configured launch instant such as "2025-05-29 12:00:00",
/// interpreted as UTC.
pub fn parse_launch_instant(value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, LAUNCH_INSTANT_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| CoreError::InvalidLaunchInstant {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_intent() -> TradeIntent {
        TradeIntent {
            symbol: "ALTUSDT".to_string(),
            quantity: Qty::new(dec!(100)),
            price_offset_pct: dec!(1.0),
            order_timeout: Duration::from_secs(30),
            listing_poll_interval: Duration::from_millis(500),
            status_poll_interval: Duration::from_millis(500),
            price_fetch_retries: 3,
            price_fetch_delay: Duration::from_millis(500),
            launch_at: parse_launch_instant("2025-05-29 12:00:00").unwrap(),
            launch_lead: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_valid_intent() {
        assert!(sample_intent().validate().is_ok());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut intent = sample_intent();
        intent.quantity = Qty::ZERO;
        assert!(intent.validate().is_err());
    }

    #[test]
    fn test_offset_bounds() {
        let mut intent = sample_intent();
        intent.price_offset_pct = dec!(100);
        assert!(intent.validate().is_err());

        intent.price_offset_pct = dec!(-0.5);
        assert!(intent.validate().is_err());

        intent.price_offset_pct = dec!(0);
        assert!(intent.validate().is_ok());

        intent.price_offset_pct = dec!(99.999);
        assert!(intent.validate().is_ok());
    }

    #[test]
    fn test_parse_launch_instant() {
        let at = parse_launch_instant("2025-05-29 12:00:00").unwrap();
        assert_eq!(at.timestamp(), 1748520000);

        assert!(parse_launch_instant("2025-05-29T12:00:00Z").is_err());
        assert!(parse_launch_instant("yesterday").is_err());
    }
}
