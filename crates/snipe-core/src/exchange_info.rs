//! Exchange metadata model.
//!
//! Decoded from the exchange's metadata endpoint. Only the fields the
//! sequencer consumes are modeled; everything else in the (large)
//! payload is ignored during deserialization.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Symbol status in which orders are accepted.
pub const STATUS_TRADING: &str = "TRADING";

/// Snapshot of exchange metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExchangeInfo {
    #[serde(default)]
    pub symbols: Vec<SymbolInfo>,
}

impl ExchangeInfo {
    /// Look up a symbol by name.
    #[must_use]
    pub fn symbol(&self, symbol: &str) -> Option<&SymbolInfo> {
        self.symbols.iter().find(|s| s.symbol == symbol)
    }

    /// True when the symbol is present and open for trading.
    #[must_use]
    pub fn is_tradable(&self, symbol: &str) -> bool {
        self.symbol(symbol).is_some_and(SymbolInfo::is_trading)
    }
}

/// Per-pair metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub base_asset: String,
    #[serde(default)]
    pub quote_asset: String,
    #[serde(default)]
    pub filters: Vec<SymbolFilter>,
}

impl SymbolInfo {
    #[must_use]
    pub fn is_trading(&self) -> bool {
        self.status == STATUS_TRADING
    }
}

/// Per-pair order validation filter, tagged by the exchange's
/// `filterType` discriminator. Kinds the sequencer does not consume
/// decode as `Other`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "filterType")]
pub enum SymbolFilter {
    /// Price must land on a multiple of `tick_size`.
    #[serde(rename = "PRICE_FILTER")]
    Price {
        #[serde(rename = "tickSize", with = "rust_decimal::serde::str")]
        tick_size: Decimal,
    },
    /// Quantity must land on a multiple of `step_size`.
    #[serde(rename = "LOT_SIZE")]
    LotSize {
        #[serde(rename = "stepSize", with = "rust_decimal::serde::str")]
        step_size: Decimal,
    },
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const METADATA_FIXTURE: &str = r#"{
        "timezone": "UTC",
        "serverTime": 1684804350068,
        "symbols": [
            {
                "symbol": "ALTUSDT",
                "status": "TRADING",
                "baseAsset": "ALT",
                "quoteAsset": "USDT",
                "filters": [
                    {"filterType": "PRICE_FILTER", "minPrice": "0.00010000", "maxPrice": "1000.00000000", "tickSize": "0.00010000"},
                    {"filterType": "LOT_SIZE", "minQty": "0.10000000", "maxQty": "92141578.00000000", "stepSize": "0.10000000"},
                    {"filterType": "NOTIONAL", "minNotional": "5.00000000"}
                ]
            },
            {
                "symbol": "HALTUSDT",
                "status": "BREAK",
                "baseAsset": "HALT",
                "quoteAsset": "USDT",
                "filters": []
            }
        ]
    }"#;

    #[test]
    fn test_decode_metadata_fixture() {
        let info: ExchangeInfo = serde_json::from_str(METADATA_FIXTURE).unwrap();
        assert_eq!(info.symbols.len(), 2);

        let alt = info.symbol("ALTUSDT").unwrap();
        assert_eq!(alt.base_asset, "ALT");
        assert_eq!(alt.filters.len(), 3);
        assert!(matches!(
            alt.filters[0],
            SymbolFilter::Price { tick_size } if tick_size == dec!(0.00010000)
        ));
        assert!(matches!(
            alt.filters[1],
            SymbolFilter::LotSize { step_size } if step_size == dec!(0.10000000)
        ));
        assert!(matches!(alt.filters[2], SymbolFilter::Other));
    }

    #[test]
    fn test_tradable_requires_trading_status() {
        let info: ExchangeInfo = serde_json::from_str(METADATA_FIXTURE).unwrap();
        assert!(info.is_tradable("ALTUSDT"));
        // Listed but halted pairs are not tradable
        assert!(!info.is_tradable("HALTUSDT"));
        assert!(!info.is_tradable("MISSINGUSDT"));
    }
}
