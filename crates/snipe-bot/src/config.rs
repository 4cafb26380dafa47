//! Application configuration.
//!
//! Loaded once from a TOML file; everything trading-related is folded
//! into an immutable [`TradeIntent`] before the run starts.

use crate::error::{AppError, AppResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use snipe_core::{parse_launch_instant, Qty, TradeIntent};
use snipe_gateway::Credentials;
use std::time::Duration;

/// Env var naming the config file when `--config` is not given.
pub const CONFIG_ENV: &str = "SNIPE_CONFIG";
/// Env var overriding the configured API key.
pub const API_KEY_ENV: &str = "SNIPE_API_KEY";
/// Env var overriding the configured API secret.
pub const API_SECRET_ENV: &str = "SNIPE_API_SECRET";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Trade parameters.
    pub trade: TradeConfig,
    /// Exchange endpoint and credentials.
    #[serde(default)]
    pub exchange: ExchangeConfig,
}

/// Trade parameters, mirroring [`TradeIntent`] in config form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeConfig {
    /// Trading pair (e.g. "ALTUSDT").
    pub symbol: String,
    /// Number of base-asset tokens to sell.
    pub quantity: Decimal,
    /// Percent below market price (e.g. 1.0 means 1% below).
    pub price_offset_pct: Decimal,
    /// Cancel the order after this many seconds if not filled. Default: 30.
    #[serde(default = "default_order_timeout_secs")]
    pub order_timeout_secs: u64,
    /// Interval between pair availability checks (ms). Default: 500.
    #[serde(default = "default_poll_interval_ms")]
    pub listing_poll_interval_ms: u64,
    /// Interval between order status checks (ms). Default: 500.
    #[serde(default = "default_poll_interval_ms")]
    pub status_poll_interval_ms: u64,
    /// Attempts for the initial price fetch. Default: 3.
    #[serde(default = "default_price_fetch_retries")]
    pub price_fetch_retries: u32,
    /// Delay between price fetch attempts (ms). Default: 500.
    #[serde(default = "default_poll_interval_ms")]
    pub price_fetch_delay_ms: u64,
    /// Exact time trading is expected to start (UTC),
    /// "YYYY-MM-DD HH:MM:SS".
    pub launch_at: String,
    /// Wake up this many seconds before the launch instant. Default: 0.
    #[serde(default)]
    pub launch_lead_secs: u64,
}

fn default_order_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_price_fetch_retries() -> u32 {
    3
}

/// Exchange endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// REST API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Signed-request receive window (ms). Default: 5000.
    #[serde(default = "default_recv_window_ms")]
    pub recv_window_ms: u64,
    /// API key; the env var takes precedence when both are set.
    #[serde(default)]
    pub api_key: Option<String>,
    /// API secret; the env var takes precedence when both are set.
    #[serde(default)]
    pub api_secret: Option<String>,
}

fn default_base_url() -> String {
    "https://api.binance.com".to_string()
}

fn default_recv_window_ms() -> u64 {
    5000
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            recv_window_ms: default_recv_window_ms(),
            api_key: None,
            api_secret: None,
        }
    }
}

impl AppConfig {
    /// Load configuration, preferring the explicit path, then the
    /// `SNIPE_CONFIG` env var, then `config/default.toml`.
    pub fn load(path_override: Option<&str>) -> AppResult<Self> {
        let config_path = path_override
            .map(str::to_string)
            .or_else(|| std::env::var(CONFIG_ENV).ok())
            .unwrap_or_else(|| "config/default.toml".to_string());
        tracing::info!(config_path = %config_path, "Loading configuration");
        Self::from_file(&config_path)
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config {path}: {e}")))?;
        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config {path}: {e}")))
    }

    /// Build the validated, immutable trade intent for this run.
    pub fn trade_intent(&self) -> AppResult<TradeIntent> {
        let trade = &self.trade;
        let intent = TradeIntent {
            symbol: trade.symbol.clone(),
            quantity: Qty::new(trade.quantity),
            price_offset_pct: trade.price_offset_pct,
            order_timeout: Duration::from_secs(trade.order_timeout_secs),
            listing_poll_interval: Duration::from_millis(trade.listing_poll_interval_ms),
            status_poll_interval: Duration::from_millis(trade.status_poll_interval_ms),
            price_fetch_retries: trade.price_fetch_retries,
            price_fetch_delay: Duration::from_millis(trade.price_fetch_delay_ms),
            launch_at: parse_launch_instant(&trade.launch_at)?,
            launch_lead: Duration::from_secs(trade.launch_lead_secs),
        };
        intent.validate()?;
        Ok(intent)
    }

    /// Resolve API credentials: env vars first, then the config file.
    pub fn credentials(&self) -> AppResult<Credentials> {
        resolve_credentials(
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(API_SECRET_ENV).ok(),
            &self.exchange,
        )
    }
}

fn resolve_credentials(
    key_env: Option<String>,
    secret_env: Option<String>,
    exchange: &ExchangeConfig,
) -> AppResult<Credentials> {
    let api_key = key_env.or_else(|| exchange.api_key.clone()).ok_or_else(|| {
        AppError::Config(format!(
            "API key missing: set {API_KEY_ENV} or [exchange] api_key"
        ))
    })?;
    let api_secret = secret_env
        .or_else(|| exchange.api_secret.clone())
        .ok_or_else(|| {
            AppError::Config(format!(
                "API secret missing: set {API_SECRET_ENV} or [exchange] api_secret"
            ))
        })?;
    Ok(Credentials::new(api_key, api_secret))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"
        [trade]
        symbol = "ALTUSDT"
        quantity = "100"
        price_offset_pct = "1.0"
        launch_at = "2025-05-29 12:00:00"
        launch_lead_secs = 5

        [exchange]
        base_url = "https://api.example.com"
        api_key = "cfg-key"
        api_secret = "cfg-secret"
    "#;

    #[test]
    fn test_parse_sample_with_defaults() {
        let config: AppConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.trade.symbol, "ALTUSDT");
        assert_eq!(config.trade.quantity, dec!(100));
        assert_eq!(config.trade.order_timeout_secs, 30);
        assert_eq!(config.trade.listing_poll_interval_ms, 500);
        assert_eq!(config.trade.price_fetch_retries, 3);
        assert_eq!(config.exchange.recv_window_ms, 5000);
    }

    #[test]
    fn test_trade_intent_from_config() {
        let config: AppConfig = toml::from_str(SAMPLE).unwrap();
        let intent = config.trade_intent().unwrap();
        assert_eq!(intent.symbol, "ALTUSDT");
        assert_eq!(intent.order_timeout, Duration::from_secs(30));
        assert_eq!(intent.launch_lead, Duration::from_secs(5));
        assert_eq!(intent.launch_at.timestamp(), 1748520000);
    }

    #[test]
    fn test_invalid_intent_rejected() {
        let mut config: AppConfig = toml::from_str(SAMPLE).unwrap();
        config.trade.quantity = dec!(0);
        assert!(config.trade_intent().is_err());

        let mut config: AppConfig = toml::from_str(SAMPLE).unwrap();
        config.trade.price_offset_pct = dec!(100);
        assert!(config.trade_intent().is_err());

        let mut config: AppConfig = toml::from_str(SAMPLE).unwrap();
        config.trade.launch_at = "soon".to_string();
        assert!(config.trade_intent().is_err());
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config: AppConfig = toml::from_str(SAMPLE).unwrap();
        let rendered = toml::to_string(&config).unwrap();
        let reparsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(reparsed.trade.symbol, config.trade.symbol);
        assert_eq!(reparsed.trade.quantity, config.trade.quantity);
    }

    #[test]
    fn test_credentials_env_overrides_config() {
        let config: AppConfig = toml::from_str(SAMPLE).unwrap();

        let creds = resolve_credentials(
            Some("env-key".to_string()),
            Some("env-secret".to_string()),
            &config.exchange,
        )
        .unwrap();
        assert_eq!(creds.api_key(), "env-key");

        let creds = resolve_credentials(None, None, &config.exchange).unwrap();
        assert_eq!(creds.api_key(), "cfg-key");
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let exchange = ExchangeConfig::default();
        let err = resolve_credentials(None, None, &exchange).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
