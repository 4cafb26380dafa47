//! Authenticated REST gateway for the exchange API.
//!
//! Wraps the exchange's HTTP surface behind typed calls:
//! server time, exchange metadata, ticker price, account balances, and
//! the order lifecycle (place / query / cancel). Signed endpoints use
//! HMAC-SHA256 over the query string with the API key in a header.
//!
//! The gateway is treated as an unreliable, latent, rate-limited
//! service: every error is classified (`GatewayError`) so callers can
//! decide between retry, reconciliation, and hard failure.

pub mod client;
pub mod credentials;
pub mod error;
pub mod sign;
pub mod wire;

pub use client::RestClient;
pub use credentials::Credentials;
pub use error::{GatewayError, GatewayResult};
