//! Launch sequencing, listing detection, and order supervision.
//!
//! The pipeline for one run, each stage completing (or failing
//! terminally) before the next begins:
//!
//! 1. `launch`: block until the exchange clock reaches the launch
//!    window.
//! 2. `listing`: poll metadata until the pair is tradable.
//! 3. `plan`: fetch price and balance concurrently, compute the
//!    precision-compliant limit sell.
//! 4. `submit`: place the order with bounded retries and ambiguity
//!    reconciliation.
//! 5. `supervise`: poll order status until terminal or timeout, with
//!    guaranteed cancellation on timeout or abort.
//!
//! All stages speak to the exchange through the [`Gateway`] trait and
//! share one cancellation token and one polling primitive (`poll`).

pub mod error;
pub mod gateway;
pub mod launch;
pub mod listing;
pub mod live;
pub mod plan;
pub mod poll;
pub mod submit;
pub mod supervise;

pub use error::{EngineError, EngineResult};
pub use gateway::{BoxFuture, DynGateway, Gateway, GatewayCall, MockGateway};
pub use launch::wait_for_launch;
pub use listing::wait_for_listing;
pub use live::LiveGateway;
pub use plan::{fetch_market_inputs, plan_order, MarketInputs};
pub use poll::{poll_until, Outcome, PollConfig, PollError};
pub use submit::submit_order;
pub use supervise::{supervise_fill, FillOutcome};
