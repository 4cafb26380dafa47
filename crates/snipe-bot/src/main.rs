//! Listing-snipe sell bot - entry point.
//!
//! Waits for a scheduled listing, then places and supervises a single
//! fixed-offset limit sell.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Time-critical limit-sell sequencer for new exchange listings.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via SNIPE_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    snipe_telemetry::init_logging()?;

    info!("Starting snipe-bot v{}", env!("CARGO_PKG_VERSION"));

    let config = snipe_bot::AppConfig::load(args.config.as_deref())?;
    let app = snipe_bot::Application::new(config)?;
    app.run().await?;

    Ok(())
}
