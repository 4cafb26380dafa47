//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Core error: {0}")]
    Core(#[from] snipe_core::CoreError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] snipe_gateway::GatewayError),

    #[error("Engine error: {0}")]
    Engine(#[from] snipe_engine::EngineError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] snipe_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
