//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Gateway error: {0}")]
    Gateway(#[from] sigrelay_gateway::GatewayError),

    #[error("Executor error: {0}")]
    Executor(#[from] sigrelay_executor::ExecutorError),

    #[error("Server error: {0}")]
    Server(#[from] sigrelay_server::ServerError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] sigrelay_telemetry::TelemetryError),
}

pub type AppResult<T> = Result<T, AppError>;
