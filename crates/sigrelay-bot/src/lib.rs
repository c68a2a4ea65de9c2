//! sigrelay - Webhook-to-exchange order relay.
//!
//! Main application that wires the components together:
//! - Configuration (TOML file + environment overrides)
//! - Binance futures gateway
//! - Order orchestrator (entry, fill wait, protective orders)
//! - Webhook HTTP server

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
