//! sigrelay-server - Webhook endpoint for trade signals.
//!
//! ```text
//! POST /webhook  → validate → OrderOrchestrator::execute → JSON outcome
//! GET  /         → health text
//! GET  /metrics  → Prometheus exposition
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use sigrelay_server::{run_server, AppState, ServerConfig};
//!
//! let state = AppState::new(Arc::new(orchestrator), ServerConfig::default());
//! run_server(state, shutdown_signal()).await?;
//! ```

mod config;
mod error;
mod response;
mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{create_router, run_server, with_middleware, AppState, HEALTH_TEXT, SIGNAL_TOKEN_HEADER};
