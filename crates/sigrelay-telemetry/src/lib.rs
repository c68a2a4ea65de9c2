//! Prometheus metrics and structured logging for sigrelay.
//!
//! - Prometheus metrics for signals, order submissions, fill waits and outcomes
//! - Structured JSON logging with tracing

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
