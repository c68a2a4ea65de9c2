//! Prometheus metrics for the signal relay.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. If registration fails,
//! it indicates a fatal configuration error (e.g., duplicate metric names)
//! that should cause an immediate crash at startup rather than silent failure.
//! These panics only occur during static initialization, never at runtime.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

use crate::error::{TelemetryError, TelemetryResult};

/// Inbound webhook signals.
/// Labels: result (accepted/invalid_json/unauthorized/invalid)
pub static SIGNALS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "sigrelay_signals_total",
        "Total webhook signals received",
        &["result"]
    )
    .unwrap()
});

/// Orders accepted by the exchange.
/// Labels: kind (MARKET/LIMIT/TAKE_PROFIT_MARKET/STOP_MARKET)
pub static ORDERS_SUBMITTED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "sigrelay_orders_submitted_total",
        "Total orders accepted by the exchange",
        &["kind"]
    )
    .unwrap()
});

/// Failed exchange calls.
/// Labels: op (submit/status/cancel), transient (true/false)
pub static GATEWAY_ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "sigrelay_gateway_errors_total",
        "Total failed exchange calls",
        &["op", "transient"]
    )
    .unwrap()
});

/// Time spent waiting for an entry fill.
/// Labels: result (filled/not_filled)
pub static FILL_WAIT_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "sigrelay_fill_wait_seconds",
        "Time spent waiting for entry fill",
        &["result"],
        vec![0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0]
    )
    .unwrap()
});

/// Final outcome per processed signal.
pub static OUTCOMES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "sigrelay_outcomes_total",
        "Total signal processing outcomes",
        &["outcome"]
    )
    .unwrap()
});

/// Metrics helper.
pub struct Metrics;

impl Metrics {
    pub fn signal_received(result: &str) {
        SIGNALS_TOTAL.with_label_values(&[result]).inc();
    }

    pub fn order_submitted(kind: &str) {
        ORDERS_SUBMITTED_TOTAL.with_label_values(&[kind]).inc();
    }

    pub fn gateway_error(op: &str, transient: bool) {
        let transient = if transient { "true" } else { "false" };
        GATEWAY_ERRORS_TOTAL
            .with_label_values(&[op, transient])
            .inc();
    }

    pub fn fill_wait(filled: bool, seconds: f64) {
        let result = if filled { "filled" } else { "not_filled" };
        FILL_WAIT_SECONDS.with_label_values(&[result]).observe(seconds);
    }

    pub fn outcome(label: &str) {
        OUTCOMES_TOTAL.with_label_values(&[label]).inc();
    }

    /// Render the default registry in the Prometheus text exposition format.
    pub fn render() -> TelemetryResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&prometheus::gather(), &mut buffer)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_recorded_metrics() {
        Metrics::signal_received("accepted");
        Metrics::order_submitted("MARKET");
        Metrics::gateway_error("submit", true);
        Metrics::fill_wait(true, 1.5);
        Metrics::outcome("success");

        let text = Metrics::render().unwrap();
        assert!(text.contains("sigrelay_signals_total{result=\"accepted\"}"));
        assert!(text.contains("sigrelay_orders_submitted_total{kind=\"MARKET\"}"));
        assert!(text.contains("sigrelay_gateway_errors_total{op=\"submit\",transient=\"true\"}"));
        assert!(text.contains("sigrelay_fill_wait_seconds_bucket"));
        assert!(text.contains("sigrelay_outcomes_total{outcome=\"success\"}"));
    }

    #[test]
    fn test_counters_increment() {
        let before = OUTCOMES_TOTAL.with_label_values(&["entry_not_filled"]).get();
        Metrics::outcome("entry_not_filled");
        let after = OUTCOMES_TOTAL.with_label_values(&["entry_not_filled"]).get();
        assert_eq!(after - before, 1.0);
    }
}
