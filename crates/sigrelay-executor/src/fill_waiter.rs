//! Polls an entry order until it fills, fails, or the deadline passes.

use std::time::Duration;

use sigrelay_core::{OrderHandle, OrderStatusSnapshot};
use sigrelay_gateway::DynGateway;
use sigrelay_telemetry::Metrics;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Deadline used when `started + timeout` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Result of a fill wait.
#[derive(Debug, Clone, PartialEq)]
pub struct FillOutcome {
    pub filled: bool,
    /// Last observed status, or the synthetic TIMEOUT snapshot.
    pub snapshot: OrderStatusSnapshot,
}

pub struct FillWaiter {
    gateway: DynGateway,
    timeout: Duration,
    poll_interval: Duration,
}

impl FillWaiter {
    pub fn new(gateway: DynGateway, timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            gateway,
            timeout,
            poll_interval,
        }
    }

    /// Wait for `handle` to reach FILLED.
    ///
    /// Query errors are logged and retried on the next tick. The wait never
    /// sleeps past the deadline, so it returns within `timeout` plus the
    /// latency of one in-flight status request.
    pub async fn wait(&self, handle: &OrderHandle) -> FillOutcome {
        let started = Instant::now();
        let deadline = started
            .checked_add(self.timeout)
            .unwrap_or_else(|| started + FAR_FUTURE);
        let mut polls = 0u32;

        loop {
            if Instant::now() >= deadline {
                info!(
                    order = %handle,
                    polls,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Fill wait timed out"
                );
                return self.finish(started, false, OrderStatusSnapshot::timeout());
            }

            polls += 1;
            match self.gateway.order_status(handle).await {
                Ok(snapshot) if snapshot.is_filled() => {
                    info!(order = %handle, polls, "Entry filled");
                    return self.finish(started, true, snapshot);
                }
                Ok(snapshot) if snapshot.status.is_terminal_failure() => {
                    warn!(order = %handle, status = %snapshot.status, "Entry ended without fill");
                    return self.finish(started, false, snapshot);
                }
                Ok(snapshot) => {
                    debug!(order = %handle, status = %snapshot.status, "Entry not filled yet");
                }
                Err(e) => {
                    Metrics::gateway_error("status", e.is_transient());
                    warn!(order = %handle, error = %e, "Status query failed, retrying");
                }
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            tokio::time::sleep(self.poll_interval.min(remaining)).await;
        }
    }

    fn finish(&self, started: Instant, filled: bool, snapshot: OrderStatusSnapshot) -> FillOutcome {
        Metrics::fill_wait(filled, started.elapsed().as_secs_f64());
        FillOutcome { filled, snapshot }
    }
}
