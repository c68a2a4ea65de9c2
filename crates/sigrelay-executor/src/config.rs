//! Executor configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ExecutorError, ExecutorResult};

pub const DEFAULT_FILL_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// What to do with an already-placed protective order when its sibling fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectiveFailurePolicy {
    /// Leave it working on the exchange.
    #[default]
    LeaveLive,
    /// Cancel it (best-effort) so no half-bracket remains.
    CancelPlaced,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorConfig {
    /// Maximum time to wait for a limit entry to fill.
    pub fill_timeout: Duration,
    /// Delay between status polls.
    pub poll_interval: Duration,
    /// Cancel a limit entry that did not fill before the deadline.
    pub cancel_unfilled_entry: bool,
    pub protective_failure_policy: ProtectiveFailurePolicy,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            fill_timeout: DEFAULT_FILL_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            cancel_unfilled_entry: false,
            protective_failure_policy: ProtectiveFailurePolicy::default(),
        }
    }
}

impl ExecutorConfig {
    pub fn validate(&self) -> ExecutorResult<()> {
        if self.poll_interval.is_zero() {
            return Err(ExecutorError::InvalidConfig(
                "poll_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
