//! Executor error types.

use sigrelay_core::OrderResponse;
use sigrelay_gateway::GatewayError;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Invalid executor configuration: {0}")]
    InvalidConfig(String),
}

pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// One of the two protective orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectiveLeg {
    TakeProfit,
    StopLoss,
}

impl ProtectiveLeg {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TakeProfit => "take_profit",
            Self::StopLoss => "stop_loss",
        }
    }
}

impl fmt::Display for ProtectiveLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protective placement failed part-way.
///
/// `placed` holds the take-profit order when only the stop-loss leg failed.
/// That order is still live on the exchange.
#[derive(Debug, Error)]
#[error("{leg} order failed: {source}")]
pub struct PlacementError {
    pub leg: ProtectiveLeg,
    pub placed: Option<OrderResponse>,
    #[source]
    pub source: GatewayError,
}
