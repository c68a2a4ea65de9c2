//! Order lifecycle results.
//!
//! Everything here lives for the processing of a single signal and is
//! discarded once the outcome has been reported.

use crate::order::ClientOrderId;
use crate::status::{OrderStatus, OrderStatusSnapshot};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifies a live order for status polling and cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHandle {
    /// Exchange-assigned order id.
    pub exchange_order_id: String,
    /// Client order id echoed by the exchange, if any.
    pub client_order_id: Option<ClientOrderId>,
    pub symbol: String,
}

impl fmt::Display for OrderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.symbol, self.exchange_order_id)
    }
}

/// Parsed acknowledgement of an order submission or cancellation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub handle: OrderHandle,
    pub status: OrderStatus,
    /// Exchange payload, returned verbatim to the signal sender.
    pub raw: Value,
}

/// The two protective orders placed after a fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectiveOrderResult {
    pub take_profit: OrderResponse,
    pub stop_loss: OrderResponse,
}

/// Stage of the lifecycle at which processing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Entry,
    FillWait,
    Protective,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::FillWait => "fill_wait",
            Self::Protective => "protective",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single outcome of processing one signal.
#[derive(Debug, Clone, PartialEq)]
pub enum OrchestrationOutcome {
    /// Entry filled and both protective orders were accepted.
    Success {
        /// Filled entry payload: the submission ack for market entries, the
        /// final status poll for limit entries.
        entry: Value,
        protective: ProtectiveOrderResult,
    },
    /// Entry did not reach FILLED before the deadline or hit a terminal failure.
    EntryNotFilled { last_snapshot: OrderStatusSnapshot },
    /// A stage failed with an exchange or transport error.
    Failure { stage: Stage, error: String },
}

impl OrchestrationOutcome {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::EntryNotFilled { .. } => "entry_not_filled",
            Self::Failure { stage, .. } => match stage {
                Stage::Entry => "failure_entry",
                Stage::FillWait => "failure_fill_wait",
                Stage::Protective => "failure_protective",
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_labels() {
        let not_filled = OrchestrationOutcome::EntryNotFilled {
            last_snapshot: OrderStatusSnapshot::timeout(),
        };
        assert_eq!(not_filled.label(), "entry_not_filled");
        assert!(!not_filled.is_success());

        let failure = OrchestrationOutcome::Failure {
            stage: Stage::Protective,
            error: "boom".to_string(),
        };
        assert_eq!(failure.label(), "failure_protective");
    }

    #[test]
    fn test_handle_display() {
        let handle = OrderHandle {
            exchange_order_id: "8389765".to_string(),
            client_order_id: None,
            symbol: "ETHUSDT".to_string(),
        };
        assert_eq!(handle.to_string(), "ETHUSDT#8389765");
    }

    #[test]
    fn test_stage_serde() {
        assert_eq!(serde_json::to_value(Stage::FillWait).unwrap(), json!("FILL_WAIT"));
    }
}
