//! Order status as observed by a single status query.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Order status.
///
/// `Timeout` is never reported by the exchange; it is produced locally when a
/// fill wait reaches its deadline. `Error` covers statuses this relay does not
/// recognise and is treated as non-terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Canceled,
    Rejected,
    Expired,
    Timeout,
    Error,
}

impl OrderStatus {
    /// Parse an exchange status string. Unknown values map to `Error`.
    pub fn from_exchange(s: &str) -> Self {
        match s {
            "NEW" => Self::New,
            "PARTIALLY_FILLED" => Self::PartiallyFilled,
            "FILLED" => Self::Filled,
            "CANCELED" | "CANCELLED" => Self::Canceled,
            "REJECTED" => Self::Rejected,
            "EXPIRED" | "EXPIRED_IN_MATCH" => Self::Expired,
            _ => Self::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::PartiallyFilled => "PARTIALLY_FILLED",
            Self::Filled => "FILLED",
            Self::Canceled => "CANCELED",
            Self::Rejected => "REJECTED",
            Self::Expired => "EXPIRED",
            Self::Timeout => "TIMEOUT",
            Self::Error => "ERROR",
        }
    }

    /// Terminal statuses end a fill wait.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Filled | Self::Canceled | Self::Rejected | Self::Expired | Self::Timeout
        )
    }

    /// Terminal statuses other than `Filled`.
    pub fn is_terminal_failure(&self) -> bool {
        self.is_terminal() && *self != Self::Filled
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one status poll: the parsed status plus the exchange payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusSnapshot {
    pub status: OrderStatus,
    pub raw: Value,
}

impl OrderStatusSnapshot {
    pub fn new(status: OrderStatus, raw: Value) -> Self {
        Self { status, raw }
    }

    /// Build a snapshot from an exchange order payload (reads its `status` field).
    pub fn from_raw(raw: Value) -> Self {
        let status = raw
            .get("status")
            .and_then(Value::as_str)
            .map(OrderStatus::from_exchange)
            .unwrap_or(OrderStatus::Error);
        Self { status, raw }
    }

    /// Snapshot produced when a fill wait reaches its deadline.
    pub fn timeout() -> Self {
        Self {
            status: OrderStatus::Timeout,
            raw: serde_json::json!({ "status": "TIMEOUT" }),
        }
    }

    pub fn is_filled(&self) -> bool {
        self.status == OrderStatus::Filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_terminal_statuses() {
        for status in [
            OrderStatus::Filled,
            OrderStatus::Canceled,
            OrderStatus::Rejected,
            OrderStatus::Expired,
            OrderStatus::Timeout,
        ] {
            assert!(status.is_terminal(), "{status} should be terminal");
        }
        for status in [OrderStatus::New, OrderStatus::PartiallyFilled, OrderStatus::Error] {
            assert!(!status.is_terminal(), "{status} should not be terminal");
        }
        assert!(!OrderStatus::Filled.is_terminal_failure());
        assert!(OrderStatus::Expired.is_terminal_failure());
    }

    #[test]
    fn test_from_exchange() {
        assert_eq!(OrderStatus::from_exchange("PARTIALLY_FILLED"), OrderStatus::PartiallyFilled);
        assert_eq!(OrderStatus::from_exchange("EXPIRED_IN_MATCH"), OrderStatus::Expired);
        assert_eq!(OrderStatus::from_exchange("NEW_ADL"), OrderStatus::Error);
    }

    #[test]
    fn test_exchange_timeout_string_is_not_terminal() {
        let status = OrderStatus::from_exchange("TIMEOUT");
        assert_eq!(status, OrderStatus::Error);
        assert!(!status.is_terminal());
    }

    #[test]
    fn test_snapshot_from_raw() {
        let snap = OrderStatusSnapshot::from_raw(json!({"orderId": 7, "status": "FILLED"}));
        assert!(snap.is_filled());
        assert_eq!(snap.raw["orderId"], 7);

        let missing = OrderStatusSnapshot::from_raw(json!({"orderId": 7}));
        assert_eq!(missing.status, OrderStatus::Error);
    }

    #[test]
    fn test_timeout_snapshot() {
        let snap = OrderStatusSnapshot::timeout();
        assert_eq!(snap.status, OrderStatus::Timeout);
        assert_eq!(snap.raw, json!({"status": "TIMEOUT"}));
    }
}
