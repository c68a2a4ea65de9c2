//! Core domain types for the sigrelay order relay.
//!
//! This crate provides the types shared by every other crate:
//! - `Price`, `Size`: Precision-safe numeric types
//! - `OrderSide`, `OrderType`, `TimeInForce`, `ClientOrderId`: Trading enums and ids
//! - `SignalCommand`: Validated inbound trade signal
//! - `OrderStatus`, `OrderStatusSnapshot`: Exchange order state as seen by a poll
//! - `OrderHandle`, `OrderResponse`, `OrchestrationOutcome`: Order lifecycle results

pub mod decimal;
pub mod error;
pub mod execution;
pub mod order;
pub mod signal;
pub mod status;

pub use decimal::{Price, Size};
pub use error::{CoreError, Result};
pub use execution::{OrchestrationOutcome, OrderHandle, OrderResponse, ProtectiveOrderResult, Stage};
pub use order::{ClientOrderId, OrderSide, OrderType, TimeInForce};
pub use signal::{SignalCommand, ValidationError, ValidationErrorKind};
pub use status::{OrderStatus, OrderStatusSnapshot};
