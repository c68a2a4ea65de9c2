//! Exchange gateway trait.
//!
//! The order lifecycle only ever talks to the exchange through this trait,
//! which allows for:
//! - Dependency injection of one process-wide client built at startup
//! - Unit testing the lifecycle against `MockGateway`

use std::pin::Pin;
use std::sync::Arc;

use sigrelay_core::{OrderHandle, OrderResponse, OrderStatusSnapshot};

use crate::error::GatewayResult;
use crate::request::OrderRequest;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Narrow interface to a derivatives exchange account.
pub trait ExchangeGateway: Send + Sync {
    /// Submit a new order.
    fn submit_order(&self, request: OrderRequest) -> BoxFuture<'_, GatewayResult<OrderResponse>>;

    /// Query the current status of an order.
    fn order_status<'a>(
        &'a self,
        handle: &'a OrderHandle,
    ) -> BoxFuture<'a, GatewayResult<OrderStatusSnapshot>>;

    /// Cancel an open order.
    fn cancel_order<'a>(
        &'a self,
        handle: &'a OrderHandle,
    ) -> BoxFuture<'a, GatewayResult<OrderResponse>>;
}

/// Arc wrapper for ExchangeGateway trait objects.
pub type DynGateway = Arc<dyn ExchangeGateway>;
