//! Scriptable in-memory gateway for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde_json::json;
use sigrelay_core::{OrderHandle, OrderResponse, OrderStatus, OrderStatusSnapshot};

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::{BoxFuture, ExchangeGateway};
use crate::request::{OrderKind, OrderRequest};
use crate::response::parse_order_response;

/// First exchange order id handed out by the mock.
const FIRST_ORDER_ID: u64 = 1000;

/// Mock gateway for testing.
///
/// Every submission is accepted with status `NEW` and a fresh numeric order
/// id unless a failure was registered for its kind. Status queries pop from
/// a script; once it is empty they keep reporting `NEW`.
pub struct MockGateway {
    /// Recorded submissions for verification.
    submissions: parking_lot::Mutex<Vec<OrderRequest>>,
    /// Recorded cancellations.
    cancels: parking_lot::Mutex<Vec<OrderHandle>>,
    status_script: parking_lot::Mutex<VecDeque<GatewayResult<OrderStatusSnapshot>>>,
    submit_failures: parking_lot::Mutex<HashMap<OrderKind, GatewayError>>,
    cancel_failure: parking_lot::Mutex<Option<GatewayError>>,
    status_queries: AtomicUsize,
    next_order_id: AtomicU64,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            submissions: parking_lot::Mutex::new(Vec::new()),
            cancels: parking_lot::Mutex::new(Vec::new()),
            status_script: parking_lot::Mutex::new(VecDeque::new()),
            submit_failures: parking_lot::Mutex::new(HashMap::new()),
            cancel_failure: parking_lot::Mutex::new(None),
            status_queries: AtomicUsize::new(0),
            next_order_id: AtomicU64::new(FIRST_ORDER_ID),
        }
    }

    /// Queue the next status query result.
    pub fn push_status(&self, status: OrderStatus) {
        let raw = json!({ "status": status.as_str() });
        self.status_script
            .lock()
            .push_back(Ok(OrderStatusSnapshot::new(status, raw)));
    }

    /// Queue a failing status query.
    pub fn push_status_error(&self, error: GatewayError) {
        self.status_script.lock().push_back(Err(error));
    }

    /// Reject every submission of `kind` with `error`.
    pub fn fail_submissions_of(&self, kind: OrderKind, error: GatewayError) {
        self.submit_failures.lock().insert(kind, error);
    }

    pub fn fail_cancels(&self, error: GatewayError) {
        *self.cancel_failure.lock() = Some(error);
    }

    /// Get recorded submissions, including rejected ones.
    pub fn submissions(&self) -> Vec<OrderRequest> {
        self.submissions.lock().clone()
    }

    pub fn cancels(&self) -> Vec<OrderHandle> {
        self.cancels.lock().clone()
    }

    pub fn status_queries(&self) -> usize {
        self.status_queries.load(Ordering::SeqCst)
    }

    /// Total number of exchange calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.submissions.lock().len() + self.cancels.lock().len() + self.status_queries()
    }
}

impl ExchangeGateway for MockGateway {
    fn submit_order(&self, request: OrderRequest) -> BoxFuture<'_, GatewayResult<OrderResponse>> {
        Box::pin(async move {
            self.submissions.lock().push(request.clone());
            if let Some(err) = self.submit_failures.lock().get(&request.kind) {
                return Err(err.clone());
            }

            let order_id = self.next_order_id.fetch_add(1, Ordering::SeqCst);
            let raw = json!({
                "orderId": order_id,
                "symbol": request.symbol,
                "status": "NEW",
                "side": request.side.as_str(),
                "type": request.kind.as_str(),
                "clientOrderId": request.client_order_id.as_ref().map(|c| c.to_string()),
                "closePosition": request.close_position,
            });
            parse_order_response(raw, &request.symbol)
        })
    }

    fn order_status<'a>(
        &'a self,
        _handle: &'a OrderHandle,
    ) -> BoxFuture<'a, GatewayResult<OrderStatusSnapshot>> {
        Box::pin(async move {
            self.status_queries.fetch_add(1, Ordering::SeqCst);
            self.status_script.lock().pop_front().unwrap_or_else(|| {
                Ok(OrderStatusSnapshot::new(
                    OrderStatus::New,
                    json!({ "status": "NEW" }),
                ))
            })
        })
    }

    fn cancel_order<'a>(
        &'a self,
        handle: &'a OrderHandle,
    ) -> BoxFuture<'a, GatewayResult<OrderResponse>> {
        Box::pin(async move {
            self.cancels.lock().push(handle.clone());
            if let Some(err) = self.cancel_failure.lock().clone() {
                return Err(err);
            }
            let raw = json!({
                "orderId": handle.exchange_order_id,
                "symbol": handle.symbol,
                "status": "CANCELED",
            });
            parse_order_response(raw, &handle.symbol)
        })
    }
}
