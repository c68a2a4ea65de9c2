//! Interpretation of exchange order payloads.

use serde_json::Value;
use sigrelay_core::{ClientOrderId, OrderHandle, OrderResponse, OrderStatus};

use crate::error::{GatewayError, GatewayResult};

/// Read an id field that the exchange may encode as a number or a string.
fn id_field(raw: &Value, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Build an `OrderResponse` from an order payload.
///
/// The handle uses `orderId` and falls back to `clientOrderId` when the
/// exchange did not return one. `symbol` is used when the payload omits it.
pub fn parse_order_response(raw: Value, symbol: &str) -> GatewayResult<OrderResponse> {
    let client_order_id = id_field(&raw, "clientOrderId").map(ClientOrderId::from_string);
    let exchange_order_id = id_field(&raw, "orderId")
        .or_else(|| client_order_id.as_ref().map(|c| c.to_string()))
        .ok_or_else(|| GatewayError::Decode(format!("order payload without id: {raw}")))?;
    let symbol = raw
        .get("symbol")
        .and_then(Value::as_str)
        .unwrap_or(symbol)
        .to_string();
    let status = raw
        .get("status")
        .and_then(Value::as_str)
        .map(OrderStatus::from_exchange)
        .unwrap_or(OrderStatus::New);

    Ok(OrderResponse {
        handle: OrderHandle {
            exchange_order_id,
            client_order_id,
            symbol,
        },
        status,
        raw,
    })
}
