//! JSON response bodies.
//!
//! Every webhook reply carries `status` ("ok" or "error"); errors add `message`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use sigrelay_core::OrchestrationOutcome;

pub const MSG_EXPECTED_JSON: &str = "Expected JSON";
pub const MSG_INVALID_SECRET: &str = "Invalid webhook secret";
pub const MSG_NOT_FILLED: &str = "Entry not filled";

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = json!({
        "status": "error",
        "message": message.into(),
    });
    (status, Json(body)).into_response()
}

/// HTTP status and body for an orchestration outcome.
pub fn outcome_response(outcome: OrchestrationOutcome) -> Response {
    match outcome {
        OrchestrationOutcome::Success { entry, protective } => {
            let body = json!({
                "status": "ok",
                "entry": entry,
                "tp_sl": {
                    "tp": protective.take_profit.raw,
                    "sl": protective.stop_loss.raw,
                },
            });
            (StatusCode::OK, Json(body)).into_response()
        }
        OrchestrationOutcome::EntryNotFilled { last_snapshot } => {
            let body = json!({
                "status": "error",
                "message": MSG_NOT_FILLED,
                "entry_response": last_snapshot.raw,
            });
            (StatusCode::CONFLICT, Json(body)).into_response()
        }
        OrchestrationOutcome::Failure { stage, error } => {
            let body = json!({
                "status": "error",
                "message": error,
                "stage": stage.as_str(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}
