//! HTTP server implementation using axum.

use std::any::Any;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::Value;
use sigrelay_core::SignalCommand;
use sigrelay_executor::OrderOrchestrator;
use sigrelay_telemetry::Metrics;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::response::{
    error_response, outcome_response, MSG_EXPECTED_JSON, MSG_INVALID_SECRET,
};

/// Header carrying the shared webhook secret.
pub const SIGNAL_TOKEN_HEADER: &str = "x-signal-token";

pub const HEALTH_TEXT: &str = "OK - signal relay";

/// Shared application state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<OrderOrchestrator>,
    config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(orchestrator: Arc<OrderOrchestrator>, config: ServerConfig) -> Self {
        Self {
            orchestrator,
            config: Arc::new(config),
        }
    }
}

/// Create the axum router.
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(health))
        .route("/webhook", post(webhook))
        .route("/metrics", get(metrics))
        .with_state(state);
    with_middleware(router)
}

/// Request tracing plus panic → 500 conversion.
pub fn with_middleware(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    HEALTH_TEXT
}

async fn metrics() -> Response {
    match Metrics::render() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// Handle an inbound trade signal.
///
/// Checks run in order: JSON body (400), secret (403), fields (400). The
/// request stays open until the order lifecycle completes.
async fn webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    if !is_json_content_type(&headers) {
        Metrics::signal_received("invalid_json");
        return error_response(StatusCode::BAD_REQUEST, MSG_EXPECTED_JSON);
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            Metrics::signal_received("invalid_json");
            warn!(error = %e, "Malformed webhook body");
            return error_response(StatusCode::BAD_REQUEST, format!("Invalid JSON: {e}"));
        }
    };

    if state.config.secret_enabled() && !secret_matches(&headers, &payload, &state.config) {
        Metrics::signal_received("unauthorized");
        warn!("Webhook secret mismatch");
        return error_response(StatusCode::FORBIDDEN, MSG_INVALID_SECRET);
    }

    let command = match SignalCommand::parse(&payload) {
        Ok(c) => c,
        Err(e) => {
            Metrics::signal_received("invalid");
            warn!(error = %e, "Rejected webhook signal");
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    Metrics::signal_received("accepted");
    info!(
        symbol = command.symbol(),
        side = %command.side(),
        order_type = %command.order_type(),
        "Webhook signal accepted"
    );

    outcome_response(state.orchestrator.execute(&command).await)
}

/// `application/json` or any `application/*+json` type.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// The header token wins when present and non-empty; otherwise the body's `secret`.
fn secret_matches(headers: &HeaderMap, payload: &Value, config: &ServerConfig) -> bool {
    let header_token = headers
        .get(SIGNAL_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty());
    let token = header_token.or_else(|| payload.get("secret").and_then(Value::as_str));
    token == Some(config.webhook_secret.as_str())
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(panic = %detail, "Request handler panicked");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Internal error: {detail}"),
    )
}

/// Run the webhook HTTP server until `shutdown` resolves.
pub async fn run_server<F>(state: AppState, shutdown: F) -> ServerResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind = state.config.bind_address();
    let addr: SocketAddr = bind
        .parse()
        .map_err(|_| ServerError::InvalidAddress(bind.clone()))?;

    let app = create_router(state);

    info!(%addr, "Starting webhook server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Webhook server stopped");
    Ok(())
}
