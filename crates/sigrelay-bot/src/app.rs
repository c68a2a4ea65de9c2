//! Application wiring.

use std::sync::Arc;

use axum::Router;
use sigrelay_executor::OrderOrchestrator;
use sigrelay_gateway::{BinanceFuturesClient, Credentials, DynGateway};
use sigrelay_server::{create_router, run_server, AppState};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::AppResult;

/// Process-wide components, built once at startup and read-only afterwards.
pub struct Application {
    config: AppConfig,
    gateway: DynGateway,
}

impl Application {
    /// Build the application with the Binance futures client.
    pub fn new(config: AppConfig, credentials: Credentials) -> AppResult<Self> {
        if !credentials.is_complete() {
            warn!("BINANCE_API_KEY / BINANCE_API_SECRET not set; order placement will fail");
        }
        if !config.server.secret_enabled() {
            warn!("WEBHOOK_SECRET not set; webhook accepts unauthenticated signals");
        }

        let binance = config.exchange.to_binance_config();
        info!(network = ?config.exchange.network, base_url = %binance.base_url, "Exchange configured");
        let gateway: DynGateway = Arc::new(BinanceFuturesClient::new(binance, credentials)?);
        Ok(Self::with_gateway(config, gateway))
    }

    /// Build the application around an existing gateway.
    pub fn with_gateway(config: AppConfig, gateway: DynGateway) -> Self {
        Self { config, gateway }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn app_state(&self) -> AppResult<AppState> {
        let executor = self.config.executor.to_executor_config()?;
        info!(
            fill_timeout_secs = executor.fill_timeout.as_secs_f64(),
            poll_interval_secs = executor.poll_interval.as_secs_f64(),
            cancel_unfilled_entry = executor.cancel_unfilled_entry,
            protective_failure_policy = ?executor.protective_failure_policy,
            "Executor configured"
        );
        let orchestrator = OrderOrchestrator::new(self.gateway.clone(), executor)?;
        Ok(AppState::new(Arc::new(orchestrator), self.config.server.clone()))
    }

    /// The webhook router, without binding a socket.
    pub fn router(&self) -> AppResult<Router> {
        Ok(create_router(self.app_state()?))
    }

    /// Serve until Ctrl-C.
    pub async fn run(self) -> AppResult<()> {
        let state = self.app_state()?;
        run_server(state, shutdown_signal()).await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
