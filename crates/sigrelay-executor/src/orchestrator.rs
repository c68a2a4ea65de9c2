//! Entry → fill → protective orders state machine.
//!
//! One call to [`OrderOrchestrator::execute`] handles one signal from start
//! to finish on the caller's task:
//!
//! 1. Submit the entry (MARKET, or LIMIT GTC at the signal's entry price)
//! 2. LIMIT only: wait for the fill via [`FillWaiter`]
//! 3. Place TP / SL close-position triggers via [`ProtectiveOrderPlacer`]
//!
//! Every path ends in exactly one [`OrchestrationOutcome`].

use sigrelay_core::{OrchestrationOutcome, OrderHandle, OrderType, SignalCommand, Stage};
use sigrelay_gateway::{DynGateway, OrderRequest};
use sigrelay_telemetry::Metrics;
use tracing::{error, info, warn};

use crate::config::{ExecutorConfig, ProtectiveFailurePolicy};
use crate::error::ExecutorResult;
use crate::fill_waiter::FillWaiter;
use crate::protective::ProtectiveOrderPlacer;

pub struct OrderOrchestrator {
    gateway: DynGateway,
    fill_waiter: FillWaiter,
    placer: ProtectiveOrderPlacer,
    config: ExecutorConfig,
}

impl OrderOrchestrator {
    pub fn new(gateway: DynGateway, config: ExecutorConfig) -> ExecutorResult<Self> {
        config.validate()?;
        Ok(Self {
            fill_waiter: FillWaiter::new(gateway.clone(), config.fill_timeout, config.poll_interval),
            placer: ProtectiveOrderPlacer::new(gateway.clone()),
            gateway,
            config,
        })
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run the full lifecycle for one validated signal.
    pub async fn execute(&self, command: &SignalCommand) -> OrchestrationOutcome {
        info!(
            symbol = command.symbol(),
            side = %command.side(),
            order_type = %command.order_type(),
            quantity = %command.quantity(),
            "Executing signal"
        );

        let outcome = self.run(command).await;
        Metrics::outcome(outcome.label());
        match &outcome {
            OrchestrationOutcome::Success { .. } => {
                info!(symbol = command.symbol(), "Signal executed")
            }
            OrchestrationOutcome::EntryNotFilled { last_snapshot } => {
                warn!(symbol = command.symbol(), status = %last_snapshot.status, "Entry not filled")
            }
            OrchestrationOutcome::Failure { stage, error } => {
                error!(symbol = command.symbol(), %stage, %error, "Signal execution failed")
            }
        }
        outcome
    }

    async fn run(&self, command: &SignalCommand) -> OrchestrationOutcome {
        let request = entry_request(command);
        let kind = request.kind;
        let entry = match self.gateway.submit_order(request).await {
            Ok(resp) => {
                Metrics::order_submitted(kind.as_str());
                info!(order = %resp.handle, status = %resp.status, "Entry submitted");
                resp
            }
            Err(e) => {
                Metrics::gateway_error("submit", e.is_transient());
                return OrchestrationOutcome::Failure {
                    stage: Stage::Entry,
                    error: e.to_string(),
                };
            }
        };

        let entry_state = match command.order_type() {
            OrderType::Market => entry.raw,
            OrderType::Limit => {
                let fill = self.fill_waiter.wait(&entry.handle).await;
                if !fill.filled {
                    if self.config.cancel_unfilled_entry {
                        self.cancel_best_effort(&entry.handle, "unfilled entry").await;
                    }
                    return OrchestrationOutcome::EntryNotFilled {
                        last_snapshot: fill.snapshot,
                    };
                }
                fill.snapshot.raw
            }
        };

        match self
            .placer
            .place(
                command.symbol(),
                command.side(),
                command.take_profit(),
                command.stop_loss(),
                command.quantity(),
            )
            .await
        {
            Ok(protective) => OrchestrationOutcome::Success {
                entry: entry_state,
                protective,
            },
            Err(e) => {
                if let Some(placed) = &e.placed {
                    match self.config.protective_failure_policy {
                        ProtectiveFailurePolicy::CancelPlaced => {
                            self.cancel_best_effort(&placed.handle, "orphaned protective order")
                                .await;
                        }
                        ProtectiveFailurePolicy::LeaveLive => {
                            warn!(order = %placed.handle, "Leaving placed protective order live");
                        }
                    }
                }
                OrchestrationOutcome::Failure {
                    stage: Stage::Protective,
                    error: e.to_string(),
                }
            }
        }
    }

    async fn cancel_best_effort(&self, handle: &OrderHandle, reason: &str) {
        match self.gateway.cancel_order(handle).await {
            Ok(resp) => info!(order = %handle, status = %resp.status, reason, "Order cancelled"),
            Err(e) => {
                Metrics::gateway_error("cancel", e.is_transient());
                warn!(order = %handle, error = %e, reason, "Cancel failed");
            }
        }
    }
}

fn entry_request(command: &SignalCommand) -> OrderRequest {
    let client_order_id = command.client_order_id().cloned();
    match command.order_type() {
        OrderType::Market => OrderRequest::market(
            command.symbol(),
            command.side(),
            command.quantity(),
            client_order_id,
        ),
        OrderType::Limit => OrderRequest::limit_gtc(
            command.symbol(),
            command.side(),
            command.quantity(),
            command.entry_price(),
            client_order_id,
        ),
    }
}
