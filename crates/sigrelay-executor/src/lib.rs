//! Order lifecycle for sigrelay.
//!
//! # Key Components
//!
//! - [`OrderOrchestrator`]: Entry submission, fill wait and protective placement for one signal
//! - [`FillWaiter`]: Bounded status polling for limit entries
//! - [`ProtectiveOrderPlacer`]: Take-profit and stop-loss close-position triggers
//!
//! # Outcomes (from `OrderOrchestrator::execute`)
//!
//! 1. Entry submit error -> Failure { stage: Entry }
//! 2. Limit not filled by deadline / terminal failure -> EntryNotFilled
//! 3. Protective leg error -> Failure { stage: Protective }
//! 4. (all passed) -> Success

pub mod config;
pub mod error;
pub mod fill_waiter;
pub mod orchestrator;
pub mod protective;

pub use config::{ExecutorConfig, ProtectiveFailurePolicy};
pub use error::{ExecutorError, ExecutorResult, PlacementError, ProtectiveLeg};
pub use fill_waiter::{FillOutcome, FillWaiter};
pub use orchestrator::OrderOrchestrator;
pub use protective::ProtectiveOrderPlacer;
