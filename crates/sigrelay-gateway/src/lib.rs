//! Exchange access for sigrelay.
//!
//! # Key Components
//!
//! - [`ExchangeGateway`]: Submit / status / cancel seam used by the order lifecycle
//! - [`BinanceFuturesClient`]: Signed REST client for Binance USDⓈ-M futures
//! - [`OrderRequest`]: Entry and close-position trigger orders in wire form
//! - [`MockGateway`]: Scriptable in-memory gateway for tests

pub mod binance;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod mock;
pub mod request;
pub mod response;

pub use binance::{BinanceConfig, BinanceFuturesClient, Network};
pub use credentials::Credentials;
pub use error::{GatewayError, GatewayResult};
pub use gateway::{BoxFuture, DynGateway, ExchangeGateway};
pub use mock::MockGateway;
pub use request::{OrderKind, OrderRequest};
pub use response::parse_order_response;
