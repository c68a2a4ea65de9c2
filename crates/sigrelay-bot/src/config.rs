//! Application configuration.
//!
//! Values come from an optional TOML file and are then overridden by the
//! environment variables the relay has always honoured:
//!
//! | Variable               | Field                          |
//! |------------------------|--------------------------------|
//! | `BINANCE_API_KEY`      | credentials (env only)         |
//! | `BINANCE_API_SECRET`   | credentials (env only)         |
//! | `WEBHOOK_SECRET`       | `server.webhook_secret`        |
//! | `USE_TESTNET`          | `exchange.network`             |
//! | `FILL_TIMEOUT_SECONDS` | `executor.fill_timeout_secs`   |
//! | `POLL_INTERVAL`        | `executor.poll_interval_secs`  |
//! | `PORT`                 | `server.port`                  |

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sigrelay_executor::{ExecutorConfig, ProtectiveFailurePolicy};
use sigrelay_gateway::{BinanceConfig, Credentials, Network};
use sigrelay_server::ServerConfig;

use crate::error::{AppError, AppResult};

pub const ENV_CONFIG_PATH: &str = "SIGRELAY_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub executor: ExecutorSettings,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Exchange connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    #[serde(default)]
    pub network: Network,
    /// Overrides the network's base URL (e.g. a local proxy).
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_recv_window_ms")]
    pub recv_window_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_recv_window_ms() -> u64 {
    5_000
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            base_url: None,
            recv_window_ms: default_recv_window_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ExchangeConfig {
    pub fn to_binance_config(&self) -> BinanceConfig {
        BinanceConfig {
            base_url: self
                .base_url
                .clone()
                .unwrap_or_else(|| self.network.base_url().to_string()),
            recv_window_ms: self.recv_window_ms,
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}

/// Order lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorSettings {
    /// Maximum time to wait for a limit entry to fill.
    #[serde(default = "default_fill_timeout_secs")]
    pub fill_timeout_secs: u64,
    /// Seconds between status polls (fractional allowed).
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: f64,
    #[serde(default)]
    pub cancel_unfilled_entry: bool,
    #[serde(default)]
    pub protective_failure_policy: ProtectiveFailurePolicy,
}

fn default_fill_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_secs() -> f64 {
    1.0
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            fill_timeout_secs: default_fill_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            cancel_unfilled_entry: false,
            protective_failure_policy: ProtectiveFailurePolicy::default(),
        }
    }
}

impl ExecutorSettings {
    pub fn to_executor_config(&self) -> AppResult<ExecutorConfig> {
        let poll_interval = Duration::try_from_secs_f64(self.poll_interval_secs)
            .ok()
            .filter(|d| !d.is_zero())
            .ok_or_else(|| {
                AppError::Config(format!(
                    "poll_interval_secs must be a positive number, got {}",
                    self.poll_interval_secs
                ))
            })?;

        Ok(ExecutorConfig {
            fill_timeout: Duration::from_secs(self.fill_timeout_secs),
            poll_interval,
            cancel_unfilled_entry: self.cancel_unfilled_entry,
            protective_failure_policy: self.protective_failure_policy,
        })
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    sigrelay_telemetry::logging::DEFAULT_FILTER.to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Resolve the config path: CLI arg > `SIGRELAY_CONFIG` > default.
    pub fn resolve_path(cli_path: Option<String>) -> String {
        cli_path
            .or_else(|| std::env::var(ENV_CONFIG_PATH).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Load `path` if it exists (defaults otherwise) and apply environment overrides.
    pub fn load(path: &str) -> AppResult<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup("WEBHOOK_SECRET") {
            self.server.webhook_secret = secret;
        }
        if let Some(flag) = lookup("USE_TESTNET") {
            self.exchange.network = if is_truthy(&flag) {
                Network::Testnet
            } else {
                Network::Live
            };
        }
        if let Some(v) = lookup("FILL_TIMEOUT_SECONDS") {
            self.executor.fill_timeout_secs = parse_env("FILL_TIMEOUT_SECONDS", &v)?;
        }
        if let Some(v) = lookup("POLL_INTERVAL") {
            self.executor.poll_interval_secs = parse_env("POLL_INTERVAL", &v)?;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = parse_env("PORT", &v)?;
        }
        Ok(())
    }
}

/// API credentials from `BINANCE_API_KEY` / `BINANCE_API_SECRET`.
pub fn credentials_from_env<F>(lookup: F) -> Credentials
where
    F: Fn(&str) -> Option<String>,
{
    Credentials::new(
        lookup("BINANCE_API_KEY").unwrap_or_default(),
        lookup("BINANCE_API_SECRET").unwrap_or_default(),
    )
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

fn parse_env<T>(key: &str, value: &str) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid {key}={value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.exchange.network, Network::Testnet);
        assert_eq!(config.executor.fill_timeout_secs, 30);
        assert_eq!(config.executor.poll_interval_secs, 1.0);
        assert_eq!(config.server.port, 5000);
        assert_eq!(
            config.exchange.to_binance_config().base_url,
            "https://testnet.binancefuture.com"
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [exchange]
            network = "live"

            [executor]
            poll_interval_secs = 0.5
            protective_failure_policy = "cancel_placed"
            "#,
        )
        .unwrap();

        assert_eq!(config.exchange.network, Network::Live);
        assert_eq!(config.exchange.recv_window_ms, 5_000);
        assert_eq!(config.executor.fill_timeout_secs, 30);

        let executor = config.executor.to_executor_config().unwrap();
        assert_eq!(executor.poll_interval, Duration::from_millis(500));
        assert_eq!(
            executor.protective_failure_policy,
            ProtectiveFailurePolicy::CancelPlaced
        );
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env_overrides(env(&[
                ("WEBHOOK_SECRET", "s3cret"),
                ("USE_TESTNET", "false"),
                ("FILL_TIMEOUT_SECONDS", "45"),
                ("POLL_INTERVAL", "2.5"),
                ("PORT", "8088"),
            ]))
            .unwrap();

        assert!(config.server.secret_enabled());
        assert_eq!(config.exchange.network, Network::Live);
        assert_eq!(config.executor.fill_timeout_secs, 45);
        assert_eq!(config.executor.poll_interval_secs, 2.5);
        assert_eq!(config.server.port, 8088);
    }

    #[test]
    fn test_use_testnet_values() {
        for (value, expected) in [
            ("1", Network::Testnet),
            ("YES", Network::Testnet),
            ("true", Network::Testnet),
            ("0", Network::Live),
            ("no", Network::Live),
        ] {
            let mut config = AppConfig::default();
            config
                .apply_env_overrides(env(&[("USE_TESTNET", value)]))
                .unwrap();
            assert_eq!(config.exchange.network, expected, "USE_TESTNET={value}");
        }
    }

    #[test]
    fn test_invalid_env_value() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env_overrides(env(&[("FILL_TIMEOUT_SECONDS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("FILL_TIMEOUT_SECONDS"));
    }

    #[test]
    fn test_non_positive_poll_interval_rejected() {
        for bad in [0.0, -1.0, f64::NAN] {
            let settings = ExecutorSettings {
                poll_interval_secs: bad,
                ..Default::default()
            };
            assert!(settings.to_executor_config().is_err());
        }
    }

    #[test]
    fn test_base_url_override() {
        let exchange = ExchangeConfig {
            network: Network::Live,
            base_url: Some("http://127.0.0.1:9000".to_string()),
            ..Default::default()
        };
        assert_eq!(exchange.to_binance_config().base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_credentials_from_env() {
        let creds = credentials_from_env(env(&[("BINANCE_API_KEY", "key")]));
        assert!(!creds.is_complete());
        let creds = credentials_from_env(env(&[
            ("BINANCE_API_KEY", "key"),
            ("BINANCE_API_SECRET", "secret"),
        ]));
        assert!(creds.is_complete());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.exchange.recv_window_ms, 5_000);
    }

    #[test]
    fn test_config_serialization_omits_secret() {
        let mut config = AppConfig::default();
        config.server.webhook_secret = "hunter2".to_string();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("fill_timeout_secs"));
        assert!(!toml_str.contains("hunter2"));
    }
}
