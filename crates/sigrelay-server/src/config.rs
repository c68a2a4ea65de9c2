//! Server configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Webhook server configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared secret expected in `X-SIGNAL-TOKEN` or the body's `secret` (empty = disabled).
    #[serde(default, skip_serializing)]
    pub webhook_secret: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            webhook_secret: String::new(),
        }
    }
}

impl ServerConfig {
    /// Check if the webhook secret is enforced.
    pub fn secret_enabled(&self) -> bool {
        !self.webhook_secret.is_empty()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secret_enabled", &self.secret_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert!(!config.secret_enabled());
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = ServerConfig {
            webhook_secret: "hunter2".to_string(),
            ..Default::default()
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("secret_enabled: true"));
    }
}
