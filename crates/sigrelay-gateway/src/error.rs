//! Gateway error types.

use thiserror::Error;

/// Binance error codes that indicate a backend hiccup rather than a bad request.
/// -1001: internal disconnect, -1007: timeout waiting for backend.
const TRANSIENT_API_CODES: &[i64] = &[-1001, -1007];

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Connection, timeout, or other transport failure before a response arrived.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The exchange answered with a non-success status.
    #[error("API error (HTTP {status}, code {code:?}): {message}")]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    /// Response body could not be interpreted.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// Whether retrying the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status, code, .. } => {
                matches!(*status, 408 | 418 | 429)
                    || *status >= 500
                    || code.is_some_and(|c| TRANSIENT_API_CODES.contains(&c))
            }
            Self::Decode(_) | Self::Signing(_) | Self::Config(_) => false,
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, code: Option<i64>) -> GatewayError {
        GatewayError::Api {
            status,
            code,
            message: "x".to_string(),
        }
    }

    #[test]
    fn test_transient_classification() {
        assert!(GatewayError::Transport("reset".into()).is_transient());
        assert!(api(429, None).is_transient());
        assert!(api(418, None).is_transient());
        assert!(api(503, None).is_transient());
        assert!(api(400, Some(-1007)).is_transient());

        assert!(!api(400, Some(-2019)).is_transient());
        assert!(!api(401, Some(-2015)).is_transient());
        assert!(!GatewayError::Decode("bad".into()).is_transient());
    }

    #[test]
    fn test_display() {
        let err = GatewayError::Api {
            status: 400,
            code: Some(-2019),
            message: "Margin is insufficient.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error (HTTP 400, code Some(-2019)): Margin is insufficient."
        );
    }
}
