//! Error types for modelgate

use std::{path::PathBuf, time::Duration};

use thiserror::Error;

/// Result type alias using [`GateError`]
pub type Result<T> = std::result::Result<T, GateError>;

/// Main error type for modelgate
#[derive(Debug, Error)]
pub enum GateError {
    /// Provider identifier is not registered
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Model identifier is not allowed for an otherwise valid provider
    #[error("Unsupported model '{model}' for provider {provider}")]
    UnsupportedModel { provider: String, model: String },

    /// Adapter rejected its own construction parameters
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Credential environment variable is unset (only when credentials are required)
    #[error("Missing API key for provider {provider}: set {env_var}")]
    MissingCredential { provider: String, env_var: String },

    /// Failure reported by, or while talking to, a provider backend
    #[error("{provider} API error: {message}")]
    Provider { provider: String, message: String },

    /// Request the adapter cannot serve
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Non-success reply from the gateway (client side)
    #[error("Gateway returned HTTP {status}: {body}")]
    Gateway { status: u16, body: String },

    /// Gateway-imposed deadline elapsed
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Configuration parse error
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GateError {
    /// Build a [`GateError::Provider`] from anything displayable, keeping its text
    pub fn provider(provider: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.to_string(),
        }
    }

    /// Whether the caller can fix this by choosing another provider, model or input
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedProvider(_)
                | Self::UnsupportedModel { .. }
                | Self::Configuration(_)
                | Self::InvalidRequest(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_keeps_message() {
        let err = GateError::provider("openai", "HTTP 401: invalid key");
        match &err {
            GateError::Provider { provider, message } => {
                assert_eq!(provider, "openai");
                assert_eq!(message, "HTTP 401: invalid key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.to_string(), "openai API error: HTTP 401: invalid key");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(GateError::UnsupportedProvider("x".into()).is_client_error());
        assert!(GateError::UnsupportedModel {
            provider: "openai".into(),
            model: "x".into()
        }
        .is_client_error());
        assert!(!GateError::provider("gemini", "boom").is_client_error());
        assert!(!GateError::Timeout(Duration::from_secs(5)).is_client_error());
    }

    #[test]
    fn test_timeout_keeps_sub_second_precision() {
        assert_eq!(
            GateError::Timeout(Duration::from_millis(250)).to_string(),
            "Request timed out after 250ms"
        );
        assert_eq!(
            GateError::Timeout(Duration::from_secs(30)).to_string(),
            "Request timed out after 30s"
        );
    }
}
