//! Service layer for hosted AI providers
//!
//! This module provides adapters for the supported model providers:
//! - OpenAI (chat completions)
//! - DeepSeek (OpenAI-compatible endpoint, same adapter)
//! - Google Gemini (`generateContent` sessions)
//!
//! [`registry::ModelRegistry`] validates a (provider, model) pair and hands back a
//! [`Provider`], which dispatches through [`ModelAdapter`].

pub mod gemini;
pub mod openai;
pub mod registry;

use async_trait::async_trait;

use crate::{
    config::{ProviderSettings, ProviderType},
    error::{GateError, Result},
    messages::Message,
};

pub use self::{gemini::GeminiAdapter, openai::OpenAIAdapter, registry::ModelRegistry};

/// Core trait for model adapters
///
/// The single capability every provider shares: turn an ordered message list into
/// one reply. Implementations suspend only on the backend round trip and never
/// retry. Backend failures surface as [`GateError::Provider`] with the backend's
/// own text preserved.
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Generate a reply to `messages`
    async fn generate_response(&self, messages: &[Message]) -> Result<String>;
}

/// Adapter built by the registry, one variant per provider
pub enum Provider {
    OpenAI(OpenAIAdapter),
    Deepseek(OpenAIAdapter),
    Gemini(GeminiAdapter),
}

impl Provider {
    /// Which provider this adapter talks to
    #[must_use]
    pub const fn provider(&self) -> ProviderType {
        match self {
            Self::OpenAI(_) => ProviderType::OpenAI,
            Self::Deepseek(_) => ProviderType::Deepseek,
            Self::Gemini(_) => ProviderType::Gemini,
        }
    }

    /// Resolved model name
    #[must_use]
    pub fn model(&self) -> &str {
        match self {
            Self::OpenAI(adapter) | Self::Deepseek(adapter) => adapter.model(),
            Self::Gemini(adapter) => adapter.model(),
        }
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("provider", &self.provider())
            .field("model", &self.model())
            .finish()
    }
}

#[async_trait]
impl ModelAdapter for Provider {
    async fn generate_response(&self, messages: &[Message]) -> Result<String> {
        match self {
            Self::OpenAI(adapter) | Self::Deepseek(adapter) => {
                adapter.generate_response(messages).await
            }
            Self::Gemini(adapter) => adapter.generate_response(messages).await,
        }
    }
}

/// Read the credential for `settings`, failing only when credentials are required
pub(crate) fn resolve_api_key(settings: &ProviderSettings) -> Result<Option<String>> {
    match settings.api_key() {
        Some(key) => Ok(Some(key)),
        None if settings.require_credentials => Err(GateError::MissingCredential {
            provider: settings.provider.name().to_string(),
            env_var: settings.api_key_env.clone(),
        }),
        None => {
            tracing::debug!(
                provider = settings.provider.name(),
                env = %settings.api_key_env,
                "credential not set; backend will reject the call"
            );
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_unset_key(require: bool) -> ProviderSettings {
        let mut settings = ProviderSettings::new(ProviderType::Gemini);
        settings.api_key_env = "MODELGATE_TEST_NEVER_SET".into();
        settings.require_credentials = require;
        settings
    }

    #[test]
    fn test_absent_credential_is_tolerated_by_default() {
        assert_eq!(resolve_api_key(&settings_with_unset_key(false)).unwrap(), None);
    }

    #[test]
    fn test_absent_credential_fails_when_required() {
        let err = resolve_api_key(&settings_with_unset_key(true)).unwrap_err();
        match err {
            GateError::MissingCredential { provider, env_var } => {
                assert_eq!(provider, "gemini");
                assert_eq!(env_var, "MODELGATE_TEST_NEVER_SET");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
