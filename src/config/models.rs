//! Provider catalogue and per-provider connection settings

use serde::{Deserialize, Serialize};

/// AI provider types known to the registry, in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    OpenAI,
    Gemini,
    Deepseek,
}

impl ProviderType {
    /// Every registered provider
    pub const ALL: [Self; 3] = [Self::OpenAI, Self::Gemini, Self::Deepseek];

    /// Identifier used on the wire and in configuration
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Gemini => "gemini",
            Self::Deepseek => "deepseek",
        }
    }

    /// Get the default base URL for this provider
    #[must_use]
    pub const fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAI => "https://api.openai.com/v1",
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Self::Deepseek => "https://api.deepseek.com",
        }
    }

    /// Environment variable holding the credential
    #[must_use]
    pub const fn default_api_key_env(&self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Gemini => "GOOGLE_API_KEY",
            Self::Deepseek => "DEEPSEEK_API_KEY",
        }
    }

    /// Model used when the caller does not name one
    #[must_use]
    pub const fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAI => "gpt-4",
            Self::Gemini => "gemini-pro",
            Self::Deepseek => "deepseek-chat",
        }
    }

    /// Closed set of model identifiers accepted for this provider
    #[must_use]
    pub const fn allowed_models(&self) -> &'static [&'static str] {
        match self {
            Self::OpenAI => &[
                "gpt-4o-mini",
                "gpt-4o",
                "o1",
                "o3-mini",
                "o1-mini",
                "gpt-3.5-turbo",
                "gpt-3.5-turbo-instruct",
                "gpt-3.5-turbo-16k-0613",
                "gpt-4",
            ],
            Self::Gemini => &["gemini-pro"],
            Self::Deepseek => &["deepseek-chat", "deepseek-coder", "deepseek-reasoner"],
        }
    }

    /// Whether the adapter re-checks the model against the allow-list on construction
    #[must_use]
    pub const fn adapter_enforces_models(&self) -> bool {
        matches!(self, Self::OpenAI)
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ProviderType {
    type Err = String;

    /// Exact, case-sensitive match on the provider identifier
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("Invalid provider: {s}"))
    }
}

/// Resolved connection settings handed to an adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub provider: ProviderType,

    /// Endpoint root, without trailing slash
    pub base_url: String,

    /// Environment variable read for the credential at adapter construction
    pub api_key_env: String,

    /// Fail construction when the credential variable is unset
    pub require_credentials: bool,
}

impl ProviderSettings {
    /// Settings with the provider's built-in defaults
    #[must_use]
    pub fn new(provider: ProviderType) -> Self {
        Self {
            provider,
            base_url: provider.default_base_url().to_string(),
            api_key_env: provider.default_api_key_env().to_string(),
            require_credentials: false,
        }
    }

    /// Override the endpoint root
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Read the credential from the environment; `None` when unset or empty
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
    }
}

/// Per-provider overrides as written in the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderOverride {
    /// Custom API endpoint (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Custom credential variable name (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_round_trips_through_name() {
        for provider in ProviderType::ALL {
            assert_eq!(provider.name().parse::<ProviderType>().unwrap(), provider);
        }
        assert!("OpenAI".parse::<ProviderType>().is_err());
        assert!("anthropic".parse::<ProviderType>().is_err());
    }

    #[test]
    fn test_default_model_is_allowed() {
        for provider in ProviderType::ALL {
            assert!(!provider.allowed_models().is_empty());
            assert!(provider.allowed_models().contains(&provider.default_model()));
        }
    }

    #[test]
    fn test_deepseek_uses_its_own_endpoint() {
        assert_ne!(
            ProviderType::Deepseek.default_base_url(),
            ProviderType::OpenAI.default_base_url()
        );
    }

    #[test]
    fn test_base_url_override_strips_trailing_slash() {
        let settings =
            ProviderSettings::new(ProviderType::Deepseek).with_base_url("http://localhost:9000/");
        assert_eq!(settings.base_url, "http://localhost:9000");
        assert_eq!(settings.api_key_env, "DEEPSEEK_API_KEY");
    }

    #[test]
    fn test_unset_api_key_is_none() {
        let mut settings = ProviderSettings::new(ProviderType::OpenAI);
        settings.api_key_env = "MODELGATE_TEST_UNSET_KEY_VAR".into();
        assert!(settings.api_key().is_none());
    }
}
