//! Model registry and adapter factory
//!
//! The registry is built once from [`Config`] and never mutated afterwards; share
//! it behind an `Arc`. It is the only place that knows which models a provider
//! accepts, and it rejects unknown providers and models before any network cost.

use indexmap::IndexMap;
use reqwest::Client;

use crate::{
    config::{Config, ProviderSettings, ProviderType},
    error::{GateError, Result},
};

use super::{GeminiAdapter, OpenAIAdapter, Provider};

/// Registry entry for one provider
#[derive(Debug, Clone)]
struct RegistryEntry {
    settings: ProviderSettings,
    allowed_models: Vec<String>,
}

/// Factory for validated provider adapters
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    client: Client,
    entries: IndexMap<String, RegistryEntry>,
}

impl ModelRegistry {
    /// Build the registry from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, config))
    }

    /// Build the registry around an existing HTTP client (connection pool)
    #[must_use]
    pub fn with_client(client: Client, config: &Config) -> Self {
        let entries = ProviderType::ALL
            .into_iter()
            .map(|provider| {
                let entry = RegistryEntry {
                    settings: config.provider_settings(provider),
                    allowed_models: provider
                        .allowed_models()
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                };
                (provider.name().to_string(), entry)
            })
            .collect();

        Self { client, entries }
    }

    /// Create a validated adapter for `provider`
    ///
    /// `model` is checked against the provider's allowed set and forwarded only when
    /// supplied and non-empty, so the adapter's own default applies otherwise.
    ///
    /// # Errors
    ///
    /// [`GateError::UnsupportedProvider`], [`GateError::UnsupportedModel`], or the
    /// adapter's construction error
    pub fn create_model(&self, provider: &str, model: Option<&str>) -> Result<Provider> {
        let entry = self.entry(provider)?;
        let model = model.filter(|m| !m.is_empty());

        if let Some(model) = model {
            if !entry.allowed_models.iter().any(|m| m == model) {
                return Err(GateError::UnsupportedModel {
                    provider: provider.to_string(),
                    model: model.to_string(),
                });
            }
        }

        let settings = entry.settings.clone();
        tracing::debug!(provider, model = ?model, "creating adapter");

        let client = self.client.clone();
        let adapter = match settings.provider {
            ProviderType::OpenAI => Provider::OpenAI(OpenAIAdapter::new(client, settings, model)?),
            ProviderType::Deepseek => {
                Provider::Deepseek(OpenAIAdapter::new(client, settings, model)?)
            }
            ProviderType::Gemini => Provider::Gemini(GeminiAdapter::new(client, settings, model)?),
        };

        Ok(adapter)
    }

    /// Allowed models, for every provider or just `provider`
    ///
    /// # Errors
    ///
    /// [`GateError::UnsupportedProvider`] if `provider` is not registered
    pub fn list_models(&self, provider: Option<&str>) -> Result<IndexMap<String, Vec<String>>> {
        match provider {
            Some(name) => {
                let entry = self.entry(name)?;
                Ok(IndexMap::from([(name.to_string(), entry.allowed_models.clone())]))
            }
            None => Ok(self
                .entries
                .iter()
                .map(|(name, entry)| (name.clone(), entry.allowed_models.clone()))
                .collect()),
        }
    }

    /// Registered provider identifiers, in registration order
    #[must_use]
    pub fn list_providers(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn entry(&self, provider: &str) -> Result<&RegistryEntry> {
        self.entries
            .get(provider)
            .ok_or_else(|| GateError::UnsupportedProvider(provider.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{messages::Message, services::ModelAdapter};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn registry() -> ModelRegistry {
        ModelRegistry::from_config(&Config::default()).unwrap()
    }

    /// Registry whose every provider points at `server`, with credentials unset
    fn stubbed_registry(server: &MockServer) -> ModelRegistry {
        let mut config = Config::default();
        for provider in ProviderType::ALL {
            config.providers.insert(
                provider.name().to_string(),
                crate::config::ProviderOverride {
                    base_url: Some(server.uri()),
                    api_key_env: Some("MODELGATE_TEST_REGISTRY_UNSET".to_string()),
                },
            );
        }
        ModelRegistry::with_client(Client::new(), &config)
    }

    #[test]
    fn test_every_allowed_model_can_be_created() {
        let registry = registry();
        for (provider, models) in registry.list_models(None).unwrap() {
            for model in models {
                let adapter = registry.create_model(&provider, Some(model.as_str())).unwrap();
                assert_eq!(adapter.provider().name(), provider);
                assert_eq!(adapter.model(), model);
            }
        }
    }

    #[test]
    fn test_unknown_model_rejected_for_every_provider() {
        let registry = registry();
        for provider in registry.list_providers() {
            let err = registry
                .create_model(&provider, Some("not-a-real-model"))
                .unwrap_err();
            assert!(matches!(err, GateError::UnsupportedModel { .. }), "{provider}: {err}");
        }
    }

    #[test]
    fn test_model_scoped_to_provider() {
        let registry = registry();
        assert!(registry.create_model("deepseek", Some("deepseek-coder")).is_ok());
        assert!(matches!(
            registry.create_model("openai", Some("deepseek-coder")),
            Err(GateError::UnsupportedModel { .. })
        ));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let registry = registry();
        assert!(matches!(
            registry.create_model("anthropic", None),
            Err(GateError::UnsupportedProvider(ref p)) if p == "anthropic"
        ));
        assert!(matches!(
            registry.list_models(Some("anthropic")),
            Err(GateError::UnsupportedProvider(_))
        ));
        assert!(matches!(
            registry.create_model("OpenAI", Some("gpt-4")),
            Err(GateError::UnsupportedProvider(_))
        ));
    }

    #[test]
    fn test_list_models_keys_match_providers() {
        let registry = registry();
        let all = registry.list_models(None).unwrap();
        let keys: Vec<String> = all.keys().cloned().collect();
        assert_eq!(keys, registry.list_providers());
        assert_eq!(keys, vec!["openai", "gemini", "deepseek"]);
    }

    #[test]
    fn test_single_provider_listing_matches_full_table() {
        let registry = registry();
        let all = registry.list_models(None).unwrap();
        for provider in registry.list_providers() {
            let single = registry.list_models(Some(provider.as_str())).unwrap();
            assert_eq!(single.len(), 1);
            assert_eq!(single.get(&provider), all.get(&provider));
        }
    }

    #[test]
    fn test_default_model_applies_when_omitted() {
        let registry = registry();
        for provider in ProviderType::ALL {
            let first = registry.create_model(provider.name(), None).unwrap();
            let second = registry.create_model(provider.name(), None).unwrap();
            assert_eq!(first.model(), provider.default_model());
            assert_eq!(second.model(), first.model());
        }
    }

    #[test]
    fn test_empty_model_falls_back_to_default() {
        let registry = registry();
        for provider in ProviderType::ALL {
            let adapter = registry.create_model(provider.name(), Some("")).unwrap();
            assert_eq!(adapter.model(), provider.default_model());
        }
    }

    #[test]
    fn test_provider_variants() {
        let registry = registry();
        assert!(matches!(registry.create_model("openai", None).unwrap(), Provider::OpenAI(_)));
        assert!(matches!(registry.create_model("deepseek", None).unwrap(), Provider::Deepseek(_)));
        assert!(matches!(registry.create_model("gemini", None).unwrap(), Provider::Gemini(_)));
    }

    #[test]
    fn test_required_credentials_fail_at_construction() {
        let mut config = Config {
            require_credentials: true,
            ..Config::default()
        };
        config.providers.insert(
            "deepseek".to_string(),
            crate::config::ProviderOverride {
                base_url: None,
                api_key_env: Some("MODELGATE_TEST_REGISTRY_UNSET".to_string()),
            },
        );
        let registry = ModelRegistry::with_client(Client::new(), &config);
        assert!(matches!(
            registry.create_model("deepseek", None),
            Err(GateError::MissingCredential { .. })
        ));
    }

    #[tokio::test]
    async fn test_openai_round_trip_returns_reply_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "pong"}, "finish_reason": "stop"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let adapter = stubbed_registry(&server)
            .create_model("openai", Some("gpt-4"))
            .unwrap();
        let reply = adapter.generate_response(&[Message::user("hi")]).await.unwrap();
        assert_eq!(reply, "pong");
    }

    #[tokio::test]
    async fn test_invalid_model_makes_no_backend_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let registry = stubbed_registry(&server);
        assert!(registry.create_model("openai", Some("not-a-real-model")).is_err());
        assert!(registry.create_model("gemini", Some("gemini-ultra")).is_err());
    }

    #[tokio::test]
    async fn test_transport_error_is_provider_error() {
        // Reserve a port, then free it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = Config::default();
        config.providers.insert(
            "deepseek".to_string(),
            crate::config::ProviderOverride {
                base_url: Some(format!("http://{addr}")),
                api_key_env: Some("MODELGATE_TEST_REGISTRY_UNSET".to_string()),
            },
        );
        let adapter = ModelRegistry::with_client(Client::new(), &config)
            .create_model("deepseek", None)
            .unwrap();

        let err = adapter
            .generate_response(&[Message::user("hi")])
            .await
            .unwrap_err();
        match err {
            GateError::Provider { provider, message } => {
                assert_eq!(provider, "deepseek");
                assert!(message.contains("error sending request"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
