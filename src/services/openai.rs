//! OpenAI API adapter
//!
//! Supports:
//! - OpenAI official API
//! - OpenAI-compatible endpoints reached through another base URL (DeepSeek)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    config::ProviderSettings,
    error::{GateError, Result},
    messages::Message,
};

use super::{resolve_api_key, ModelAdapter};

/// Chat-completions adapter
#[derive(Debug, Clone)]
pub struct OpenAIAdapter {
    client: Client,
    settings: ProviderSettings,
    api_key: Option<String>,
    model: String,
}

impl OpenAIAdapter {
    /// Create a new adapter for `model`, or the provider default when `None`
    ///
    /// Providers that enforce their allow-list reject unknown models here, before
    /// any request is made.
    ///
    /// # Errors
    ///
    /// [`GateError::Configuration`] for a model outside an enforced allow-list,
    /// [`GateError::MissingCredential`] when credentials are required but unset
    pub fn new(client: Client, settings: ProviderSettings, model: Option<&str>) -> Result<Self> {
        let provider = settings.provider;
        let model = model.unwrap_or_else(|| provider.default_model());

        if provider.adapter_enforces_models() && !provider.allowed_models().contains(&model) {
            let mut valid: Vec<&str> = provider.allowed_models().to_vec();
            valid.sort_unstable();
            return Err(GateError::Configuration(format!(
                "Invalid model name '{model}'. Must be one of: {}",
                valid.join(", ")
            )));
        }

        let api_key = resolve_api_key(&settings)?;

        Ok(Self {
            client,
            settings,
            api_key,
            model: model.to_string(),
        })
    }

    /// Get the model name
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url)
    }

    fn provider_name(&self) -> &'static str {
        self.settings.provider.name()
    }
}

#[async_trait]
impl ModelAdapter for OpenAIAdapter {
    async fn generate_response(&self, messages: &[Message]) -> Result<String> {
        let request = OpenAIRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|msg| OpenAIMessage {
                    role: msg.role.as_str(),
                    content: &msg.content,
                })
                .collect(),
            stream: false,
        };

        tracing::debug!(
            provider = self.provider_name(),
            model = %self.model,
            messages = messages.len(),
            "sending chat completion"
        );

        let mut builder = self.client.post(self.endpoint()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| GateError::provider(self.provider_name(), e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .map_err(|e| GateError::provider(self.provider_name(), e))?;
            return Err(GateError::provider(
                self.provider_name(),
                format!("HTTP {status}: {error_text}"),
            ));
        }

        let api_response: OpenAIResponse = response.json().await.map_err(|e| {
            GateError::provider(self.provider_name(), format!("Failed to parse response: {e}"))
        })?;

        api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GateError::provider(self.provider_name(), "No choices in response"))?
            .message
            .content
            .ok_or_else(|| {
                GateError::provider(self.provider_name(), "First choice has no message content")
            })
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIReply,
}

#[derive(Debug, Deserialize)]
struct OpenAIReply {
    #[serde(default)]
    content: Option<String>,
}
