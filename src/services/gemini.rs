//! Google Gemini API adapter
//!
//! Gemini's native API is session oriented rather than chat-completions shaped.
//! The adapter exposes the two primitives it needs, [`GeminiAdapter::start_chat`]
//! and [`ChatSession::send_message`], and builds `generate_response` on top.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    config::ProviderSettings,
    error::{GateError, Result},
    messages::Message,
};

use super::{resolve_api_key, ModelAdapter};

/// Gemini `generateContent` adapter
///
/// `generate_response` sends only the content of the **last** message, in a fresh
/// chat session. Earlier turns, system messages included, are not forwarded, so
/// the backend never sees conversation history.
#[derive(Debug, Clone)]
pub struct GeminiAdapter {
    client: Client,
    settings: ProviderSettings,
    api_key: Option<String>,
    model: String,
}

impl GeminiAdapter {
    /// Create a new adapter for `model`, or `gemini-pro` when `None`
    ///
    /// # Errors
    ///
    /// [`GateError::MissingCredential`] when credentials are required but unset
    pub fn new(client: Client, settings: ProviderSettings, model: Option<&str>) -> Result<Self> {
        let model = model
            .unwrap_or_else(|| settings.provider.default_model())
            .to_string();
        let api_key = resolve_api_key(&settings)?;

        Ok(Self {
            client,
            settings,
            api_key,
            model,
        })
    }

    /// Get the model name
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Open a new chat session with empty history
    #[must_use]
    pub fn start_chat(&self) -> ChatSession<'_> {
        ChatSession {
            adapter: self,
            history: Vec::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url, self.model
        )
    }

    fn provider_name(&self) -> &'static str {
        self.settings.provider.name()
    }

    async fn generate_content(&self, contents: &[GeminiContent]) -> Result<GeminiContent> {
        let mut builder = self
            .client
            .post(self.endpoint())
            .json(&GeminiRequest { contents });
        if let Some(key) = &self.api_key {
            builder = builder.header("x-goog-api-key", key);
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

        let api_response: GeminiResponse = response.json().await.map_err(|e| {
            GateError::provider(self.provider_name(), format!("Failed to parse response: {e}"))
        })?;

        api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .ok_or_else(|| GateError::provider(self.provider_name(), "No candidates in response"))
    }
}

#[async_trait]
impl ModelAdapter for GeminiAdapter {
    async fn generate_response(&self, messages: &[Message]) -> Result<String> {
        let last = messages
            .last()
            .ok_or_else(|| GateError::InvalidRequest("message list is empty".to_string()))?;

        if messages.len() > 1 {
            tracing::debug!(
                dropped = messages.len() - 1,
                "gemini adapter forwards only the last message"
            );
        }

        let mut chat = self.start_chat();
        chat.send_message(&last.content).await
    }
}

/// One Gemini conversation; history grows with each exchange
#[derive(Debug)]
pub struct ChatSession<'a> {
    adapter: &'a GeminiAdapter,
    history: Vec<GeminiContent>,
}

impl ChatSession<'_> {
    /// Send `text` as the next user turn and return the reply text
    ///
    /// History is only extended when the backend answers.
    ///
    /// # Errors
    ///
    /// [`GateError::Provider`] for transport failures, non-success statuses and
    /// responses without a candidate
    pub async fn send_message(&mut self, text: &str) -> Result<String> {
        tracing::debug!(
            model = %self.adapter.model,
            turn = self.history.len() / 2 + 1,
            "sending gemini message"
        );

        let mut contents = self.history.clone();
        contents.push(GeminiContent::user(text));

        let reply = self.adapter.generate_content(&contents).await?;
        let reply_text = reply.text();

        self.history = contents;
        self.history.push(reply);
        Ok(reply_text)
    }

    /// Number of contents (user and model turns) exchanged so far
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: &'a [GeminiContent],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default = "default_model_role")]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

fn default_model_role() -> String {
    "model".to_string()
}

impl GeminiContent {
    fn user(text: &str) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: Some(text.to_string()),
            }],
        }
    }

    /// Concatenated text of all parts
    fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}
