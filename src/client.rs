//! HTTP client for the gateway, used by the command-line front-ends

use indexmap::IndexMap;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::{
    error::{GateError, Result},
    gateway::{ChatRequest, ChatResponse, ErrorBody, ProvidersResponse},
};

/// Default gateway address
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8000";

/// Thin wrapper over the gateway's JSON API
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    /// Create a client for the gateway at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Registered providers
    ///
    /// # Errors
    ///
    /// [`GateError::Http`] on transport failure, [`GateError::Gateway`] on a non-2xx reply
    pub async fn providers(&self) -> Result<Vec<String>> {
        let response = self.client.get(self.url(&["providers"])?).send().await?;
        let body: ProvidersResponse = Self::decode(response).await?;
        Ok(body.providers)
    }

    /// Allowed models for every provider, or for `provider` only
    ///
    /// # Errors
    ///
    /// [`GateError::Http`] on transport failure, [`GateError::Gateway`] on a non-2xx reply
    ///
    /// The provider name is sent as a single path segment, percent-encoded.
    pub async fn models(&self, provider: Option<&str>) -> Result<IndexMap<String, Vec<String>>> {
        let url = match provider {
            Some(name) => self.url(&["models", name])?,
            None => self.url(&["models"])?,
        };
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    /// Send one chat turn
    ///
    /// # Errors
    ///
    /// [`GateError::Http`] on transport failure, [`GateError::Gateway`] on a non-2xx reply
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        tracing::debug!(provider = %request.provider, model = ?request.model_name, "posting chat");
        let response = self
            .client
            .post(self.url(&["chat"])?)
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let invalid = |reason: String| {
            GateError::Configuration(format!("invalid gateway URL {}: {reason}", self.base_url))
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            return Ok(serde_json::from_str(&text)?);
        }

        let body = serde_json::from_str::<ErrorBody>(&text)
            .map(|e| e.detail)
            .unwrap_or(text);
        Err(GateError::Gateway {
            status: status.as_u16(),
            body,
        })
    }
}
