//! JSON bodies exchanged between the gateway and its clients

use serde::{Deserialize, Serialize};

/// `POST /chat` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub provider: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,

    /// Single user turn
    pub message: String,
}

/// `POST /chat` success envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Always `"success"`
    pub status: String,
    pub provider: String,

    /// Model as requested; `null` when the provider default was used
    pub model: Option<String>,

    /// Reply text, unmodified
    pub message: String,
}

/// `GET /providers` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidersResponse {
    pub providers: Vec<String>,
}

/// Failure envelope for every endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
