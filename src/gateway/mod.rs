//! HTTP gateway exposing the model registry
//!
//! Routes:
//! - `POST /chat`: one user turn to a provider
//! - `GET /providers`: registered provider names
//! - `GET /models` and `GET /models/{provider}`: allowed models
//! - `GET /healthz`

pub mod types;

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use indexmap::IndexMap;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub use self::types::{ChatRequest, ChatResponse, ErrorBody, ProvidersResponse};
use crate::{
    config::Config,
    error::{GateError, Result},
    messages::Message,
    services::{ModelAdapter, ModelRegistry},
};

/// Shared handler state; cloning is cheap
#[derive(Debug, Clone)]
pub struct AppState {
    registry: Arc<ModelRegistry>,
    request_timeout: Option<Duration>,
}

impl AppState {
    #[must_use]
    pub fn new(registry: Arc<ModelRegistry>, request_timeout: Option<Duration>) -> Self {
        Self {
            registry,
            request_timeout,
        }
    }

    /// Build the registry and state from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the registry's HTTP client cannot be built
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = ModelRegistry::from_config(config)?;
        Ok(Self::new(
            Arc::new(registry),
            config.server.request_timeout_secs.map(Duration::from_secs),
        ))
    }
}

/// Build the gateway router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/chat", post(chat))
        .route("/providers", get(providers))
        .route("/models", get(all_models))
        .route("/models/{provider}", get(provider_models))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `bind` and serve until Ctrl-C
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
pub async fn serve(state: AppState, bind: &str) -> Result<()> {
    let listener = TcpListener::bind(bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "gateway listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Error response carrying `{"detail": ...}`
#[derive(Debug)]
pub struct ApiError(GateError);

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            err if err.is_client_error() => StatusCode::BAD_REQUEST,
            GateError::Provider { .. } => StatusCode::BAD_GATEWAY,
            GateError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(status = status.as_u16(), error = %self.0, "request failed");
        (
            status,
            Json(ErrorBody {
                detail: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> std::result::Result<Json<ChatResponse>, ApiError> {
    let adapter = state
        .registry
        .create_model(&request.provider, request.model_name.as_deref())?;
    let messages = [Message::user(request.message)];

    tracing::debug!(
        provider = %request.provider,
        model = adapter.model(),
        "dispatching chat request"
    );

    let call = adapter.generate_response(&messages);
    let reply = match state.request_timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| GateError::Timeout(limit))??,
        None => call.await?,
    };

    Ok(Json(ChatResponse {
        status: "success".to_string(),
        provider: request.provider,
        model: request.model_name,
        message: reply,
    }))
}

async fn providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        providers: state.registry.list_providers(),
    })
}

async fn all_models(
    State(state): State<AppState>,
) -> std::result::Result<Json<IndexMap<String, Vec<String>>>, ApiError> {
    Ok(Json(state.registry.list_models(None)?))
}

async fn provider_models(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> std::result::Result<Json<IndexMap<String, Vec<String>>>, ApiError> {
    Ok(Json(state.registry.list_models(Some(&provider))?))
}
