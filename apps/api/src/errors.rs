use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::article::ArticleError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// No LLM provider is configured. Handlers that need one fail fast with this.
    #[error("LLM provider unavailable")]
    ProviderUnavailable,

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Upstream fetch failed: {0}")]
    Upstream(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
}

impl From<ArticleError> for AppError {
    fn from(err: ArticleError) -> Self {
        match err {
            ArticleError::InvalidUrl(msg) => AppError::Validation(msg),
            ArticleError::Pdf => AppError::UnsupportedMediaType(
                "PDF not supported here. Please paste a text excerpt instead.".to_string(),
            ),
            ArticleError::Unsupported(content_type) => AppError::UnsupportedMediaType(format!(
                "Unsupported content type ({content_type}). Please paste a text excerpt instead."
            )),
            ArticleError::Status(status) => AppError::Upstream(format!("Fetch failed ({status})")),
            ArticleError::Http(e) => AppError::Upstream(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::ProviderUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "PROVIDER_UNAVAILABLE",
                "LLM unavailable: server is not configured.".to_string(),
            ),
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "The writing assistant could not complete the request".to_string(),
                )
            }
            AppError::Upstream(msg) => {
                tracing::warn!("Upstream fetch error: {msg}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg.clone())
            }
            AppError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                msg.clone(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
