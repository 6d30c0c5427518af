use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Reports service version and whether an LLM provider is configured.
/// Never echoes any part of the API key.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let provider = state.llm.as_ref().map(|llm| llm.provider());
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "coach-api",
        "llm_configured": provider.is_some(),
        "provider": provider,
    }))
}
