pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::article::handlers as article;
use crate::coach::handlers as coach;
use crate::generation::handlers as generation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Local coaching (no LLM)
        .route("/api/v1/coach/score", post(coach::handle_score))
        .route("/api/v1/coach/tighten", post(coach::handle_tighten))
        .route("/api/v1/drafts/starter", post(generation::handle_starter))
        .route("/api/v1/drafts/assemble", post(generation::handle_assemble))
        .route("/api/v1/briefs", get(generation::handle_list_briefs))
        // LLM-backed
        .route("/api/v1/outline", post(generation::handle_outline))
        .route("/api/v1/polish", post(generation::handle_polish))
        // Reference material
        .route("/api/v1/articles/fetch", post(article::handle_fetch_article))
        .with_state(state)
}
