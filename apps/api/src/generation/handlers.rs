//! Axum route handlers for the generation API.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::generation::briefs::{Brief, BRIEFS};
use crate::generation::drafts::{assemble, starter_draft, AssembleRequest, Assembled};
use crate::generation::outline::{generate_outline, Outline, OutlineRequest};
use crate::generation::polish::{polish_draft, Polished, PolishRequest};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BriefsResponse {
    pub briefs: &'static [Brief],
}

#[derive(Debug, Serialize)]
pub struct StarterResponse {
    pub draft: String,
}

/// GET /api/v1/briefs
pub async fn handle_list_briefs() -> Json<BriefsResponse> {
    Json(BriefsResponse { briefs: BRIEFS })
}

/// POST /api/v1/outline
///
/// Validates first, then requires a configured LLM: an invalid payload is a 400
/// even when no provider is set up.
pub async fn handle_outline(
    State(state): State<AppState>,
    Json(request): Json<OutlineRequest>,
) -> Result<Json<Outline>, AppError> {
    let brief = request.validate()?;
    let llm = state.llm()?;
    let outline = generate_outline(llm, &request, brief, &state.dedup).await?;
    Ok(Json(outline))
}

/// POST /api/v1/polish
pub async fn handle_polish(
    State(state): State<AppState>,
    Json(request): Json<PolishRequest>,
) -> Result<Json<Polished>, AppError> {
    request.validate()?;
    let llm = state.llm()?;
    Ok(Json(polish_draft(llm, &request).await?))
}

/// POST /api/v1/drafts/starter
pub async fn handle_starter() -> Json<StarterResponse> {
    Json(StarterResponse {
        draft: starter_draft(),
    })
}

/// POST /api/v1/drafts/assemble
pub async fn handle_assemble(Json(request): Json<AssembleRequest>) -> Json<Assembled> {
    Json(assemble(&request))
}
