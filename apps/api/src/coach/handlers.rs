//! Axum route handlers for local coaching. No LLM involved.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::coach::rubric::score_draft_with;
use crate::coach::tighten::{count_words, tighten_to_word_limit};
use crate::errors::AppError;
use crate::models::coach::CoachResult;
use crate::models::letter::{lenient_text, LetterDraft};
use crate::state::AppState;

const MAX_TIGHTEN_LIMIT: usize = 2000;

#[derive(Debug, Deserialize)]
pub struct TightenRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub text: String,
    pub limit: usize,
}

#[derive(Debug, Serialize)]
pub struct TightenResponse {
    pub text: String,
    pub word_count: usize,
    pub truncated: bool,
}

/// POST /api/v1/coach/score
pub async fn handle_score(
    State(state): State<AppState>,
    Json(draft): Json<LetterDraft>,
) -> Json<CoachResult> {
    Json(score_draft_with(&draft, &state.config.rubric))
}

/// POST /api/v1/coach/tighten
pub async fn handle_tighten(Json(req): Json<TightenRequest>) -> Result<Json<TightenResponse>, AppError> {
    if req.limit == 0 || req.limit > MAX_TIGHTEN_LIMIT {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_TIGHTEN_LIMIT}"
        )));
    }

    let truncated = count_words(&req.text) > req.limit;
    let text = tighten_to_word_limit(&req.text, req.limit);

    Ok(Json(TightenResponse {
        word_count: count_words(&text),
        text,
        truncated,
    }))
}
