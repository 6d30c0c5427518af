use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::article::{fetch_article, parse_article_url};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FetchArticleRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct FetchArticleResponse {
    pub text: String,
    pub truncated: bool,
}

/// POST /api/v1/articles/fetch
pub async fn handle_fetch_article(
    State(state): State<AppState>,
    Json(req): Json<FetchArticleRequest>,
) -> Result<Json<FetchArticleResponse>, AppError> {
    let url = parse_article_url(&req.url)?;
    let article = fetch_article(&state.http, url).await?;
    Ok(Json(FetchArticleResponse {
        text: article.text,
        truncated: article.truncated,
    }))
}
