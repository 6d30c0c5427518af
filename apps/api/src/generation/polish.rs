//! Polish pass: LLM edit for clarity and tone, then a hard word-budget cut.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::coach::tighten::{count_words, tighten_to_word_limit};
use crate::errors::AppError;
use crate::generation::outline::{coerce_candidates, WORD_LIMIT_RANGE};
use crate::generation::prompts::{render_system, POLISH_SYSTEM_TEMPLATE};
use crate::llm_client::{complete_json, CompletionOptions, LlmClient};

const DRAFT_MIN_CHARS: usize = 40;

#[derive(Debug, Clone, Deserialize)]
pub struct PolishRequest {
    pub draft: String,
    pub word_limit: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Polished {
    pub polished: String,
    pub notes: Vec<String>,
    pub word_count: usize,
    /// True when the model overshot the limit and the text was cut locally.
    pub tightened: bool,
}

impl PolishRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.draft.trim().chars().count() < DRAFT_MIN_CHARS {
            return Err(AppError::Validation(format!(
                "draft must be at least {DRAFT_MIN_CHARS} characters"
            )));
        }
        if !WORD_LIMIT_RANGE.contains(&self.word_limit) {
            return Err(AppError::Validation(format!(
                "word_limit must be between {} and {}",
                WORD_LIMIT_RANGE.start(),
                WORD_LIMIT_RANGE.end()
            )));
        }
        Ok(())
    }
}

/// Applies the word budget to a model reply of shape `{polished, notes}`.
/// A reply without usable `polished` text yields an empty draft, not an error.
pub fn shape_polished(raw: &Value, word_limit: usize) -> Polished {
    let text = raw
        .get("polished")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    if text.is_empty() {
        warn!("Polish reply carried no polished text");
    }

    let notes = coerce_candidates(raw.get("notes").unwrap_or(&Value::Null))
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();

    let tightened = count_words(text) > word_limit;
    if tightened {
        warn!(
            "Polished draft has {} words, cutting to {word_limit}",
            count_words(text)
        );
    }
    let polished = tighten_to_word_limit(text, word_limit);

    Polished {
        word_count: count_words(&polished),
        polished,
        notes,
        tightened,
    }
}

pub async fn polish_draft(llm: &dyn LlmClient, req: &PolishRequest) -> Result<Polished, AppError> {
    let options = CompletionOptions::new(render_system(POLISH_SYSTEM_TEMPLATE))
        .temperature(0.2)
        .json();
    let prompt = format!("Word limit: {}\n\n{}", req.word_limit, req.draft.trim());

    info!(
        "Polishing {}-word draft via {}",
        count_words(&req.draft),
        llm.provider()
    );

    let raw: Value = complete_json(llm, &prompt, &options).await?;
    Ok(shape_polished(&raw, req.word_limit as usize))
}
