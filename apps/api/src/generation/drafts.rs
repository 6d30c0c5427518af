//! Local draft helpers: a neutral starter letter and formula assembly.

use serde::{Deserialize, Serialize};

use crate::coach::tighten::{count_words, tighten_to_word_limit};
use crate::models::letter::LetterDraft;

const STARTER_SENTENCES: &[&str] = &[
    "Regarding your recent coverage of climate solutions, I appreciate the focus on practical steps.",
    "As a resident of our community, I've seen how extreme heat and higher bills affect neighbors on fixed incomes.",
    "A straightforward way forward is to speed up clean energy and invest in efficient homes so power is reliable and affordable.",
    "I urge our representatives to support bipartisan measures that expand transmission and help households upgrade.",
    "Thank you for your attention to this issue.",
];

/// A short, neutral skeleton the writer can rework. No model call.
pub fn starter_draft() -> String {
    STARTER_SENTENCES.join(" ")
}

#[derive(Debug, Deserialize)]
pub struct AssembleRequest {
    #[serde(default)]
    pub draft: LetterDraft,
    #[serde(default)]
    pub word_limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct Assembled {
    pub text: String,
    pub word_count: usize,
    /// Present only when a word limit was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tightened: Option<String>,
}

pub fn assemble(req: &AssembleRequest) -> Assembled {
    let text = req.draft.assemble();
    Assembled {
        word_count: count_words(&text),
        tightened: req.word_limit.map(|limit| tighten_to_word_limit(&text, limit)),
        text,
    }
}
