//! Rubric scorer: grades a `LetterDraft` against CCL letter-writing criteria.
//!
//! Pure and deterministic: missing or malformed fields simply fail their check.
//!
//! Scoring is weighted: each passing item adds its weight, and the sum is
//! scaled to 0–100. Weights sum to 1.0, so a fully compliant draft scores 100.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::models::coach::{CoachResult, RubricItem, RubricKey};
use crate::models::letter::{LetterDraft, Region};

const HOOK_MIN_CHARS: usize = 21;
const PROBLEM_MIN_CHARS: usize = 30;
const SOLUTION_MIN_CHARS: usize = 30;
const CLOSE_MIN_CHARS: usize = 12;

/// Accepted total word count for the whole letter, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RubricConfig {
    pub min_words: usize,
    pub max_words: usize,
}

impl RubricConfig {
    /// 120–260 words, the window most outlets accept.
    pub const fn standard() -> Self {
        Self {
            min_words: 120,
            max_words: 260,
        }
    }

    /// 120–200 words, for outlets with tighter limits.
    pub const fn compact() -> Self {
        Self {
            min_words: 120,
            max_words: 200,
        }
    }
}

impl Default for RubricConfig {
    fn default() -> Self {
        Self::standard()
    }
}

fn news_hook_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)\b(?:",
            r"(?:19|20)\d{2}",
            r"|\d{1,2}/\d{1,2}(?:/\d{2,4})?",
            r"|(?:mon|tues?|wed(?:nes)?|thu(?:rs)?|fri|sat(?:ur)?|sun)(?:day)?",
            r"|(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+\d{1,2}",
            r")\b"
        ))
        .expect("news hook pattern is valid")
    })
}

fn list_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[;•]").expect("list marker pattern is valid"))
}

fn repeated_conjunction_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)\b(?:and|also|plus)\b.*\b(?:and|also|plus)\b")
            .expect("conjunction pattern is valid")
    })
}

fn ask_verb_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:support|cosponsor|oppose|vote|introduce|pass|fund|prioritize)(?:s|es|ed|d|ing)?\b",
        )
        .expect("ask verb pattern is valid")
    })
}

fn disrespect_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:idiot|stupid|corrupt|traitor|dumb|liar|disgusting|hate)s?\b")
            .expect("tone denylist pattern is valid")
    })
}

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w+\b").expect("word pattern is valid"))
}

/// Number of `\w+` runs in `text`.
pub fn word_count(text: &str) -> usize {
    word_re().find_iter(text).count()
}

fn char_len(text: &str) -> usize {
    text.trim().chars().count()
}

pub fn has_news_hook(news_ref: &str) -> bool {
    news_hook_re().is_match(news_ref) || char_len(news_ref) >= HOOK_MIN_CHARS
}

pub fn has_problem(problem: &str) -> bool {
    char_len(problem) >= PROBLEM_MIN_CHARS
}

/// One policy idea: long enough, not a list, and not chained with repeated conjunctions.
pub fn has_single_solution(solution: &str) -> bool {
    char_len(solution) >= SOLUTION_MIN_CHARS
        && !list_marker_re().is_match(solution)
        && !repeated_conjunction_re().is_match(solution)
}

pub fn has_clear_ask(ask: &str) -> bool {
    ask_verb_re().is_match(ask)
}

/// A real closing line, or the writer's city/state named anywhere in the letter.
pub fn has_close_or_local(close: &str, region: Option<&Region>, combined: &str) -> bool {
    char_len(close) >= CLOSE_MIN_CHARS || region.is_some_and(|r| mentions_region(r, combined))
}

fn mentions_region(region: &Region, text: &str) -> bool {
    region.names().any(|name| {
        Regex::new(&format!(r"(?i)(?:^|\W){}(?:\W|$)", regex::escape(name)))
            .map(|re| re.is_match(text))
            .unwrap_or(false)
    })
}

/// Needs some text to judge: an empty letter does not earn the tone points.
pub fn is_respectful(combined: &str) -> bool {
    word_count(combined) > 0 && !disrespect_re().is_match(combined)
}

/// Scores a draft with the standard length window.
pub fn score_draft(draft: &LetterDraft) -> CoachResult {
    score_draft_with(draft, &RubricConfig::default())
}

pub fn score_draft_with(draft: &LetterDraft, config: &RubricConfig) -> CoachResult {
    let combined = draft.combined_text();
    let total_words = word_count(&combined);
    let within_length = (config.min_words..=config.max_words).contains(&total_words);

    let items = vec![
        item(
            RubricKey::NewsRef,
            "Reference a recent news item",
            has_news_hook(&draft.news_ref),
            0.15,
            "Name the article and its date so editors know what you are responding to.",
        ),
        item(
            RubricKey::Problem,
            "Relate it to climate without doom",
            has_problem(&draft.problem),
            0.15,
            "Add a concrete, local detail (a bill amount, a child's asthma, a commute).",
        ),
        item(
            RubricKey::Solution,
            "Identify one solution",
            has_single_solution(&draft.solution),
            0.20,
            "Stick to one policy idea; save the rest for a future letter.",
        ),
        item(
            RubricKey::Ask,
            "Single clear ask",
            has_clear_ask(&draft.ask),
            0.20,
            "Name the decision-maker and one action, e.g. \"Please support ___\".",
        ),
        item(
            RubricKey::Close,
            "Close the circle",
            has_close_or_local(&draft.close, draft.region.as_ref(), &combined),
            0.10,
            "Tie the ending back to your opening or name your community.",
        ),
        RubricItem {
            key: RubricKey::Length,
            label: "Within the outlet's word window",
            pass: within_length,
            note: format!(
                "Currently {total_words} words; aim for {}–{}.",
                config.min_words, config.max_words
            ),
            weight: 0.10,
        },
        item(
            RubricKey::Tone,
            "Respectful tone",
            is_respectful(&combined),
            0.10,
            "Swap blaming words for respectful phrasing; it raises publish chances.",
        ),
    ];

    let earned: f64 = items.iter().filter(|i| i.pass).map(|i| i.weight).sum();
    let score = ((earned * 100.0).round() as u32).min(100);

    let suggestions = items
        .iter()
        .filter(|i| !i.pass)
        .map(|i| i.note.clone())
        .collect();

    CoachResult {
        score,
        items,
        suggestions,
    }
}

fn item(key: RubricKey, label: &'static str, pass: bool, weight: f64, note: &str) -> RubricItem {
    RubricItem {
        key,
        label,
        pass,
        note: note.to_string(),
        weight,
    }
}
