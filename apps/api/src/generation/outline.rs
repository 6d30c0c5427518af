//! Outline generation: asks the LLM for a thesis and bullets, then runs the
//! bullets through dedup so nothing repeats the writer's personal perspective.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::coach::dedup::{dedupe_bullets_with, DedupConfig, DEFAULT_MAX_BULLETS};
use crate::errors::AppError;
use crate::generation::briefs::{find_brief, Brief};
use crate::generation::prompts::{render_system, OUTLINE_SYSTEM_TEMPLATE, SUMMARIZE_SYSTEM};
use crate::llm_client::{complete_json, CompletionOptions, LlmClient, LlmError};

const EXTRA_CONTEXT_MAX_CHARS: usize = 4000;
pub const WORD_LIMIT_RANGE: std::ops::RangeInclusive<u32> = 120..=300;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    #[default]
    Editor,
    /// Member of Congress.
    Moc,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutlineRequest {
    pub issue: String,
    pub brief_id: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub audience: Audience,
    #[serde(default)]
    pub article_title: Option<String>,
    #[serde(default)]
    pub article_date: Option<String>,
    #[serde(default)]
    pub outlet: Option<String>,
    pub word_limit: u32,
    pub personal_perspective: String,
    #[serde(default)]
    pub extra_context: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Outline {
    pub thesis: String,
    pub bullets: Vec<String>,
    pub suggested_ask: String,
}

impl OutlineRequest {
    /// Checks field constraints and resolves the brief.
    pub fn validate(&self) -> Result<&'static Brief, AppError> {
        if self.issue.trim().chars().count() < 2 {
            return Err(AppError::Validation(
                "issue must be at least 2 characters".to_string(),
            ));
        }
        if !WORD_LIMIT_RANGE.contains(&self.word_limit) {
            return Err(AppError::Validation(format!(
                "word_limit must be between {} and {}",
                WORD_LIMIT_RANGE.start(),
                WORD_LIMIT_RANGE.end()
            )));
        }
        if self.personal_perspective.trim().chars().count() < 10 {
            return Err(AppError::Validation(
                "personal_perspective must be at least 10 characters".to_string(),
            ));
        }
        find_brief(self.brief_id.trim())
            .ok_or_else(|| AppError::Validation(format!("Unknown brief_id '{}'", self.brief_id)))
    }

    fn location(&self) -> String {
        [self.city.as_deref(), self.state.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn news_reference(&self) -> Option<String> {
        let title = non_blank(self.article_title.as_deref())?;
        let mut line = format!("News ref: \"{title}\"");
        if let Some(date) = non_blank(self.article_date.as_deref()) {
            line.push_str(&format!(" ({})", display_date(date)));
        }
        if let Some(outlet) = non_blank(self.outlet.as_deref()) {
            line.push_str(&format!(" in {outlet}"));
        }
        line.push('.');
        Some(line)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// ISO dates become "March 3, 2025"; anything else is passed through as typed.
pub fn display_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|_| raw.trim().to_string())
}

/// Collapses whitespace and caps the length to keep the summarization prompt small.
pub fn prepare_extra_context(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let capped: String = collapsed.chars().take(EXTRA_CONTEXT_MAX_CHARS).collect();
    let capped = capped.trim_end().to_string();
    (!capped.is_empty()).then_some(capped)
}

/// The user-turn prompt for outline generation. Blank sections are omitted.
pub fn build_outline_prompt(req: &OutlineRequest, brief: &Brief, extra_facts: Option<&str>) -> String {
    let location = req.location();
    let audience = match req.audience {
        Audience::Editor => "Newspaper editor",
        Audience::Moc => "Member of Congress",
    };

    let lines: Vec<String> = vec![
        format!("Topic: {}", req.issue.trim()),
        if location.is_empty() {
            String::new()
        } else {
            format!("Location: {location}")
        },
        req.news_reference().unwrap_or_default(),
        format!("Audience: {audience}"),
        format!(
            "Personal perspective (do NOT restate as a bullet): {}",
            req.personal_perspective.trim()
        ),
        extra_facts
            .map(|facts| format!("Extra context (summarized bullets):\n{facts}"))
            .unwrap_or_default(),
        brief.prompt_block(),
        format!("Word target: {}", req.word_limit),
    ];

    lines
        .into_iter()
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Model bullets as strings: strings kept, numbers/bools stringified, everything else dropped.
pub fn coerce_candidates(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// First usable text under any of `keys`. Null, blank and non-scalar values are skipped.
fn text_field(value: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| match value.get(*k)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

/// Condenses long extra context into short factual notes.
async fn summarize_extra_context(llm: &dyn LlmClient, extra: &str) -> Result<String, LlmError> {
    let options = CompletionOptions::new(SUMMARIZE_SYSTEM).temperature(0.2);
    Ok(llm.complete(extra, &options).await?.trim().to_string())
}

/// Turns a raw model reply into an `Outline`. Never fails: missing or
/// malformed fields become empty values.
pub fn shape_outline(raw: &Value, req: &OutlineRequest, dedup: &DedupConfig) -> Outline {
    let candidates = coerce_candidates(raw.get("bullets").unwrap_or(&Value::Null));
    let bullets = dedupe_bullets_with(
        &req.personal_perspective,
        &candidates,
        DEFAULT_MAX_BULLETS,
        dedup,
    );

    let suggested_ask = match req.audience {
        Audience::Moc => text_field(raw, &["suggestedAsk", "suggested_ask"]),
        Audience::Editor => String::new(),
    };

    Outline {
        thesis: text_field(raw, &["thesis"]),
        bullets,
        suggested_ask,
    }
}

/// Full outline pipeline: optional context summary → outline call → dedup.
pub async fn generate_outline(
    llm: &dyn LlmClient,
    req: &OutlineRequest,
    brief: &Brief,
    dedup: &DedupConfig,
) -> Result<Outline, AppError> {
    let extra_facts = match req.extra_context.as_deref().and_then(prepare_extra_context) {
        Some(extra) => {
            info!("Summarizing {} chars of extra context", extra.chars().count());
            Some(summarize_extra_context(llm, &extra).await?)
        }
        None => None,
    };

    let prompt = build_outline_prompt(
        req,
        brief,
        extra_facts.as_deref().filter(|f| !f.is_empty()),
    );
    let options = CompletionOptions::new(render_system(OUTLINE_SYSTEM_TEMPLATE))
        .temperature(0.3)
        .json();

    info!("Generating outline for brief '{}' via {}", brief.id, llm.provider());

    let raw: Value = match complete_json(llm, &prompt, &options).await {
        Ok(value) => value,
        Err(LlmError::Parse(e)) => {
            warn!("Outline reply was not valid JSON, returning empty outline: {e}");
            Value::Null
        }
        Err(e) => return Err(e.into()),
    };

    Ok(shape_outline(&raw, req, dedup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedLlm;
    use serde_json::json;

    fn request() -> OutlineRequest {
        serde_json::from_value(json!({
            "issue": "Extreme heat",
            "brief_id": "carbon-pricing",
            "city": "Phoenix",
            "state": "AZ",
            "word_limit": 180,
            "personal_perspective": "As a nurse in Phoenix I treat heat stroke every summer"
        }))
        .unwrap()
    }

    #[test]
    fn test_request_defaults() {
        let req = request();
        assert_eq!(req.audience, Audience::Editor);
        assert!(req.extra_context.is_none());
        assert_eq!(req.validate().unwrap().id, "carbon-pricing");
    }

    #[test]
    fn test_validation_failures() {
        let mut req = request();
        req.word_limit = 100;
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));

        let mut req = request();
        req.personal_perspective = "short".to_string();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));

        let mut req = request();
        req.issue = " x ".to_string();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));

        let mut req = request();
        req.brief_id = "unknown".to_string();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_audience_deserializes_lowercase() {
        let audience: Audience = serde_json::from_str(r#""moc""#).unwrap();
        assert_eq!(audience, Audience::Moc);
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2025-03-03"), "March 3, 2025");
        assert_eq!(display_date(" last Tuesday "), "last Tuesday");
    }

    #[test]
    fn test_news_reference_line() {
        let mut req = request();
        assert_eq!(req.news_reference(), None);
        req.article_title = Some("Heat records fall".to_string());
        req.article_date = Some("2025-07-14".to_string());
        req.outlet = Some("The Republic".to_string());
        assert_eq!(
            req.news_reference().unwrap(),
            "News ref: \"Heat records fall\" (July 14, 2025) in The Republic."
        );
    }

    #[test]
    fn test_prompt_omits_blank_sections() {
        let mut req = request();
        req.city = None;
        req.state = Some("  ".to_string());
        let brief = req.validate().unwrap();
        let prompt = build_outline_prompt(&req, brief, None);
        assert!(prompt.starts_with("Topic: Extreme heat\nAudience: Newspaper editor\n"));
        assert!(!prompt.contains("Location"));
        assert!(!prompt.contains("News ref"));
        assert!(!prompt.contains("Extra context"));
        assert!(prompt.ends_with("Word target: 180"));
    }

    #[test]
    fn test_prompt_includes_location_and_facts() {
        let req = request();
        let brief = req.validate().unwrap();
        let prompt = build_outline_prompt(&req, brief, Some("- fact one"));
        assert!(prompt.contains("Location: Phoenix, AZ"));
        assert!(prompt.contains("Extra context (summarized bullets):\n- fact one"));
        assert!(prompt.contains("Brief: Pricing Pollution"));
    }

    #[test]
    fn test_prepare_extra_context() {
        assert_eq!(prepare_extra_context("   \n "), None);
        assert_eq!(
            prepare_extra_context("a\n\n b\tc").as_deref(),
            Some("a b c")
        );
        let long = "word ".repeat(2000);
        assert_eq!(prepare_extra_context(&long).unwrap().chars().count(), 3999);
    }

    #[test]
    fn test_text_field_skips_null_and_blank_keys() {
        let raw = json!({"suggestedAsk": null, "suggested_ask": "Support the bill."});
        assert_eq!(
            text_field(&raw, &["suggestedAsk", "suggested_ask"]),
            "Support the bill."
        );
        let raw = json!({"suggestedAsk": "  ", "suggested_ask": ["x"]});
        assert_eq!(text_field(&raw, &["suggestedAsk", "suggested_ask"]), "");
        assert_eq!(text_field(&json!({"thesis": 2030}), &["thesis"]), "2030");
    }

    #[test]
    fn test_coerce_candidates() {
        let value = json!(["one", null, 2, true, {"text": "x"}, ["y"], ""]);
        assert_eq!(coerce_candidates(&value), vec!["one", "2", "true", ""]);
        assert!(coerce_candidates(&json!("not a list")).is_empty());
        assert!(coerce_candidates(&Value::Null).is_empty());
    }

    #[test]
    fn test_shape_outline_filters_personal_restatement() {
        let req = request();
        let raw = json!({
            "thesis": "  Pricing carbon protects Phoenix health. ",
            "bullets": [
                "Personal: As a nurse in Phoenix I treat heat stroke every summer",
                "Extreme heat sends more Arizonans to the ER each year",
                "Extreme heat sends more Arizonans to the ER each year!",
                "A carbon fee with dividends shields family budgets"
            ],
            "suggestedAsk": "Support the bill"
        });
        let outline = shape_outline(&raw, &req, &DedupConfig::default());
        assert_eq!(outline.thesis, "Pricing carbon protects Phoenix health.");
        assert_eq!(
            outline.bullets,
            vec![
                "Extreme heat sends more Arizonans to the ER each year",
                "A carbon fee with dividends shields family budgets"
            ]
        );
        assert_eq!(outline.suggested_ask, "", "editor audience gets no ask");
    }

    #[test]
    fn test_shape_outline_moc_keeps_ask() {
        let mut req = request();
        req.audience = Audience::Moc;
        let outline = shape_outline(
            &json!({"suggestedAsk": "Please cosponsor HR 1"}),
            &req,
            &DedupConfig::default(),
        );
        assert_eq!(outline.suggested_ask, "Please cosponsor HR 1");
        assert!(outline.bullets.is_empty());
    }

    #[test]
    fn test_shape_outline_caps_at_eight() {
        let req = request();
        let bullets: Vec<String> = (0..12)
            .map(|i| format!("Distinct point number {i} about topic{i}"))
            .collect();
        let outline = shape_outline(&json!({ "bullets": bullets }), &req, &DedupConfig::default());
        assert_eq!(outline.bullets.len(), 8);
    }

    #[tokio::test]
    async fn test_generate_outline_without_extra_context_makes_one_call() {
        let llm = ScriptedLlm::new(vec![r#"{"thesis": "T", "bullets": ["Heat pumps cut bills"]}"#]);
        let req = request();
        let brief = req.validate().unwrap();
        let outline = generate_outline(&llm, &req, brief, &DedupConfig::default())
            .await
            .unwrap();
        assert_eq!(outline.thesis, "T");
        assert_eq!(outline.bullets, vec!["Heat pumps cut bills"]);
        assert_eq!(llm.calls(), 1);
        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].1.json);
        assert!((prompts[0].1.temperature - 0.3).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_generate_outline_summarizes_extra_context_first() {
        let llm = ScriptedLlm::new(vec![
            "- Phoenix hit 118F in July",
            r#"{"thesis": "T", "bullets": []}"#,
        ]);
        let mut req = request();
        req.extra_context = Some("Long   article\n\ntext".to_string());
        let brief = req.validate().unwrap();
        generate_outline(&llm, &req, brief, &DedupConfig::default())
            .await
            .unwrap();
        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0].0, "Long article text");
        assert!(prompts[1].0.contains("- Phoenix hit 118F in July"));
    }

    #[tokio::test]
    async fn test_generate_outline_tolerates_non_json_reply() {
        let llm = ScriptedLlm::new(vec!["Sorry, here are some ideas..."]);
        let req = request();
        let brief = req.validate().unwrap();
        let outline = generate_outline(&llm, &req, brief, &DedupConfig::default())
            .await
            .unwrap();
        assert!(outline.thesis.is_empty());
        assert!(outline.bullets.is_empty());
    }

    #[tokio::test]
    async fn test_generate_outline_propagates_provider_errors() {
        let llm = ScriptedLlm::failing();
        let req = request();
        let brief = req.validate().unwrap();
        let result = generate_outline(&llm, &req, brief, &DedupConfig::default()).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
