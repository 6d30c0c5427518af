//! The canonical letter-to-the-editor draft, plus the mapping from older client shapes.
//!
//! Canonical shape is the five-part CCL formula: news reference, problem,
//! solution, ask, close. Older clients sent `hook`/`personal`/`body` and a
//! free-form `region` string; those are accepted through serde aliases and
//! `RegionRepr` so every revision deserializes into the same struct.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A draft as submitted by the writer. Never stored; lives for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterDraft {
    #[serde(
        default,
        alias = "newsRef",
        alias = "hook",
        deserialize_with = "lenient_text"
    )]
    pub news_ref: String,
    #[serde(default, alias = "personal", deserialize_with = "lenient_text")]
    pub problem: String,
    #[serde(default, alias = "body", deserialize_with = "lenient_text")]
    pub solution: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub ask: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub close: String,
    #[serde(default)]
    pub region: Option<Region>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RegionRepr")]
pub struct Region {
    pub city: String,
    pub state: String,
}

/// Wire forms a region has taken: `{city, state}` or `"Denver, CO"`.
/// Anything else collapses to an empty region.
#[derive(Deserialize)]
#[serde(untagged)]
enum RegionRepr {
    Structured {
        #[serde(default, deserialize_with = "lenient_text")]
        city: String,
        #[serde(default, deserialize_with = "lenient_text")]
        state: String,
    },
    Freeform(String),
    Other(IgnoredAny),
}

impl From<RegionRepr> for Region {
    fn from(repr: RegionRepr) -> Self {
        match repr {
            RegionRepr::Structured { city, state } => Region {
                city: city.trim().to_string(),
                state: state.trim().to_string(),
            },
            RegionRepr::Freeform(text) => {
                let (city, state) = text.split_once(',').unwrap_or((text.as_str(), ""));
                Region {
                    city: city.trim().to_string(),
                    state: state.trim().to_string(),
                }
            }
            RegionRepr::Other(_) => Region::default(),
        }
    }
}

impl Region {
    /// Non-empty place names, city first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        [self.city.as_str(), self.state.as_str()]
            .into_iter()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

impl LetterDraft {
    /// The five formula parts in reading order.
    pub fn parts(&self) -> [&str; 5] {
        [
            &self.news_ref,
            &self.problem,
            &self.solution,
            &self.ask,
            &self.close,
        ]
    }

    /// Every part joined by a single space, for whole-letter checks.
    pub fn combined_text(&self) -> String {
        self.parts().join(" ")
    }

    /// The letter as it would be submitted: non-empty parts separated by a blank line.
    pub fn assemble(&self) -> String {
        self.parts()
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Accepts a string, number or bool as text; null and anything else become "".
pub fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_shape_deserializes() {
        let json = r#"{
            "news_ref": "Your March 3, 2025 article",
            "problem": "Heat waves",
            "solution": "Carbon fee",
            "ask": "Please support it",
            "close": "Thanks",
            "region": {"city": "Denver", "state": "CO"}
        }"#;
        let draft: LetterDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.news_ref, "Your March 3, 2025 article");
        assert_eq!(draft.region.unwrap().city, "Denver");
    }

    #[test]
    fn test_legacy_hook_personal_body_shape_maps() {
        let json = r#"{
            "hook": "Re: today's editorial",
            "personal": "My kid has asthma",
            "body": "A carbon fee",
            "ask": "Vote yes"
        }"#;
        let draft: LetterDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.news_ref, "Re: today's editorial");
        assert_eq!(draft.problem, "My kid has asthma");
        assert_eq!(draft.solution, "A carbon fee");
        assert_eq!(draft.close, "");
    }

    #[test]
    fn test_camel_case_news_ref_alias() {
        let draft: LetterDraft = serde_json::from_str(r#"{"newsRef": "x"}"#).unwrap();
        assert_eq!(draft.news_ref, "x");
    }

    #[test]
    fn test_nulls_and_non_strings_coerced() {
        let json = r#"{"news_ref": null, "problem": 42, "ask": true, "close": ["x"]}"#;
        let draft: LetterDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.news_ref, "");
        assert_eq!(draft.problem, "42");
        assert_eq!(draft.ask, "true");
        assert_eq!(draft.close, "");
    }

    #[test]
    fn test_empty_object_is_empty_draft() {
        let draft: LetterDraft = serde_json::from_str("{}").unwrap();
        assert_eq!(draft, LetterDraft::default());
    }

    #[test]
    fn test_freeform_region_string() {
        let draft: LetterDraft = serde_json::from_str(r#"{"region": "Denver, CO"}"#).unwrap();
        let region = draft.region.unwrap();
        assert_eq!(region.city, "Denver");
        assert_eq!(region.state, "CO");
    }

    #[test]
    fn test_junk_region_becomes_empty() {
        let draft: LetterDraft = serde_json::from_str(r#"{"region": 7}"#).unwrap();
        assert_eq!(draft.region.unwrap(), Region::default());
        let draft: LetterDraft = serde_json::from_str(r#"{"region": true, "ask": "Vote."}"#).unwrap();
        assert_eq!(draft.region.unwrap(), Region::default());
        assert_eq!(draft.ask, "Vote.");
    }

    #[test]
    fn test_region_names_skip_empty_parts() {
        let region = Region {
            city: "  ".to_string(),
            state: "Ohio".to_string(),
        };
        assert_eq!(region.names().collect::<Vec<_>>(), vec!["Ohio"]);
    }

    #[test]
    fn test_assemble_skips_blank_parts() {
        let draft = LetterDraft {
            news_ref: "Hook.".to_string(),
            problem: "  ".to_string(),
            solution: "Fix.".to_string(),
            ask: "Ask.".to_string(),
            close: String::new(),
            region: None,
        };
        assert_eq!(draft.assemble(), "Hook.\n\nFix.\n\nAsk.");
    }
}
