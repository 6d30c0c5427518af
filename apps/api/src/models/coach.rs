use serde::Serialize;

/// Stable identifier for each rubric criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RubricKey {
    NewsRef,
    Problem,
    Solution,
    Ask,
    Close,
    Length,
    Tone,
}

/// One evaluated criterion. `weight` values across a rubric sum to 1.0.
#[derive(Debug, Clone, Serialize)]
pub struct RubricItem {
    pub key: RubricKey,
    pub label: &'static str,
    pub pass: bool,
    pub note: String,
    pub weight: f64,
}

/// Output of local scoring: 0–100 score, every item, and notes for failing items.
#[derive(Debug, Clone, Serialize)]
pub struct CoachResult {
    pub score: u32,
    pub items: Vec<RubricItem>,
    pub suggestions: Vec<String>,
}
