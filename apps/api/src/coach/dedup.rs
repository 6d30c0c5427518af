//! Outline bullet cleanup: drops blanks, "Personal:" labels, exact repeats and
//! near-duplicates of either the writer's own anecdote or an earlier bullet.
//!
//! Similarity is Jaccard over a stopword-filtered token set, capped at the
//! first few significant tokens so long bullets compare on their lead.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

/// Similarity at or above which two texts count as the same idea. Tuned empirically.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.68;

/// Default cap on bullets returned to the outline.
pub const DEFAULT_MAX_BULLETS: usize = 8;

/// Significant tokens considered per text.
pub const DEFAULT_MAX_TOKENS: usize = 14;

/// Words ignored when building similarity token sets.
pub const STOPWORDS: &[&str] = &[
    "a", "an", "and", "the", "of", "in", "on", "to", "for", "with", "as", "i", "am", "we", "our",
    "us", "is", "are", "be", "can", "will", "that", "this", "there", "it", "but", "from", "by",
    "at", "into", "about", "over", "not", "only", "also",
];

#[derive(Debug, Clone)]
pub struct DedupConfig {
    pub threshold: f64,
    pub max_tokens: usize,
    pub stopwords: &'static [&'static str],
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_tokens: DEFAULT_MAX_TOKENS,
            stopwords: STOPWORDS,
        }
    }
}

impl DedupConfig {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }
}

fn personal_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*personal\s*:\s*").expect("label pattern is valid"))
}

/// Strips any leading "Personal:" labels and collapses whitespace.
/// Returns `None` when nothing is left.
pub fn clean_bullet(raw: &str) -> Option<String> {
    let mut text = raw;
    while let Some(m) = personal_label_re().find(text) {
        text = &text[m.end()..];
    }
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

/// Lowercased words with every non letter/digit character treated as a separator.
fn normalized_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// Punctuation- and case-insensitive identity of a bullet.
pub fn normalized_key(text: &str) -> String {
    normalized_words(text).collect::<Vec<_>>().join(" ")
}

/// Significant tokens of `text`: stopwords removed, first `max_tokens` kept.
pub fn similarity_tokens(text: &str, config: &DedupConfig) -> HashSet<String> {
    normalized_words(text)
        .filter(|w| !config.stopwords.contains(&w.as_str()))
        .take(config.max_tokens)
        .collect()
}

/// |A ∩ B| / |A ∪ B|. Zero when either side has no tokens, so bullets made only
/// of stopwords never match anything by similarity alone.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Cleans `candidates` in order with the default thresholds.
pub fn dedupe_bullets<S: AsRef<str>>(reference: &str, candidates: &[S], max: usize) -> Vec<String> {
    dedupe_bullets_with(reference, candidates, max, &DedupConfig::default())
}

/// Returns at most `max` cleaned bullets, in first-accepted order, such that none
/// repeats another (by normalized key) and none is at or above `config.threshold`
/// similarity to `reference` or to an earlier accepted bullet.
pub fn dedupe_bullets_with<S: AsRef<str>>(
    reference: &str,
    candidates: &[S],
    max: usize,
    config: &DedupConfig,
) -> Vec<String> {
    let reference_tokens = similarity_tokens(reference, config);

    let mut accepted: Vec<String> = Vec::new();
    let mut accepted_tokens: Vec<HashSet<String>> = Vec::new();
    let mut seen_keys: HashSet<String> = HashSet::new();
    let mut near_reference = 0usize;
    let mut near_duplicate = 0usize;

    for raw in candidates {
        if accepted.len() >= max {
            break;
        }

        let Some(bullet) = clean_bullet(raw.as_ref()) else {
            continue;
        };

        let key = normalized_key(&bullet);
        if key.is_empty() || seen_keys.contains(&key) {
            near_duplicate += 1;
            continue;
        }

        let tokens = similarity_tokens(&bullet, config);

        if jaccard(&tokens, &reference_tokens) >= config.threshold {
            near_reference += 1;
            continue;
        }

        if accepted_tokens
            .iter()
            .any(|prev| jaccard(&tokens, prev) >= config.threshold)
        {
            near_duplicate += 1;
            continue;
        }

        seen_keys.insert(key);
        accepted_tokens.push(tokens);
        accepted.push(bullet);
    }

    debug!(
        "Bullet dedup: kept {} of {} (near personal: {}, duplicates: {}, threshold: {:.2})",
        accepted.len(),
        candidates.len(),
        near_reference,
        near_duplicate,
        config.threshold
    );

    accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> HashSet<String> {
        similarity_tokens(text, &DedupConfig::default())
    }

    #[test]
    fn test_punctuation_only_difference_is_duplicate() {
        let out = dedupe_bullets(
            "",
            &["Clean energy creates local jobs.", "Clean energy creates local jobs!"],
            8,
        );
        assert_eq!(out, vec!["Clean energy creates local jobs."]);
    }

    #[test]
    fn test_blank_and_label_only_candidates_dropped() {
        let out = dedupe_bullets("", &["", "   ", "Personal:", "\n\t", "!!!"], 8);
        assert!(out.is_empty());
    }

    #[test]
    fn test_personal_label_stripped_and_whitespace_collapsed() {
        let out = dedupe_bullets(
            "",
            &["Personal:   Heat pumps   cut\nwinter bills", "PERSONAL: personal: Trees shade streets"],
            8,
        );
        assert_eq!(out, vec!["Heat pumps cut winter bills", "Trees shade streets"]);
    }

    #[test]
    fn test_reference_itself_is_rejected() {
        let reference = "As a bus driver in Tulsa I breathe diesel fumes every shift";
        let out = dedupe_bullets(
            reference,
            &[reference, "Electric buses would clean the air at depots"],
            8,
        );
        assert_eq!(out, vec!["Electric buses would clean the air at depots"]);
    }

    #[test]
    fn test_close_restatement_of_reference_rejected() {
        let reference = "As a teacher in Denver, I worry about my students' asthma";
        let candidate = "As a teacher in Denver, I worry about my students' asthma attacks.";
        // 6 shared tokens out of 7
        assert!(jaccard(&tokens(reference), &tokens(candidate)) > 0.85);
        assert!(dedupe_bullets(reference, &[candidate], 8).is_empty());
    }

    #[test]
    fn test_paraphrase_with_different_vocabulary_is_kept() {
        // Only "denver" and "asthma" survive on both sides: 2 / 10.
        let reference = "As a teacher in Denver, I worry about my students' asthma";
        let candidate = "As an educator in Denver, I'm concerned about kids' asthma,";
        let sim = jaccard(&tokens(reference), &tokens(candidate));
        assert!((sim - 0.2).abs() < 1e-9, "similarity was {sim}");
        assert_eq!(dedupe_bullets(reference, &[candidate], 8).len(), 1);
    }

    #[test]
    fn test_stopwords_removed_from_tokens() {
        let t = tokens("We can do this for our town and the state");
        let expected: HashSet<String> = ["do", "town", "state"].iter().map(|s| s.to_string()).collect();
        assert_eq!(t, expected);
    }

    #[test]
    fn test_token_cap_compares_on_lead() {
        let lead = "solar wind hydro geothermal storage transmission batteries heat pumps \
                    insulation forests wetlands farms rail";
        let a = format!("{lead} nuclear");
        let b = format!("{lead} buses trams ferries bikes");
        assert_eq!(tokens(&a).len(), 14);
        assert_eq!(tokens(&a), tokens(&b));
        let out = dedupe_bullets("", &[a.as_str(), b.as_str()], 8);
        assert_eq!(out, vec![a]);
    }

    #[test]
    fn test_just_below_default_threshold_kept() {
        // 2 / 3 ≈ 0.667
        let out = dedupe_bullets("", &["Heat pumps", "Heat pumps save"], 8);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_just_above_default_threshold_rejected() {
        // 7 / 10 = 0.70
        let first = "Carbon fees return dividends protecting working families";
        let second = "Carbon fees return dividends protecting working families across Colorado towns";
        let out = dedupe_bullets("", &[first, second], 8);
        assert_eq!(out, vec![first]);
    }

    #[test]
    fn test_similarity_exactly_at_threshold_is_rejected() {
        // 3 / 4 = 0.75 exactly
        let candidates = ["Solar wind hydro", "Solar wind hydro storage"];
        let strict = dedupe_bullets_with("", &candidates, 8, &DedupConfig::with_threshold(0.75));
        assert_eq!(strict, vec!["Solar wind hydro"]);
        let loose = dedupe_bullets_with("", &candidates, 8, &DedupConfig::with_threshold(0.76));
        assert_eq!(loose.len(), 2);
    }

    #[test]
    fn test_stopword_only_bullets_are_not_blanket_rejected() {
        let out = dedupe_bullets("It is.", &["It is.", "We can.", "It is!"], 8);
        // No significant tokens anywhere: similarity is 0, only the exact repeat goes.
        assert_eq!(out, vec!["It is.", "We can."]);
    }

    #[test]
    fn test_empty_sets_have_zero_similarity() {
        let empty = HashSet::new();
        assert_eq!(jaccard(&empty, &empty), 0.0);
        assert_eq!(jaccard(&tokens("solar"), &empty), 0.0);
    }

    #[test]
    fn test_max_respected_and_order_preserved() {
        let candidates = [
            "Solar panels on schools",
            "Transit passes for students",
            "Urban tree canopy grants",
            "Weatherizing rental homes",
        ];
        let out = dedupe_bullets("", &candidates, 2);
        assert_eq!(out, vec!["Solar panels on schools", "Transit passes for students"]);
        assert!(dedupe_bullets("", &candidates, 0).is_empty());
    }

    #[test]
    fn test_output_never_longer_than_input() {
        let candidates = ["a b c", "", "d e f", "d e f"];
        let out = dedupe_bullets("", &candidates, 8);
        assert!(out.len() <= candidates.len());
        assert_eq!(out, vec!["a b c", "d e f"]);
    }

    #[test]
    fn test_idempotent() {
        let reference = "As a nurse in Phoenix I treat heat stroke every summer";
        let candidates = [
            "Personal: As a nurse in Phoenix I treat heat stroke every summer",
            "  Extreme heat   sends more Arizonans to the ER each year ",
            "Extreme heat sends more Arizonans to the ER each year.",
            "Cooling centers need reliable, affordable power",
            "",
            "A carbon fee and dividend protects family budgets",
            "Carbon fee and dividend protects family budgets!",
            "Shade trees lower neighborhood temperatures",
        ];
        let once = dedupe_bullets(reference, &candidates, 8);
        let twice = dedupe_bullets(reference, &once, 8);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 4);
    }

    #[test]
    fn test_unicode_letters_kept_in_tokens() {
        let t = tokens("Énergie propre à Montréal");
        assert!(t.contains("énergie"));
        assert!(t.contains("montréal"));
    }
}
