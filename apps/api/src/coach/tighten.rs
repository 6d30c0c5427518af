//! Word-budget tightening that respects paragraph boundaries.

use std::sync::OnceLock;

use regex::Regex;

fn paragraph_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n[ \t\r]*\n\s*").expect("paragraph break pattern is valid"))
}

/// Whitespace-separated word count, the unit the budget is measured in.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Truncates `text` to at most `limit` words.
///
/// Text already within budget is returned unchanged. Otherwise paragraphs
/// (blank-line separated) are kept whole while they fit; the first paragraph
/// that does not fit is cut to the remaining budget and everything after it
/// is dropped. Kept paragraphs are rejoined with a single blank line.
pub fn tighten_to_word_limit(text: &str, limit: usize) -> String {
    if count_words(text) <= limit {
        return text.to_string();
    }

    let mut remaining = limit;
    let mut kept: Vec<String> = Vec::new();

    for paragraph in paragraph_break_re()
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        if remaining == 0 {
            break;
        }
        let words = count_words(paragraph);
        if words <= remaining {
            kept.push(paragraph.to_string());
            remaining -= words;
        } else {
            let cut: Vec<&str> = paragraph.split_whitespace().take(remaining).collect();
            kept.push(cut.join(" "));
            break;
        }
    }

    kept.join("\n\n")
}
