//! Reference article fetching: pulls a news page and reduces it to plain
//! text the writer can paste into `extra_context`.

pub mod handlers;

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use reqwest::{header, Url};
use scraper::{Html, Selector};
use thiserror::Error;
use tracing::debug;

const USER_AGENT: &str = "climate-writer/1.0";
pub const MAX_URL_CHARS: usize = 1000;
pub const MAX_TEXT_CHARS: usize = 12_000;
/// Bytes read from an upstream body before the rest is abandoned.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("PDF content is not supported")]
    Pdf,

    #[error("unsupported content type: {0}")]
    Unsupported(String),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleText {
    pub text: String,
    pub truncated: bool,
}

/// Parses and checks a user-supplied URL: http(s) only, bounded length.
pub fn parse_article_url(raw: &str) -> Result<Url, ArticleError> {
    let raw = raw.trim();
    if raw.is_empty() || raw.chars().count() > MAX_URL_CHARS {
        return Err(ArticleError::InvalidUrl(format!(
            "url must be 1–{MAX_URL_CHARS} characters"
        )));
    }
    let url = Url::parse(raw).map_err(|e| ArticleError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ArticleError::InvalidUrl(format!(
            "unsupported scheme '{other}'"
        ))),
    }
}

fn looks_like_html_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</?\w+").expect("html sniff pattern is valid"))
}

/// Elements whose text never reaches the reader.
const HIDDEN_ELEMENTS: &str = "script, style, noscript, template";

/// Collects the document's visible text nodes, separated by spaces.
/// Entities are decoded by the parser; comments never surface as text.
fn html_to_text(body: &str) -> String {
    let document = Html::parse_document(body);
    let hidden_selector =
        Selector::parse(HIDDEN_ELEMENTS).expect("hidden element selector is valid");
    let hidden: HashSet<_> = document.select(&hidden_selector).map(|el| el.id()).collect();

    let mut parts: Vec<&str> = Vec::new();
    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        if node.ancestors().any(|ancestor| hidden.contains(&ancestor.id())) {
            continue;
        }
        parts.push(text);
    }
    parts.join(" ")
}

/// Reduces a response body to collapsed plain text, capped at `MAX_TEXT_CHARS`.
pub fn extract_text(body: &str, is_html: bool) -> ArticleText {
    let stripped = if is_html || looks_like_html_re().is_match(body) {
        html_to_text(body)
    } else {
        body.to_string()
    };

    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated = collapsed.chars().count() > MAX_TEXT_CHARS;
    let text = if truncated {
        collapsed.chars().take(MAX_TEXT_CHARS).collect()
    } else {
        collapsed
    };

    ArticleText { text, truncated }
}

/// Content types worth reading as text. Everything else is refused.
fn is_readable(content_type: &str) -> bool {
    ["text", "html", "markdown"]
        .iter()
        .any(|kind| content_type.contains(kind))
}

/// Decodes bytes as UTF-8, dropping a multi-byte sequence cut off at the end.
fn decode_prefix(mut bytes: Vec<u8>) -> String {
    if let Err(e) = std::str::from_utf8(&bytes) {
        if e.error_len().is_none() {
            bytes.truncate(e.valid_up_to());
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Reads at most `cap` bytes of the body. The flag is set when more was on offer.
async fn read_capped(
    mut response: reqwest::Response,
    cap: usize,
) -> Result<(String, bool), ArticleError> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > cap {
            body.extend_from_slice(&chunk[..cap - body.len()]);
            return Ok((decode_prefix(body), true));
        }
        body.extend_from_slice(&chunk);
    }
    Ok((decode_prefix(body), false))
}

pub async fn fetch_article(http: &reqwest::Client, url: Url) -> Result<ArticleText, ArticleError> {
    let response = http
        .get(url.clone())
        .header(header::USER_AGENT, USER_AGENT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ArticleError::Status(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.contains("application/pdf") {
        return Err(ArticleError::Pdf);
    }
    if !is_readable(&content_type) {
        return Err(ArticleError::Unsupported(if content_type.is_empty() {
            "unknown".to_string()
        } else {
            content_type
        }));
    }

    let (body, body_capped) = read_capped(response, MAX_BODY_BYTES).await?;
    let mut article = extract_text(&body, content_type.contains("html"));
    article.truncated |= body_capped;

    debug!(
        "Fetched {url}: {} chars of text (truncated: {}, body capped: {body_capped})",
        article.text.chars().count(),
        article.truncated
    );

    Ok(article)
}
