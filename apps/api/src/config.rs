use anyhow::{bail, Context, Result};

use crate::coach::dedup::DEFAULT_SIMILARITY_THRESHOLD;
use crate::coach::rubric::RubricConfig;

/// Which LLM backend to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Anthropic,
}

/// Application configuration loaded from environment variables.
/// Missing LLM keys are allowed: the service starts and LLM routes answer 503.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    /// Resolved provider, `None` when no usable key is configured.
    pub llm_provider: Option<LlmProvider>,
    pub request_timeout_secs: u64,
    pub similarity_threshold: f64,
    pub rubric: RubricConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` delegates here.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai_api_key = non_empty("OPENAI_API_KEY");
        let anthropic_api_key = non_empty("ANTHROPIC_API_KEY");

        let llm_provider = match non_empty("LLM_PROVIDER").as_deref() {
            Some("openai") => {
                if openai_api_key.is_none() {
                    bail!("LLM_PROVIDER=openai but OPENAI_API_KEY is not set");
                }
                Some(LlmProvider::OpenAi)
            }
            Some("anthropic") => {
                if anthropic_api_key.is_none() {
                    bail!("LLM_PROVIDER=anthropic but ANTHROPIC_API_KEY is not set");
                }
                Some(LlmProvider::Anthropic)
            }
            Some(other) => bail!("LLM_PROVIDER must be 'openai' or 'anthropic', got '{other}'"),
            None if openai_api_key.is_some() => Some(LlmProvider::OpenAi),
            None if anthropic_api_key.is_some() => Some(LlmProvider::Anthropic),
            None => None,
        };

        let similarity_threshold = match non_empty("DEDUP_SIMILARITY_THRESHOLD") {
            Some(raw) => {
                let value = raw
                    .parse::<f64>()
                    .context("DEDUP_SIMILARITY_THRESHOLD must be a number")?;
                if !(value > 0.0 && value <= 1.0) {
                    bail!("DEDUP_SIMILARITY_THRESHOLD must be in (0, 1], got {value}");
                }
                value
            }
            None => DEFAULT_SIMILARITY_THRESHOLD,
        };

        let rubric = match non_empty("RUBRIC_LENGTH_VARIANT").as_deref() {
            None | Some("standard") => RubricConfig::standard(),
            Some("compact") => RubricConfig::compact(),
            Some(other) => {
                bail!("RUBRIC_LENGTH_VARIANT must be 'standard' or 'compact', got '{other}'")
            }
        };

        Ok(Config {
            port: non_empty("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: non_empty("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            openai_api_key,
            anthropic_api_key,
            llm_provider,
            request_timeout_secs: non_empty("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|| "150".to_string())
                .parse::<u64>()
                .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            similarity_threshold,
            rubric,
        })
    }
}
