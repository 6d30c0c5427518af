use std::sync::Arc;

use crate::coach::dedup::DedupConfig;
use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no provider key is configured; LLM routes then answer 503.
    pub llm: Option<Arc<dyn LlmClient>>,
    /// Plain HTTP client for fetching reference articles.
    pub http: reqwest::Client,
    pub config: Config,
    pub dedup: DedupConfig,
}

impl AppState {
    pub fn new(config: Config, llm: Option<Arc<dyn LlmClient>>, http: reqwest::Client) -> Self {
        let dedup = DedupConfig::with_threshold(config.similarity_threshold);
        Self {
            llm,
            http,
            config,
            dedup,
        }
    }

    /// The configured LLM, or `ProviderUnavailable` so handlers fail before doing any work.
    pub fn llm(&self) -> Result<&dyn LlmClient, AppError> {
        self.llm.as_deref().ok_or(AppError::ProviderUnavailable)
    }
}
