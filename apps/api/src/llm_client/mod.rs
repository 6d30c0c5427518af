/// LLM Client: the single point of entry for all model calls in the coach API.
///
/// ARCHITECTURAL RULE: No handler talks to a provider API directly.
/// Handlers receive an injected `Arc<dyn LlmClient>` through `AppState`.
///
/// Models are hardcoded per provider to prevent drift between deployments.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::warn;

pub mod anthropic;
pub mod openai;
pub mod prompts;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiClient;

const MAX_RETRIES: u32 = 3;
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Per-call knobs. `system` is the system prompt; `json` asks the provider
/// for a JSON object where it supports a native switch for it.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    pub system: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub json: bool,
}

impl CompletionOptions {
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            temperature: 0.2,
            max_tokens: 2048,
            json: false,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }
}

/// A text-completion capability. One implementation per provider.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Short provider name for logs and the health endpoint.
    fn provider(&self) -> &'static str;

    /// Sends `prompt` as the single user message and returns the text reply.
    async fn complete(&self, prompt: &str, options: &CompletionOptions)
        -> Result<String, LlmError>;
}

/// Calls the LLM and deserializes the text response as JSON.
/// The prompt must instruct the model to return valid JSON.
pub async fn complete_json<T: DeserializeOwned>(
    llm: &dyn LlmClient,
    prompt: &str,
    options: &CompletionOptions,
) -> Result<T, LlmError> {
    let text = llm.complete(prompt, options).await?;

    // Strip markdown code fences if the model wraps JSON in them
    let text = strip_json_fences(&text);

    serde_json::from_str(text).map_err(LlmError::Parse)
}

pub(crate) fn build_http_client() -> Result<reqwest::Client, LlmError> {
    Ok(reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?)
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Sends the request built by `build`, retrying on 429, 5xx and transport errors
/// with exponential backoff (1s, 2s). Other failures return immediately.
/// When every attempt ends in 429 the result is `RateLimited`.
pub(crate) async fn send_with_retry<F>(build: F) -> Result<Response, LlmError>
where
    F: Fn() -> RequestBuilder,
{
    let mut last_error: Option<LlmError> = None;

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
            warn!(
                "LLM call attempt {} failed, retrying after {}ms...",
                attempt,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        let response = match build().send().await {
            Ok(r) => r,
            Err(e) => {
                last_error = Some(LlmError::Http(e));
                continue;
            }
        };

        let status = response.status();

        if status.as_u16() == 429 || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}: {}", status, body);
            last_error = Some(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
            continue;
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        return Ok(response);
    }

    match last_error {
        Some(LlmError::Api { status: 429, .. }) | None => Err(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }),
        Some(err) => Err(err),
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
