use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use coach_api::config::{Config, LlmProvider};
use coach_api::llm_client::{AnthropicClient, LlmClient, OpenAiClient};
use coach_api::routes::build_router;
use coach_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting LTE coach API v{}", env!("CARGO_PKG_VERSION"));

    let llm = build_llm_client(&config)?;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(20))
        .build()
        .context("Failed to build article fetch client")?;

    info!(
        "Rubric length window: {}–{} words; dedup threshold {:.2}",
        config.rubric.min_words, config.rubric.max_words, config.similarity_threshold
    );

    let state = AppState::new(config.clone(), llm, http);

    let app = build_router(state)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the PWA has a fixed domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs the configured LLM backend, or `None` when no key is set.
fn build_llm_client(config: &Config) -> Result<Option<Arc<dyn LlmClient>>> {
    let client: Arc<dyn LlmClient> = match (
        config.llm_provider,
        &config.openai_api_key,
        &config.anthropic_api_key,
    ) {
        (Some(LlmProvider::OpenAi), Some(key), _) => Arc::new(
            OpenAiClient::new(key.clone()).context("Failed to build OpenAI client")?,
        ),
        (Some(LlmProvider::Anthropic), _, Some(key)) => Arc::new(
            AnthropicClient::new(key.clone()).context("Failed to build Anthropic client")?,
        ),
        _ => {
            warn!("No LLM provider configured; outline and polish will return 503");
            return Ok(None);
        }
    };

    info!("LLM client initialized (provider: {})", client.provider());
    Ok(Some(client))
}
