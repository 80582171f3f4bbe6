//! Command handlers for the DocQA CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod patterns;
pub mod prompts;
pub mod scan;
pub mod serve;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use patterns::PatternsCommand;
pub use prompts::PromptsCommand;
pub use scan::ScanCommand;
pub use serve::ServeCommand;

use docqa_core::config::{AppConfig, ProviderConfig};
use docqa_core::AppResult;
use docqa_engine::{Pipeline, PlainTextExtractor};
use docqa_llm::{create_client, LlmClient, OllamaClient};
use std::sync::Arc;

/// Create the reasoning-service client for the configured provider.
pub fn build_client(config: &AppConfig) -> AppResult<Arc<dyn LlmClient>> {
    config.validate()?;

    // Ollama may carry a request timeout in config.yaml
    if let Some(ProviderConfig::Ollama {
        endpoint,
        timeout: Some(secs),
        ..
    }) = config.get_provider_config(&config.provider)
    {
        return Ok(Arc::new(OllamaClient::with_timeout(endpoint.as_str(), *secs)?));
    }

    let endpoint = config.resolve_endpoint(&config.provider);
    let api_key = config.resolve_api_key(&config.provider);

    create_client(&config.provider, endpoint.as_deref(), api_key.as_deref())
}

/// Assemble the answer pipeline over plain-text document extraction.
pub fn build_pipeline(config: &AppConfig) -> AppResult<Pipeline> {
    let client = build_client(config)?;
    Pipeline::from_config(config, Arc::new(PlainTextExtractor::new()), client)
}
