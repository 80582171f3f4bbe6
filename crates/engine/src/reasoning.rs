//! Narrow access to the reasoning service.

use docqa_core::{AppError, AppResult};
use docqa_llm::{LlmClient, LlmRequest};
use docqa_prompt::BuiltPrompt;
use std::sync::Arc;

/// Default token ceiling for each reasoning call.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Submits rendered instructions to an injected [`LlmClient`].
#[derive(Clone)]
pub struct Reasoner {
    client: Arc<dyn LlmClient>,
    model: String,
    max_tokens: u32,
}

impl Reasoner {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    /// Send one system + user instruction pair and return the reply text.
    ///
    /// Provider and transport failures are returned unchanged.
    pub async fn submit(&self, system: &str, user: &str, temperature: f32) -> AppResult<String> {
        if !(0.0..=1.0).contains(&temperature) {
            return Err(AppError::Pipeline(format!(
                "Temperature {} is outside [0, 1]",
                temperature
            )));
        }

        let request = LlmRequest::new(user, &self.model)
            .with_system(system)
            .with_temperature(temperature)
            .with_max_tokens(self.max_tokens);

        tracing::debug!(
            "Submitting to {} (model: {}, temperature: {:.1}, {} chars)",
            self.client.provider_name(),
            self.model,
            temperature,
            user.len()
        );

        let response = self.client.complete(&request).await?;

        tracing::debug!(
            "Reasoning call used {} prompt + {} completion tokens",
            response.usage.prompt_tokens,
            response.usage.completion_tokens
        );

        Ok(response.content)
    }

    /// Submit a rendered prompt definition.
    pub async fn submit_prompt(&self, prompt: &BuiltPrompt) -> AppResult<String> {
        self.submit(&prompt.system, &prompt.user, prompt.temperature)
            .await
    }
}
