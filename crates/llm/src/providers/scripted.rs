//! Deterministic scripted provider.
//!
//! Answers each request with a canned reply chosen by a needle found in the
//! request's system instruction. Useful wherever a reasoning service must be
//! substituted without network access, most notably in tests.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use docqa_core::{AppError, AppResult};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone)]
struct Rule {
    needle: String,
    reply: Result<String, String>,
}

/// Scripted client for tests and offline runs.
///
/// Rules are checked in insertion order; the first rule whose needle occurs
/// in the system instruction (or in the user prompt when no system
/// instruction is set) decides the reply. Rules are never consumed, so the
/// reply does not depend on call order.
#[derive(Debug, Default)]
pub struct ScriptedClient {
    rules: Vec<Rule>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `reply` when the system instruction contains `needle`.
    pub fn respond_when(mut self, needle: impl Into<String>, reply: impl Into<String>) -> Self {
        self.rules.push(Rule {
            needle: needle.into(),
            reply: Ok(reply.into()),
        });
        self
    }

    /// Fail with a provider error when the system instruction contains `needle`.
    pub fn fail_when(mut self, needle: impl Into<String>, message: impl Into<String>) -> Self {
        self.rules.push(Rule {
            needle: needle.into(),
            reply: Err(message.into()),
        });
        self
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.lock_requests().clone()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.lock_requests().len()
    }

    fn lock_requests(&self) -> MutexGuard<'_, Vec<LlmRequest>> {
        self.requests.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn select(&self, request: &LlmRequest) -> Option<&Rule> {
        let haystack = request.system.as_deref().unwrap_or(&request.prompt);
        self.rules
            .iter()
            .find(|rule| haystack.contains(rule.needle.as_str()))
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedClient {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.lock_requests().push(request.clone());

        let rule = self
            .select(request)
            .ok_or_else(|| AppError::Llm("No scripted reply for request".to_string()))?;

        match &rule.reply {
            Ok(content) => Ok(LlmResponse {
                content: content.clone(),
                model: request.model.clone(),
                usage: LlmUsage::default(),
            }),
            Err(message) => Err(AppError::Llm(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_matching_rule_wins() {
        let client = ScriptedClient::new()
            .respond_when("summarization", "short")
            .respond_when("expert", "long");

        let request = LlmRequest::new("text", "m").with_system("You are a summarization expert.");
        let response = client.complete(&request).await.unwrap();
        assert_eq!(response.content, "short");
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_rule_yields_llm_error() {
        let client = ScriptedClient::new().fail_when("GROUNDEDNESS", "connection reset");
        let request = LlmRequest::new("x", "m").with_system("evaluating GROUNDEDNESS");

        match client.complete(&request).await {
            Err(AppError::Llm(msg)) => assert_eq!(msg, "connection reset"),
            other => panic!("Expected Llm error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unscripted_request_fails_and_is_recorded() {
        let client = ScriptedClient::new();
        let request = LlmRequest::new("anything", "m");

        assert!(client.complete(&request).await.is_err());
        assert_eq!(client.requests()[0].prompt, "anything");
    }
}
