//! The stage prompt definitions used by one pipeline.

use docqa_core::AppResult;
use docqa_prompt::{build_prompt, load_prompt, BuiltPrompt, PromptDefinition};
use std::collections::HashMap;
use std::path::Path;

/// Prompt definitions for every reasoning stage, loaded once at startup.
#[derive(Debug, Clone)]
pub struct PromptSet {
    pub draft: PromptDefinition,
    pub condense: PromptDefinition,
    pub final_answer: PromptDefinition,
    pub groundedness: PromptDefinition,
    pub accuracy: PromptDefinition,
    pub relevance: PromptDefinition,
}

impl PromptSet {
    /// Load every stage prompt, honouring overrides in `workspace/.docqa/prompts`.
    pub fn load(workspace: &Path) -> AppResult<Self> {
        Ok(Self {
            draft: load_prompt(workspace, "draft")?,
            condense: load_prompt(workspace, "condense")?,
            final_answer: load_prompt(workspace, "final-answer")?,
            groundedness: load_prompt(workspace, "groundedness")?,
            accuracy: load_prompt(workspace, "accuracy")?,
            relevance: load_prompt(workspace, "relevance")?,
        })
    }
}

/// Render a definition with string variables.
pub(crate) fn render(definition: &PromptDefinition, vars: &[(&str, &str)]) -> AppResult<BuiltPrompt> {
    let variables: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    build_prompt(definition, &variables)
}
