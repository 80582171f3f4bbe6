//! Prompt types for DocQA.
//!
//! This module defines the domain entities for the prompt system.

use serde::{Deserialize, Serialize};

/// A prompt definition loaded from YAML.
///
/// Each reasoning stage of the answer pipeline is driven by one definition:
/// a system instruction, a user template and the sampling temperature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier (e.g., "draft", "groundedness")
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Sampling temperature in [0, 1]
    pub temperature: f32,

    /// System instruction template with Handlebars syntax
    pub system: String,

    /// User instruction template with Handlebars syntax
    pub template: String,
}

/// A fully rendered prompt ready for the reasoning service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// Rendered system instruction
    pub system: String,

    /// Rendered user instruction
    pub user: String,

    /// Sampling temperature copied from the definition
    pub temperature: f32,

    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,
}
