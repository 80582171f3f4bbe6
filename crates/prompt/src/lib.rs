//! Prompt system for DocQA.
//!
//! This crate provides structured prompt management for the reasoning stages
//! of the answer pipeline:
//! - Built-in YAML prompt definitions (draft, condense, final answer, three metric judges)
//! - Workspace overrides in `.docqa/prompts/`
//! - Handlebars template rendering

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{builtin_ids, list_prompts, load_prompt};
pub use types::{BuiltPrompt, PromptDefinition};
