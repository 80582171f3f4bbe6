//! Query routing between the pattern fast path and full-document reasoning.

use crate::patterns::PatternTable;
use docqa_core::{AppError, AppResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Phrases signalling that the question asks for a count.
const COUNTING_PHRASES: &[&str] = &[
    r"\bhow many\b",
    r"\bcount\b",
    r"\bnumber of\b",
    r"\btotal\b",
    r"\bsum\b",
];

/// Routing decision for one prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Whether the prompt reads as a counting question
    pub counting: bool,

    /// Entities named in the prompt, in table order
    pub entities: Vec<String>,

    /// Take the pattern fast path instead of reasoning over raw documents
    pub fast_path: bool,
}

/// Classifies prompts against the counting phrases and the entity table.
#[derive(Debug, Clone)]
pub struct QueryRouter {
    counting: Vec<Regex>,
    patterns: Arc<PatternTable>,
}

impl QueryRouter {
    pub fn new(patterns: Arc<PatternTable>) -> AppResult<Self> {
        let counting = COUNTING_PHRASES
            .iter()
            .map(|p| {
                Regex::new(p)
                    .map_err(|e| AppError::Config(format!("Invalid counting phrase {}: {}", p, e)))
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self { counting, patterns })
    }

    pub fn patterns(&self) -> &PatternTable {
        &self.patterns
    }

    /// Whether the prompt asks for a count.
    pub fn is_counting_query(&self, prompt: &str) -> bool {
        let lowered = prompt.to_lowercase();
        self.counting.iter().any(|re| re.is_match(&lowered))
    }

    /// Decide the route for a prompt.
    ///
    /// The fast path is taken only when the prompt is a counting question and
    /// names at least one known entity.
    pub fn route(&self, prompt: &str) -> Route {
        let counting = self.is_counting_query(prompt);
        let entities = self.patterns.extract_entities(prompt);
        let fast_path = counting && !entities.is_empty();

        tracing::info!(
            "Routed query: counting={}, entities=[{}], fast_path={}",
            counting,
            entities.join(", "),
            fast_path
        );

        Route {
            counting,
            entities,
            fast_path,
        }
    }
}
