//! Answer synthesis and evaluation engine for DocQA.
//!
//! A request flows through five stages:
//! - [`router`]: decides whether a counting query can take the pattern fast path
//! - [`patterns`]: named entity detectors and the conjunctive line scan
//! - [`synthesis`]: draft and condense reasoning calls
//! - [`evaluation`]: final-answer adjudication and three independent metric scores
//! - [`evidence`]: maps the answer back to document pages
//!
//! [`pipeline::Pipeline`] composes them behind a single `process` call.

pub mod documents;
pub mod evaluation;
pub mod evidence;
pub mod patterns;
pub mod pipeline;
pub mod prompts;
pub mod reasoning;
pub mod router;
pub mod synthesis;
pub mod text;
pub mod types;

// Re-export commonly used types
pub use documents::{DocumentExtractor, PlainTextExtractor};
pub use evaluation::{EvaluationOutcome, Evaluator};
pub use patterns::{CountingSearch, EntityPattern, Match, PatternTable};
pub use pipeline::{scan_documents, Pipeline, ScanReport};
pub use prompts::PromptSet;
pub use reasoning::Reasoner;
pub use router::{QueryRouter, Route};
pub use types::{
    DocumentText, EvaluationMetrics, MetricScore, Page, ProcessResponse, RuntimeRequest,
    SectionUsed,
};
