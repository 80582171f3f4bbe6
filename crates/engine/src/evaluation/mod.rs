//! Final-answer adjudication and three-axis quality evaluation.
//!
//! Four steps run per request: choose the final answer, then judge it for
//! groundedness, accuracy and relevance with one independent call each.
//! Output that cannot be interpreted falls back to documented defaults;
//! provider failures abort the request.

pub mod json;
pub mod metrics;

pub use metrics::{render_report, Axis, FALLBACK_SCORE, REVIEW_THRESHOLD};

use crate::prompts::{render, PromptSet};
use crate::reasoning::Reasoner;
use crate::text::clip;
use crate::types::{DocumentText, EvaluationMetrics, MetricScore};
use docqa_core::AppResult;

/// Documents quoted to the groundedness and accuracy judges.
const CONTEXT_DOCUMENTS: usize = 3;

/// Characters quoted from each of those documents.
const CONTEXT_DOCUMENT_CHARS: usize = 2000;

/// Characters quoted from the draft answer.
const DRAFT_EXCERPT_CHARS: usize = 1000;

/// Result of evaluating one request.
#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    pub final_answer: String,
    pub metrics: EvaluationMetrics,

    /// Human-readable summary of the metrics
    pub report: String,
}

/// Runs the evaluation steps against the reasoning service.
pub struct Evaluator<'a> {
    reasoner: &'a Reasoner,
    prompts: &'a PromptSet,
    parallel: bool,
}

impl<'a> Evaluator<'a> {
    pub fn new(reasoner: &'a Reasoner, prompts: &'a PromptSet) -> Self {
        Self {
            reasoner,
            prompts,
            parallel: false,
        }
    }

    /// Run the three metric judges concurrently.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub async fn evaluate(
        &self,
        question: &str,
        draft: &str,
        condensed: &str,
        documents: &[DocumentText],
    ) -> AppResult<EvaluationOutcome> {
        let (final_answer, confidence_score) =
            self.determine_final_answer(question, draft, condensed).await?;

        let document_context = document_context(documents);
        let draft_excerpt = clip(draft, DRAFT_EXCERPT_CHARS);
        let judged = Judged {
            question,
            answer: &final_answer,
            draft_excerpt,
            document_context: &document_context,
        };

        let (groundedness, accuracy, relevance) = if self.parallel {
            tracing::debug!("Running metric evaluations concurrently");
            let (g, a, r) = futures::join!(
                self.judge(Axis::Groundedness, &judged),
                self.judge(Axis::Accuracy, &judged),
                self.judge(Axis::Relevance, &judged),
            );
            (g?, a?, r?)
        } else {
            (
                self.judge(Axis::Groundedness, &judged).await?,
                self.judge(Axis::Accuracy, &judged).await?,
                self.judge(Axis::Relevance, &judged).await?,
            )
        };

        let metrics = EvaluationMetrics::aggregate(
            confidence_score,
            groundedness,
            accuracy,
            relevance,
            documents.len(),
        );

        tracing::info!(
            "Evaluation complete: overall {:.2} (needs_review: {})",
            metrics.overall_score,
            metrics.needs_review
        );

        let report = render_report(&metrics);

        Ok(EvaluationOutcome {
            final_answer,
            metrics,
            report,
        })
    }

    /// Ask the service to choose or merge the draft and condensed answers.
    async fn determine_final_answer(
        &self,
        question: &str,
        draft: &str,
        condensed: &str,
    ) -> AppResult<(String, f64)> {
        let prompt = render(
            &self.prompts.final_answer,
            &[
                ("question", question),
                ("draft", draft),
                ("condensed", condensed),
            ],
        )?;

        let raw = self.reasoner.submit_prompt(&prompt).await?;

        let parsed = json::extract_object(&raw).and_then(|obj| {
            let answer = json::text(&obj, "final_answer")?;
            let confidence = json::unit_number(&obj, "confidence_score")?;
            Ok((answer, confidence))
        });

        match parsed {
            Ok((answer, confidence)) => {
                tracing::info!("Final answer chosen (confidence: {:.2})", confidence);
                Ok((answer, confidence))
            }
            Err(reason) => {
                tracing::warn!(
                    "Could not read final answer ({}); using condensed answer",
                    reason
                );
                Ok((condensed.to_string(), FALLBACK_SCORE))
            }
        }
    }

    /// Score the final answer on one axis.
    async fn judge(&self, axis: Axis, judged: &Judged<'_>) -> AppResult<MetricScore> {
        let prompt = match axis {
            Axis::Groundedness => render(&self.prompts.groundedness, &judged.with_sources())?,
            Axis::Accuracy => render(&self.prompts.accuracy, &judged.with_sources())?,
            Axis::Relevance => render(
                &self.prompts.relevance,
                &[("question", judged.question), ("answer", judged.answer)],
            )?,
        };

        let raw = self.reasoner.submit_prompt(&prompt).await?;

        let parsed = json::extract_object(&raw).and_then(|obj| {
            let score = json::unit_number(&obj, "score")?;
            let justification = json::text(&obj, "justification")
                .ok()
                .filter(|j| !j.trim().is_empty())
                .unwrap_or_else(|| axis.missing_justification());
            Ok(MetricScore {
                score,
                justification,
            })
        });

        match parsed {
            Ok(metric) => {
                tracing::info!("{} score: {:.2}", axis.label(), metric.score);
                tracing::debug!(
                    "{} justification: {}",
                    axis.label(),
                    clip(&metric.justification, 200)
                );
                Ok(metric)
            }
            Err(reason) => {
                tracing::warn!("{} evaluation fell back: {}", axis.label(), reason);
                Ok(axis.fallback(&reason))
            }
        }
    }
}

/// Inputs shared by the three metric judges.
struct Judged<'a> {
    question: &'a str,
    answer: &'a str,
    draft_excerpt: &'a str,
    document_context: &'a str,
}

impl<'a> Judged<'a> {
    fn with_sources(&self) -> [(&'static str, &'a str); 4] {
        [
            ("question", self.question),
            ("answer", self.answer),
            ("draft_excerpt", self.draft_excerpt),
            ("document_context", self.document_context),
        ]
    }
}

/// Quote the leading documents for the source-checking judges.
pub fn document_context(documents: &[DocumentText]) -> String {
    documents
        .iter()
        .take(CONTEXT_DOCUMENTS)
        .map(|doc| {
            format!(
                "=== Document: {} ===\n{}",
                doc.file_name,
                clip(&doc.full_text, CONTEXT_DOCUMENT_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
