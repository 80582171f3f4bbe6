//! Score aggregation, the review gate and the evaluation report.

use crate::types::{EvaluationMetrics, MetricScore};

/// Overall scores below this are flagged for review.
pub const REVIEW_THRESHOLD: f64 = 0.8;

/// Score and confidence used when model output cannot be interpreted.
pub const FALLBACK_SCORE: f64 = 0.7;

/// The three independently judged quality axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Groundedness,
    Accuracy,
    Relevance,
}

impl Axis {
    pub fn label(&self) -> &'static str {
        match self {
            Axis::Groundedness => "Groundedness",
            Axis::Accuracy => "Accuracy",
            Axis::Relevance => "Relevance",
        }
    }

    /// Justification used when the judge returns a score but no explanation.
    pub fn missing_justification(&self) -> String {
        format!("Unable to evaluate {}", self.label().to_lowercase())
    }

    /// Score used when the judge's output cannot be interpreted.
    pub fn fallback(&self, reason: &str) -> MetricScore {
        MetricScore {
            score: FALLBACK_SCORE,
            justification: format!("{} evaluation error: {}", self.label(), reason),
        }
    }
}

/// Whether an overall score falls below the review threshold.
pub fn needs_review(overall_score: f64) -> bool {
    overall_score < REVIEW_THRESHOLD
}

impl EvaluationMetrics {
    /// Combine the axis scores into the request's metrics.
    pub fn aggregate(
        confidence_score: f64,
        groundedness: MetricScore,
        accuracy: MetricScore,
        relevance: MetricScore,
        sources_used: usize,
    ) -> Self {
        let overall_score = (groundedness.score + accuracy.score + relevance.score) / 3.0;

        Self {
            confidence_score,
            groundedness: groundedness.score,
            groundedness_justification: groundedness.justification,
            accuracy: accuracy.score,
            accuracy_justification: accuracy.justification,
            relevance: relevance.score,
            relevance_justification: relevance.justification,
            sources_used,
            overall_score,
            needs_review: needs_review(overall_score),
        }
    }
}

/// Render the human-readable evaluation summary.
pub fn render_report(metrics: &EvaluationMetrics) -> String {
    let banner = if metrics.needs_review {
        "⚠️ NEEDS REVIEW - Score below 80% threshold"
    } else {
        "✓ Quality threshold met"
    };

    format!(
        "EVALUATION SUMMARY:\n\n\
         Overall Quality Score: {:.2} ({:.0}%)\n\
         {}\n\n\
         GROUNDEDNESS: {:.2}\n{}\n\n\
         ACCURACY: {:.2}\n{}\n\n\
         RELEVANCE: {:.2}\n{}",
        metrics.overall_score,
        metrics.overall_score * 100.0,
        banner,
        metrics.groundedness,
        metrics.groundedness_justification,
        metrics.accuracy,
        metrics.accuracy_justification,
        metrics.relevance,
        metrics.relevance_justification,
    )
}
