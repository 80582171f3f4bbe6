//! Request, document and result types for the answer pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One page of extracted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number
    pub page_num: u32,

    /// Page text
    pub text: String,
}

/// Text extracted from one input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentText {
    /// Display name of the document (final path component)
    pub file_name: String,

    /// Number of pages
    pub total_pages: u32,

    /// Pages in document order
    pub pages: Vec<Page>,

    /// All page text joined with newlines
    pub full_text: String,
}

impl DocumentText {
    /// Build a document from its page texts, numbering pages from 1.
    pub fn from_pages(file_name: impl Into<String>, page_texts: Vec<String>) -> Self {
        let full_text = page_texts.join("\n");
        let pages: Vec<Page> = page_texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Page {
                page_num: i as u32 + 1,
                text,
            })
            .collect();

        Self {
            file_name: file_name.into(),
            total_pages: pages.len() as u32,
            pages,
            full_text,
        }
    }
}

/// Entry point value of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeRequest {
    /// Caller-supplied or generated request identifier
    #[serde(default = "new_request_id")]
    pub request_id: String,

    /// Documents to answer from, in order
    pub file_paths: Vec<String>,

    /// The user's question
    pub prompt: String,

    /// When the request was made
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl RuntimeRequest {
    /// Create a request with a fresh ID stamped now.
    pub fn new(file_paths: Vec<String>, prompt: impl Into<String>) -> Self {
        Self {
            request_id: new_request_id(),
            file_paths,
            prompt: prompt.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Score for one evaluation axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricScore {
    /// Score in [0, 1]
    pub score: f64,

    /// Explanation returned by the judge, or the fallback note
    pub justification: String,
}

/// Quality metrics for one answered request.
///
/// `overall_score` is the mean of the three axis scores and `needs_review`
/// is set when it falls below the review threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub confidence_score: f64,
    pub groundedness: f64,
    pub groundedness_justification: String,
    pub accuracy: f64,
    pub accuracy_justification: String,
    pub relevance: f64,
    pub relevance_justification: String,
    pub sources_used: usize,
    pub overall_score: f64,
    pub needs_review: bool,
}

/// A document location supporting the answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionUsed {
    pub file: String,
    pub page: u32,
    pub text_snippet: String,
}

/// Result of processing one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub request_id: String,

    /// Draft answer
    pub agent_1_output: String,

    /// Condensed answer
    pub agent_2_output: String,

    /// Human-readable evaluation report
    pub agent_3_output: String,

    pub final_answer: String,
    pub metrics: EvaluationMetrics,
    pub sections_used: Vec<SectionUsed>,
    pub processing_time_seconds: f64,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_from_pages() {
        let doc = DocumentText::from_pages(
            "report.txt",
            vec!["first page".to_string(), "second page".to_string()],
        );

        assert_eq!(doc.total_pages, 2);
        assert_eq!(doc.pages[0].page_num, 1);
        assert_eq!(doc.pages[1].page_num, 2);
        assert_eq!(doc.full_text, "first page\nsecond page");
    }

    #[test]
    fn test_runtime_request_defaults() {
        let json = r#"{"file_paths": ["a.txt"], "prompt": "How many?"}"#;
        let request: RuntimeRequest = serde_json::from_str(json).unwrap();

        assert!(uuid::Uuid::parse_str(&request.request_id).is_ok());
        assert_eq!(request.file_paths, vec!["a.txt".to_string()]);
    }

    #[test]
    fn test_runtime_request_keeps_supplied_id() {
        let json = r#"{
            "request_id": "req-42",
            "file_paths": [],
            "prompt": "q",
            "timestamp": "2024-05-01T10:00:00Z"
        }"#;
        let request: RuntimeRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.request_id, "req-42");
        assert_eq!(request.timestamp.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }
}
