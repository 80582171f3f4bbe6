//! Error types for the document QA service.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, document extraction, reasoning
//! service, prompt and pipeline errors.

use thiserror::Error;

/// Unified error type for the document QA service.
///
/// All functions in the application return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A requested input document does not exist
    #[error("{0}")]
    NotFound(String),

    /// A document exists but its text could not be extracted
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Reasoning service transport or provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Prompt definition and rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Answer pipeline errors
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether this error should be reported to the caller as "not found".
    ///
    /// Every other error is a generic processing failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let err = AppError::NotFound("File not found: a.pdf".to_string());
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "File not found: a.pdf");

        assert!(!AppError::Llm("timeout".to_string()).is_not_found());
        assert!(!AppError::Extraction("bad utf-8".to_string()).is_not_found());
    }

    #[test]
    fn test_json_error_conversion() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
