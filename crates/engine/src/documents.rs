//! Document extraction contract and the plain-text extractor.

use crate::types::DocumentText;
use async_trait::async_trait;
use docqa_core::{AppError, AppResult};
use std::path::Path;

/// Page separator in extracted text files.
const PAGE_BREAK: char = '\x0c';

/// Turns input file paths into extracted document text.
///
/// Implementations must report a missing file as [`AppError::NotFound`] and
/// any other failure as [`AppError::Extraction`].
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, file_paths: &[String]) -> AppResult<Vec<DocumentText>>;
}

/// Reads UTF-8 text files whose pages are separated by form feeds.
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract one file.
    pub fn extract_file(&self, file_path: &str) -> AppResult<DocumentText> {
        let path = Path::new(file_path);
        if !path.is_file() {
            return Err(AppError::NotFound(format!("File not found: {}", file_path)));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| AppError::Extraction(format!("Failed to read {}: {}", file_path, e)))?;
        let text = String::from_utf8(bytes).map_err(|e| {
            AppError::Extraction(format!("{} is not valid UTF-8 text: {}", file_path, e))
        })?;

        let mut pages: Vec<String> = text.split(PAGE_BREAK).map(str::to_string).collect();
        // A trailing form feed closes the last page rather than opening a new one
        if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
            pages.pop();
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.to_string());

        let document = DocumentText::from_pages(file_name, pages);
        tracing::debug!(
            "Extracted {} ({} pages, {} chars)",
            document.file_name,
            document.total_pages,
            document.full_text.len()
        );

        Ok(document)
    }
}

#[async_trait]
impl DocumentExtractor for PlainTextExtractor {
    async fn extract(&self, file_paths: &[String]) -> AppResult<Vec<DocumentText>> {
        file_paths
            .iter()
            .map(|path| self.extract_file(path))
            .collect()
    }
}
