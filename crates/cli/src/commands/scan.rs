//! Scan command handler.
//!
//! Routes a prompt and runs the counting search without any reasoning calls.

use clap::Args;
use docqa_core::{config::AppConfig, AppError, AppResult};
use docqa_engine::{
    scan_documents, DocumentExtractor, PatternTable, PlainTextExtractor, QueryRouter, ScanReport,
};
use std::sync::Arc;

/// Run the pattern search for a counting question
#[derive(Args, Debug)]
pub struct ScanCommand {
    /// The question to route and search for
    pub prompt: String,

    /// Extracted document text to search (repeatable)
    #[arg(short, long = "file", required = true)]
    pub files: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ScanCommand {
    /// Execute the scan command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing scan command");

        let patterns = Arc::new(PatternTable::with_overrides(&config.patterns)?);
        let router = QueryRouter::new(patterns)?;
        let documents = PlainTextExtractor::new().extract(&self.files).await?;

        let report = scan_documents(&router, &documents, &self.prompt, &config.pipeline);

        println!("{}", render(&report, self.json)?);
        Ok(())
    }
}

/// Format a scan report as pretty JSON or as the text summary.
fn render(report: &ScanReport, json: bool) -> AppResult<String> {
    if json {
        return serde_json::to_string_pretty(report)
            .map_err(|e| AppError::Serialization(e.to_string()));
    }

    let counting = if report.route.counting { "yes" } else { "no" };
    let route = if report.route.fast_path {
        "pattern fast path"
    } else {
        "full documents"
    };

    Ok(format!(
        "Counting query: {}\nEntities: {}\nRoute: {}\n\n{}",
        counting,
        display_list(&report.route.entities),
        route,
        report.search.summary
    ))
}

fn display_list(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> AppConfig {
        AppConfig {
            workspace: dir.path().to_path_buf(),
            ..AppConfig::default()
        }
    }

    fn write(dir: &TempDir, text: &str) -> String {
        let path = dir.path().join("complaints.txt");
        std::fs::write(&path, text).unwrap();
        path.to_string_lossy().to_string()
    }

    async fn report(dir: &TempDir, prompt: &str, file: &str) -> ScanReport {
        let router = QueryRouter::new(Arc::new(PatternTable::builtin().unwrap())).unwrap();
        let docs = PlainTextExtractor::new()
            .extract(&[file.to_string()])
            .await
            .unwrap();
        scan_documents(&router, &docs, prompt, &config(dir).pipeline)
    }

    #[tokio::test]
    async fn test_execute_over_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = write(&temp_dir, "Israel complaint\nUSA complaint");

        let cmd = ScanCommand {
            prompt: "How many complaints are from Israel?".to_string(),
            files: vec![file],
            json: false,
        };
        assert!(cmd.execute(&config(&temp_dir)).await.is_ok());
    }

    #[tokio::test]
    async fn test_execute_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let cmd = ScanCommand {
            prompt: "How many?".to_string(),
            files: vec![temp_dir.path().join("gone.txt").to_string_lossy().to_string()],
            json: true,
        };

        let err = cmd.execute(&config(&temp_dir)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_text_output_for_fast_path() {
        let temp_dir = TempDir::new().unwrap();
        let file = write(&temp_dir, "Israel complaint\nUSA complaint\nIsrael again");
        let report = report(&temp_dir, "How many complaints are from Israel?", &file).await;

        let text = render(&report, false).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Counting query: yes");
        assert!(lines[1].starts_with("Entities: "));
        assert!(lines[1].contains("israel"));
        assert_eq!(lines[2], "Route: pattern fast path");
        assert_eq!(lines[3], "");
        assert!(text.ends_with(&report.search.summary));
    }

    #[tokio::test]
    async fn test_text_output_for_open_question() {
        let temp_dir = TempDir::new().unwrap();
        let file = write(&temp_dir, "Nothing notable");
        let report = report(&temp_dir, "Describe the document", &file).await;

        let text = render(&report, false).unwrap();
        assert!(text.starts_with("Counting query: no\nEntities: (none)\nRoute: full documents\n"));
    }

    #[tokio::test]
    async fn test_json_output_shape() {
        let temp_dir = TempDir::new().unwrap();
        let file = write(&temp_dir, "Israel complaint\nIsrael again");
        let report = report(&temp_dir, "Count the Israel complaints", &file).await;

        let value: serde_json::Value =
            serde_json::from_str(&render(&report, true).unwrap()).unwrap();
        assert_eq!(value["route"]["counting"], true);
        assert_eq!(value["route"]["fast_path"], true);
        assert_eq!(value["search"]["total_matches"], 2);
        assert!(value["search"]["matches"].is_array());
    }
}
