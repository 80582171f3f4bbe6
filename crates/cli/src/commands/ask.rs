//! Ask command handler.
//!
//! Runs the full answer pipeline over one or more extracted documents.

use super::build_pipeline;
use clap::Args;
use docqa_core::{config::AppConfig, AppError, AppResult};
use docqa_engine::{ProcessResponse, RuntimeRequest};

/// Answer a question from documents and score the answer
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub prompt: String,

    /// Extracted document text to answer from (repeatable)
    #[arg(short, long = "file", required = true)]
    pub files: Vec<String>,

    /// Run the three metric evaluations concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Output the full response as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let mut config = config.clone();
        if self.parallel {
            config.pipeline.parallel_evaluation = true;
        }

        let pipeline = build_pipeline(&config)?;
        tracing::debug!("Reasoning provider: {}", pipeline.provider_name());
        let request = RuntimeRequest::new(self.files.clone(), self.prompt.clone());
        let response = pipeline.process(&request).await?;

        println!("{}", render(&response, self.json)?);
        Ok(())
    }
}

/// Format a response as pretty JSON or as the answer, report and sources.
fn render(response: &ProcessResponse, json: bool) -> AppResult<String> {
    if json {
        return serde_json::to_string_pretty(response)
            .map_err(|e| AppError::Serialization(e.to_string()));
    }

    let mut out = format!("{}\n\n{}\n", response.final_answer, response.agent_3_output);

    if !response.sections_used.is_empty() {
        out.push_str("\nSources:\n");
        for section in &response.sections_used {
            out.push_str(&format!(
                "  - {} (page {}): {}\n",
                section.file, section.page, section.text_snippet
            ));
        }
    }

    out.push_str(&format!(
        "\nRequest {} processed in {:.2}s",
        response.request_id, response.processing_time_seconds
    ));
    Ok(out)
}
