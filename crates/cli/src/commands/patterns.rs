//! Patterns command handler.

use clap::Args;
use docqa_core::{config::AppConfig, AppError, AppResult};
use docqa_engine::PatternTable;

/// List the active entity patterns
#[derive(Args, Debug)]
pub struct PatternsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PatternsCommand {
    /// Execute the patterns command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let table = PatternTable::with_overrides(&config.patterns)?;
        println!("{}", render(&table, self.json)?);
        Ok(())
    }
}

/// Format the pattern table as a JSON array of name/pattern objects or as
/// aligned text columns.
fn render(table: &PatternTable, json: bool) -> AppResult<String> {
    if json {
        let entries: Vec<serde_json::Value> = table
            .iter()
            .map(|p| serde_json::json!({ "name": p.name(), "pattern": p.source() }))
            .collect();
        return serde_json::to_string_pretty(&entries)
            .map_err(|e| AppError::Serialization(e.to_string()));
    }

    let width = table.iter().map(|p| p.name().len()).max().unwrap_or(0);
    let lines: Vec<String> = table
        .iter()
        .map(|p| format!("{:width$}  {}", p.name(), p.source(), width = width))
        .collect();
    Ok(lines.join("\n"))
}
