//! Draft and condense stages.
//!
//! Both stages are plain text transforms over the reasoning service. Provider
//! failures are not caught here.

use crate::prompts::{render, PromptSet};
use crate::reasoning::Reasoner;
use crate::types::DocumentText;
use docqa_core::AppResult;

/// Concatenate documents into the draft stage's context block.
pub fn combine_documents(documents: &[DocumentText]) -> String {
    let rule = "=".repeat(80);
    let mut combined = String::new();

    for doc in documents {
        combined.push_str(&format!(
            "\n{rule}\nDocument: {}\nTotal Pages: {}\n{rule}\n{}\n{rule}\n\n",
            doc.file_name, doc.total_pages, doc.full_text
        ));
    }

    combined
}

/// Produce a comprehensive first answer from the documents.
pub async fn draft(
    reasoner: &Reasoner,
    prompts: &PromptSet,
    documents: &[DocumentText],
    question: &str,
) -> AppResult<String> {
    tracing::info!("Drafting answer from {} document(s)", documents.len());

    let combined = combine_documents(documents);
    let prompt = render(
        &prompts.draft,
        &[("documents", combined.as_str()), ("question", question)],
    )?;

    let answer = reasoner.submit_prompt(&prompt).await?;
    tracing::debug!("Draft answer: {} chars", answer.len());
    Ok(answer)
}

/// Shorten the draft if it is verbose, otherwise return it as-is.
pub async fn condense(
    reasoner: &Reasoner,
    prompts: &PromptSet,
    draft: &str,
    question: &str,
) -> AppResult<String> {
    tracing::info!("Condensing draft answer");

    let prompt = render(
        &prompts.condense,
        &[("question", question), ("draft", draft)],
    )?;

    let answer = reasoner.submit_prompt(&prompt).await?;
    tracing::debug!("Condensed answer: {} chars", answer.len());
    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_core::AppError;
    use docqa_llm::ScriptedClient;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn prompts() -> PromptSet {
        let temp_dir = TempDir::new().unwrap();
        PromptSet::load(temp_dir.path()).unwrap()
    }

    #[test]
    fn test_combine_documents_layout() {
        let doc = DocumentText::from_pages("a.pdf", vec!["alpha".to_string(), "beta".to_string()]);
        let rule = "=".repeat(80);

        assert_eq!(
            combine_documents(&[doc]),
            format!("\n{rule}\nDocument: a.pdf\nTotal Pages: 2\n{rule}\nalpha\nbeta\n{rule}\n\n")
        );
        assert_eq!(combine_documents(&[]), "");
    }

    #[tokio::test]
    async fn test_draft_and_condense_calls() {
        let client = Arc::new(
            ScriptedClient::new()
                .respond_when("document analysis expert", "long draft")
                .respond_when("summarization expert", "short"),
        );
        let reasoner = Reasoner::new(client.clone(), "gpt-4o");
        let prompts = prompts();
        let docs = vec![DocumentText::from_pages("a.pdf", vec!["Israel text".to_string()])];

        let first = draft(&reasoner, &prompts, &docs, "What is in Israel?").await.unwrap();
        let second = condense(&reasoner, &prompts, &first, "What is in Israel?").await.unwrap();

        assert_eq!(first, "long draft");
        assert_eq!(second, "short");

        let requests = client.requests();
        assert!(requests[0].prompt.contains("Document: a.pdf"));
        assert!(requests[0].prompt.contains("User Question: What is in Israel?"));
        assert_eq!(requests[0].temperature, Some(0.3));
        assert!(requests[1].prompt.contains("long draft"));
        assert_eq!(requests[1].temperature, Some(0.5));
    }

    #[tokio::test]
    async fn test_draft_failure_propagates() {
        let client = Arc::new(ScriptedClient::new().fail_when("document analysis expert", "timeout"));
        let reasoner = Reasoner::new(client, "gpt-4o");

        let result = draft(&reasoner, &prompts(), &[], "q").await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
