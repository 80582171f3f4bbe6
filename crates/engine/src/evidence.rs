//! Attribution of the answer back to document pages.

use crate::text::clip;
use crate::types::{DocumentText, SectionUsed};

/// Most sections reported per request.
pub const MAX_SECTIONS: usize = 5;

/// Characters of page text quoted in a snippet.
const SNIPPET_CHARS: usize = 200;

/// Prompt words shorter than this are ignored.
const MIN_WORD_CHARS: usize = 4;

/// Collect up to [`MAX_SECTIONS`] pages that mention a word of the prompt.
///
/// A page qualifies when any prompt word of four or more characters occurs in
/// it, case-insensitively. Documents and pages are scanned in order and the
/// scan stops at the cap. The final answer's text does not take part in the
/// selection.
pub fn extract(_final_answer: &str, documents: &[DocumentText], prompt: &str) -> Vec<SectionUsed> {
    let lowered_prompt = prompt.to_lowercase();
    let words: Vec<&str> = lowered_prompt
        .split_whitespace()
        .filter(|w| w.chars().count() >= MIN_WORD_CHARS)
        .collect();

    let mut sections = Vec::new();
    if words.is_empty() {
        return sections;
    }

    'documents: for doc in documents {
        for page in &doc.pages {
            let lowered_page = page.text.to_lowercase();
            if !words.iter().any(|w| lowered_page.contains(w)) {
                continue;
            }

            let snippet = clip(&page.text, SNIPPET_CHARS).trim();
            if snippet.is_empty() {
                continue;
            }

            sections.push(SectionUsed {
                file: doc.file_name.clone(),
                page: page.page_num,
                text_snippet: format!("{}...", snippet),
            });

            if sections.len() >= MAX_SECTIONS {
                break 'documents;
            }
        }
    }

    tracing::info!("Evidence: {} section(s) selected", sections.len());
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, pages: &[&str]) -> DocumentText {
        DocumentText::from_pages(name, pages.iter().map(|p| p.to_string()).collect())
    }

    #[test]
    fn test_stops_at_five_sections() {
        let pages: Vec<String> = (1..=6)
            .map(|i| format!("Page {} lists complaints received", i))
            .collect();
        let document = DocumentText::from_pages("log.pdf", pages);

        let sections = extract("irrelevant", &[document], "What complaints came from Israel");
        assert_eq!(sections.len(), 5);
        assert_eq!(sections[4].page, 5);
        assert_eq!(sections[0].text_snippet, "Page 1 lists complaints received...");
    }

    #[test]
    fn test_case_insensitive_and_short_words_ignored() {
        let docs = vec![
            doc("a.pdf", &["the cat sat", "ISRAEL is mentioned"]),
            doc("b.pdf", &["nothing relevant"]),
        ];

        let sections = extract("", &docs, "Is the cat from israel");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].file, "a.pdf");
        assert_eq!(sections[0].page, 2);
    }

    #[test]
    fn test_scan_order_across_documents() {
        let docs = vec![
            doc("a.pdf", &["report one", "report two", "report three"]),
            doc("b.pdf", &["report four", "report five", "report six"]),
        ];

        let sections = extract("", &docs, "report");
        let order: Vec<(&str, u32)> = sections.iter().map(|s| (s.file.as_str(), s.page)).collect();
        assert_eq!(
            order,
            vec![("a.pdf", 1), ("a.pdf", 2), ("a.pdf", 3), ("b.pdf", 1), ("b.pdf", 2)]
        );
    }

    #[test]
    fn test_snippet_is_clipped() {
        let text = format!("  complaint {}", "z".repeat(400));
        let sections = extract("", &[doc("a.pdf", &[&text])], "complaint");

        let expected = format!("{}...", clip(&text, 200).trim());
        assert_eq!(sections[0].text_snippet, expected);
    }

    #[test]
    fn test_answer_text_is_not_used() {
        let docs = vec![doc("a.pdf", &["the answer words appear here"])];
        assert!(extract("answer words appear", &docs, "unrelated query").is_empty());
    }

    #[test]
    fn test_no_qualifying_words() {
        let docs = vec![doc("a.pdf", &["any text"])];
        assert!(extract("", &docs, "a is to").is_empty());
        assert!(extract("", &docs, "").is_empty());
    }
}
