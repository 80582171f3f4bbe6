//! Named entity detectors and the conjunctive line scan.
//!
//! The pattern table is built once at startup and shared read-only by every
//! request. A line counts as a match only when every requested entity's
//! pattern matches that same line.

use crate::text::clip;
use crate::types::DocumentText;
use docqa_core::config::PatternConfig;
use docqa_core::{AppError, AppResult};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Built-in detectors, in lookup order. All are matched case-insensitively.
const BUILTIN_PATTERNS: &[(&str, &str)] = &[
    ("israel", r"\b(israel|israeli)\b"),
    (
        "unsubstantiated",
        r"\b(unsubstantiated|not substantiated|unvalidated)\b",
    ),
    ("substantiated", r"\b(substantiated|validated|confirmed)\b"),
    ("complaint", r"\b(complaint|adverse event|ae|report)\b"),
    ("usa", r"\b(usa|united states|u\.s\.a|america|american)\b"),
    ("uk", r"\b(uk|united kingdom|u\.k|britain|british)\b"),
    ("germany", r"\b(germany|german|deutschland)\b"),
    ("france", r"\b(france|french)\b"),
    ("italy", r"\b(italy|italian)\b"),
    ("spain", r"\b(spain|spanish)\b"),
    ("canada", r"\b(canada|canadian)\b"),
    ("australia", r"\b(australia|australian)\b"),
    ("japan", r"\b(japan|japanese)\b"),
    ("china", r"\b(china|chinese)\b"),
];

/// Default number of lines captured on each side of a match.
pub const DEFAULT_CONTEXT_LINES: usize = 2;

/// Default cap on matches reported by a counting search.
pub const DEFAULT_MAX_MATCHES: usize = 50;

/// Matches quoted in a counting summary.
const SUMMARY_SAMPLES: usize = 3;

/// Characters of a line quoted in a counting summary.
const SUMMARY_LINE_CHARS: usize = 100;

/// A compiled named entity detector.
#[derive(Debug, Clone)]
pub struct EntityPattern {
    name: String,
    source: String,
    regex: Regex,
}

impl EntityPattern {
    /// Compile a case-insensitive detector.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> AppResult<Self> {
        let name = name.into();
        let source = pattern.into();
        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                AppError::Config(format!("Invalid pattern for entity '{}': {}", name, e))
            })?;

        Ok(Self {
            name,
            source,
            regex,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pattern text as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// A line on which all requested entities were found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// 1-based line number
    pub line_number: usize,

    /// The matching line, trimmed
    pub line_text: String,

    /// Entities that matched (all of the requested ones)
    pub matched_entities: Vec<String>,

    /// The line with its surrounding window, clipped to the text bounds
    pub context: String,
}

/// Outcome of a counting search over a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountingSearch {
    pub is_counting_query: bool,
    pub query: String,
    pub entities_searched: Vec<String>,

    /// Matches found before capping
    pub total_matches: usize,

    /// The first matches, capped
    pub matches: Vec<Match>,

    pub summary: String,
}

/// The process-wide set of entity detectors.
#[derive(Debug, Clone)]
pub struct PatternTable {
    patterns: Vec<EntityPattern>,
}

impl PatternTable {
    /// The built-in detectors only.
    pub fn builtin() -> AppResult<Self> {
        Self::with_overrides(&[])
    }

    /// Built-in detectors plus configured ones.
    ///
    /// A configured pattern whose name matches a built-in replaces it in place;
    /// new names are appended in configuration order.
    pub fn with_overrides(overrides: &[PatternConfig]) -> AppResult<Self> {
        let mut patterns = BUILTIN_PATTERNS
            .iter()
            .map(|(name, pattern)| EntityPattern::new(*name, *pattern))
            .collect::<AppResult<Vec<_>>>()?;

        let mut seen = HashSet::new();
        for entry in overrides {
            let name = entry.name.trim().to_lowercase();
            if name.is_empty() {
                return Err(AppError::Config(
                    "Entity pattern name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(name.clone()) {
                return Err(AppError::Config(format!(
                    "Entity pattern '{}' is declared more than once",
                    name
                )));
            }

            let compiled = EntityPattern::new(name.clone(), entry.pattern.clone())?;
            match patterns.iter_mut().find(|p| p.name == name) {
                Some(existing) => {
                    tracing::debug!("Overriding built-in entity pattern '{}'", name);
                    *existing = compiled;
                }
                None => patterns.push(compiled),
            }
        }

        tracing::debug!("Pattern table ready with {} entities", patterns.len());

        Ok(Self { patterns })
    }

    pub fn get(&self, name: &str) -> Option<&EntityPattern> {
        self.patterns.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Names of every entity whose pattern matches `text`, in table order.
    pub fn extract_entities(&self, text: &str) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|p| p.is_match(text))
            .map(|p| p.name.clone())
            .collect()
    }

    /// Report every line of `text` on which all `entities` match.
    ///
    /// Entity names missing from the table are skipped and the scan uses the
    /// rest. With no known entity left there is nothing to match.
    pub fn scan(&self, text: &str, entities: &[String], context_lines: usize) -> Vec<Match> {
        let mut detectors = Vec::with_capacity(entities.len());
        for entity in entities {
            match self.get(entity) {
                Some(pattern) => detectors.push(pattern),
                None => tracing::warn!("Unknown entity '{}' skipped", entity),
            }
        }

        if detectors.is_empty() {
            return Vec::new();
        }
        let matched_entities: Vec<String> =
            detectors.iter().map(|d| d.name().to_string()).collect();

        let lines: Vec<&str> = text.split('\n').collect();
        let mut matches = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            if !detectors.iter().all(|d| d.is_match(line)) {
                continue;
            }

            let start = i.saturating_sub(context_lines);
            let end = (i + context_lines + 1).min(lines.len());

            matches.push(Match {
                line_number: i + 1,
                line_text: line.trim().to_string(),
                matched_entities: matched_entities.clone(),
                context: lines[start..end].join("\n"),
            });
        }

        matches
    }

    /// Extract entities from `query`, scan `text` for lines where they all
    /// co-occur and summarise the result.
    pub fn execute_counting_search(
        &self,
        query: &str,
        text: &str,
        context_lines: usize,
        max_matches: usize,
    ) -> CountingSearch {
        let entities = self.extract_entities(query);
        let mut matches = self.scan(text, &entities, context_lines);
        let total_matches = matches.len();

        tracing::info!(
            "Counting search for [{}]: {} matching lines",
            entities.join(", "),
            total_matches
        );

        let summary = summarize(&entities, &matches);
        matches.truncate(max_matches);

        CountingSearch {
            is_counting_query: true,
            query: query.to_string(),
            entities_searched: entities,
            total_matches,
            matches,
            summary,
        }
    }
}

fn summarize(entities: &[String], matches: &[Match]) -> String {
    let names = entities.join(", ");

    if matches.is_empty() {
        return format!("No matches found for entities: {}", names);
    }

    let mut summary = format!(
        "Found {} occurrences matching all entities: {}",
        matches.len(),
        names
    );
    summary.push_str("\n\nSample matches:");
    for m in matches.iter().take(SUMMARY_SAMPLES) {
        summary.push_str(&format!(
            "\n- Line {}: {}...",
            m.line_number,
            clip(&m.line_text, SUMMARY_LINE_CHARS)
        ));
    }

    summary
}

/// Name of the pseudo-document substituted for the corpus on the fast path.
pub const CONDENSED_DOCUMENT_NAME: &str = "Pattern Matched Sections";

/// Build the single-page pseudo-document holding the top match contexts.
pub fn condensed_document(search: &CountingSearch, max_matches: usize) -> DocumentText {
    let rule = "-".repeat(80);
    let mut text = String::from("Relevant sections extracted by pattern matching:\n\n");

    for (i, m) in search.matches.iter().take(max_matches).enumerate() {
        text.push_str(&format!(
            "Match {} (Line {}):\n{}\n{}\n\n",
            i + 1,
            m.line_number,
            m.context,
            rule
        ));
    }

    DocumentText::from_pages(CONDENSED_DOCUMENT_NAME, vec![text])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PatternTable {
        PatternTable::builtin().unwrap()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_builtin_table_order() {
        let table = table();
        let order: Vec<&str> = table.iter().map(|p| p.name()).collect();
        assert_eq!(order.len(), 14);
        assert_eq!(order[0], "israel");
        assert_eq!(order[3], "complaint");
        assert_eq!(order[13], "china");
    }

    #[test]
    fn test_extract_entities_case_insensitive() {
        let entities = table().extract_entities("Report from ISRAELI and British sites");
        assert_eq!(entities, names(&["israel", "complaint", "uk"]));
    }

    #[test]
    fn test_word_boundaries_respected() {
        let table = table();
        // "complaints" is not the word "complaint"; "unsubstantiated" is not "substantiated"
        assert!(table.extract_entities("complaints").is_empty());
        assert_eq!(
            table.extract_entities("unsubstantiated"),
            names(&["unsubstantiated"])
        );
    }

    #[test]
    fn test_scan_is_conjunctive() {
        let text = "Israel only here\nUSA only here\nIsrael and USA together\nneither";
        let matches = table().scan(text, &names(&["israel", "usa"]), 0);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line_number, 3);
        assert_eq!(matches[0].line_text, "Israel and USA together");
        assert_eq!(matches[0].matched_entities, names(&["israel", "usa"]));
    }

    #[test]
    fn test_scan_single_entity_lines() {
        let text = "Israel complaint line one\nUSA complaint line two\nIsrael and USA both here";
        let matches = table().scan(text, &names(&["israel"]), DEFAULT_CONTEXT_LINES);

        let lines: Vec<usize> = matches.iter().map(|m| m.line_number).collect();
        assert_eq!(lines, vec![1, 3]);
    }

    #[test]
    fn test_scan_context_is_clipped_to_bounds() {
        let text = "a\nb\nIsrael\nc\nd\ne";
        let matches = table().scan(text, &names(&["israel"]), 2);
        assert_eq!(matches[0].context, "a\nb\nIsrael\nc\nd");

        let edge = table().scan("Israel\nx\ny\nz", &names(&["israel"]), 2);
        assert_eq!(edge[0].context, "Israel\nx\ny");
    }

    #[test]
    fn test_scan_line_text_is_trimmed() {
        let matches = table().scan("   Israel   \nnext", &names(&["israel"]), 1);
        assert_eq!(matches[0].line_text, "Israel");
        assert_eq!(matches[0].context, "   Israel   \nnext");
    }

    #[test]
    fn test_scan_unknown_or_no_entities() {
        let table = table();
        assert!(table.scan("anything at all", &names(&["atlantis"]), 2).is_empty());
        assert!(table.scan("anything at all", &[], 2).is_empty());
    }

    #[test]
    fn test_scan_skips_unknown_entities() {
        let text = "Israel one\nUSA two\nIsrael again";
        let matches = table().scan(text, &names(&["israel", "atlantis"]), 0);

        let lines: Vec<usize> = matches.iter().map(|m| m.line_number).collect();
        assert_eq!(lines, vec![1, 3]);
        assert_eq!(matches[0].matched_entities, names(&["israel"]));
    }

    #[test]
    fn test_counting_search_summary() {
        let text = "Israel complaint line one\nUSA complaint line two\nIsrael and USA both here";
        let search = table().execute_counting_search(
            "How many complaints are from Israel?",
            text,
            DEFAULT_CONTEXT_LINES,
            DEFAULT_MAX_MATCHES,
        );

        assert!(search.is_counting_query);
        assert_eq!(search.entities_searched, names(&["israel"]));
        assert_eq!(search.total_matches, 2);
        assert_eq!(
            search.summary,
            "Found 2 occurrences matching all entities: israel\n\nSample matches:\
             \n- Line 1: Israel complaint line one...\
             \n- Line 3: Israel and USA both here..."
        );
    }

    #[test]
    fn test_counting_search_caps_matches_but_counts_all() {
        let text = vec!["Israel"; 60].join("\n");
        let search = table().execute_counting_search("count israel", &text, 0, 50);

        assert_eq!(search.total_matches, 60);
        assert_eq!(search.matches.len(), 50);
        assert_eq!(search.summary.matches("\n- Line").count(), 3);
    }

    #[test]
    fn test_counting_search_without_matches() {
        let search = table().execute_counting_search("how many from Japan or China", "nothing", 2, 50);
        assert_eq!(search.total_matches, 0);
        assert_eq!(search.summary, "No matches found for entities: japan, china");
    }

    #[test]
    fn test_summary_clips_long_lines() {
        let long = format!("Israel {}", "x".repeat(300));
        let search = table().execute_counting_search("total israel", &long, 0, 50);
        let sample = search.summary.lines().last().unwrap();
        assert_eq!(sample, format!("- Line 1: {}...", clip(&long, 100)));
    }

    #[test]
    fn test_condensed_document_layout() {
        let text = "Israel one\nfiller\nIsrael two";
        let search = table().execute_counting_search("how many israel", text, 0, 50);
        let doc = condensed_document(&search, 50);
        let rule = "-".repeat(80);

        assert_eq!(doc.file_name, CONDENSED_DOCUMENT_NAME);
        assert_eq!(doc.total_pages, 1);
        assert_eq!(
            doc.full_text,
            format!(
                "Relevant sections extracted by pattern matching:\n\n\
                 Match 1 (Line 1):\nIsrael one\n{rule}\n\n\
                 Match 2 (Line 3):\nIsrael two\n{rule}\n\n"
            )
        );
        assert_eq!(doc.pages[0].text, doc.full_text);
    }

    #[test]
    fn test_overrides_replace_and_extend() {
        let overrides = vec![
            PatternConfig {
                name: "Israel".to_string(),
                pattern: r"\b(il)\b".to_string(),
            },
            PatternConfig {
                name: "brazil".to_string(),
                pattern: r"\b(brazil|brazilian)\b".to_string(),
            },
        ];
        let table = PatternTable::with_overrides(&overrides).unwrap();

        assert_eq!(table.len(), 15);
        assert_eq!(table.iter().next().unwrap().source(), r"\b(il)\b");
        assert!(!table.get("israel").unwrap().is_match("Israel"));
        assert!(table.get("brazil").unwrap().is_match("BRAZILIAN"));
    }

    #[test]
    fn test_duplicate_or_invalid_overrides_rejected() {
        let dup = vec![
            PatternConfig {
                name: "x".to_string(),
                pattern: "x".to_string(),
            },
            PatternConfig {
                name: "X".to_string(),
                pattern: "y".to_string(),
            },
        ];
        assert!(matches!(
            PatternTable::with_overrides(&dup),
            Err(AppError::Config(_))
        ));

        let bad = vec![PatternConfig {
            name: "broken".to_string(),
            pattern: "(unclosed".to_string(),
        }];
        assert!(PatternTable::with_overrides(&bad).is_err());
    }
}
