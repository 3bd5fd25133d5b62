//! # Section Summarization Module
//!
//! ## Purpose
//! Produces a section-level summary of a Terms of Service document by
//! heuristic sentence selection: for each headed section, keep the first
//! sentence, any sentence carrying legal vocabulary, and the last sentence.
//!
//! ## Input/Output Specification
//! - **Input**: Plain document text with heading-structured sections
//! - **Output**: `TosSummary` with per-section summaries and an overall
//!   digest
//! - **Guarantees**: One bad section degrades that section only; never fails
//!
//! A heading is a short line without terminal punctuation, optionally
//! numbered ("7. Termination"). Text before the first heading is not part of
//! any section.

use crate::errors::Result;
use crate::AnalysisError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Longest line still considered a heading
const MAX_HEADING_LENGTH: usize = 80;

/// Summary of one headed section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSummary {
    pub heading: String,
    pub summary: String,
    pub original_text: String,
    pub error: Option<String>,
}

/// Full document summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TosSummary {
    /// Concatenated "## heading / summary" digest
    pub overall: String,
    pub sections: Vec<SectionSummary>,
    pub section_count: usize,
    pub error: Option<String>,
}

/// Heuristic sentence-selection summarizer
pub struct Summarizer {
    legal_terms: Vec<String>,
    sentence_regex: Regex,
    numbered_heading: Regex,
}

impl Summarizer {
    pub fn new(legal_terms: Vec<String>) -> Result<Self> {
        Ok(Self {
            legal_terms: legal_terms.into_iter().map(|t| t.to_lowercase()).collect(),
            sentence_regex: Regex::new(r"[^.!?]+[.!?]+").map_err(|e| {
                AnalysisError::Internal {
                    message: format!("Invalid sentence regex: {}", e),
                }
            })?,
            numbered_heading: Regex::new(r"^\d+(?:\.\d+)*\.?\s+\S").map_err(|e| {
                AnalysisError::Internal {
                    message: format!("Invalid heading regex: {}", e),
                }
            })?,
        })
    }

    /// Summarize the document. Never fails; a document without headed
    /// sections yields an empty summary.
    pub fn summarize(&self, text: &str) -> TosSummary {
        let sections = self.identify_sections(text);
        tracing::debug!(section_count = sections.len(), "Sections identified");

        let summaries: Vec<SectionSummary> = sections
            .into_iter()
            .map(|(heading, content)| match self.summarize_section(&content) {
                Ok(summary) => SectionSummary {
                    heading,
                    summary,
                    original_text: content,
                    error: None,
                },
                Err(e) => SectionSummary {
                    heading,
                    summary: "Error summarizing this section.".to_string(),
                    original_text: content,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        let overall = summaries
            .iter()
            .map(|s| format!("## {}\n{}", s.heading, s.summary))
            .collect::<Vec<_>>()
            .join("\n\n");

        TosSummary {
            overall,
            section_count: summaries.len(),
            sections: summaries,
            error: None,
        }
    }

    /// Split plain text into (heading, content) pairs. Sections without
    /// content are dropped, matching the presentation behavior.
    fn identify_sections(&self, text: &str) -> Vec<(String, String)> {
        let mut sections = Vec::new();
        let mut heading: Option<String> = None;
        let mut content = String::new();

        let mut close = |heading: &mut Option<String>, content: &mut String,
                         sections: &mut Vec<(String, String)>| {
            if let Some(h) = heading.take() {
                let body = content.trim().to_string();
                if !body.is_empty() {
                    sections.push((h, body));
                }
            }
            content.clear();
        };

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if self.is_heading(line) {
                close(&mut heading, &mut content, &mut sections);
                heading = Some(line.to_string());
            } else if heading.is_some() {
                if !content.is_empty() {
                    content.push(' ');
                }
                content.push_str(line);
            }
        }
        close(&mut heading, &mut content, &mut sections);

        sections
    }

    /// A short line with no terminal punctuation, or a numbered heading.
    fn is_heading(&self, line: &str) -> bool {
        if line.len() > MAX_HEADING_LENGTH {
            return false;
        }
        if self.numbered_heading.is_match(line) {
            return true;
        }
        !line.ends_with(['.', '!', '?', ':', ';', ','])
            && line.split_whitespace().count() <= 8
    }

    /// First sentence, every sentence containing legal vocabulary, last
    /// sentence; deduplicated, document order.
    fn summarize_section(&self, content: &str) -> Result<String> {
        let mut sentences: Vec<String> = self
            .sentence_regex
            .find_iter(content)
            .map(|m| m.as_str().trim().to_string())
            .collect();

        if sentences.is_empty() {
            let trimmed = content.trim();
            if trimmed.is_empty() {
                return Ok(String::new());
            }
            sentences.push(trimmed.to_string());
        }

        let last_index = sentences.len() - 1;
        let mut selected = Vec::new();
        let mut seen = HashSet::new();

        for (i, sentence) in sentences.iter().enumerate() {
            let lower = sentence.to_lowercase();
            let keep = i == 0
                || i == last_index
                || self.legal_terms.iter().any(|t| lower.contains(t.as_str()));
            if keep && seen.insert(sentence.clone()) {
                selected.push(sentence.clone());
            }
        }

        Ok(selected.join(" "))
    }
}
