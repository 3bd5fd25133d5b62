//! # Rights Assessment Module
//!
//! ## Purpose
//! Scores how favorable a document's language is to the user by counting
//! permissive, restrictive and duty phrases over sentence-aligned chunks and
//! averaging the per-chunk scores.
//!
//! ## Input/Output Specification
//! - **Input**: Normalized document text, phrase pattern sets
//! - **Output**: `RightsResult` with a score in [0, 1] and the chunk count
//! - **Guarantees**: Never fails; texts with no pattern hits score the
//!   neutral 0.5 default
//!
//! ## Key Features
//! - Chunking along sentence boundaries, never mid-sentence; an oversized
//!   sentence becomes its own chunk
//! - Case-insensitive substring counting over three fixed pattern sets
//! - Chunking failure falls back to the whole text as a single chunk

use crate::vocabulary::{NEGATIVE_PATTERNS, OBLIGATION_PATTERNS, POSITIVE_PATTERNS};
use crate::RightsResult;
use regex::Regex;

/// Confidence reported while pattern scoring stands in for a trained model.
const PATTERN_CONFIDENCE: f64 = 0.7;

/// Rights-pattern scoring pipeline
pub struct RightsAssessor {
    positive: Vec<String>,
    negative: Vec<String>,
    obligations: Vec<String>,
    chunk_size: usize,
    sentence_regex: Regex,
}

impl RightsAssessor {
    /// Create an assessor with the built-in pattern sets.
    pub fn new(chunk_size: usize) -> Self {
        Self::with_patterns(
            POSITIVE_PATTERNS.iter().map(|s| s.to_string()).collect(),
            NEGATIVE_PATTERNS.iter().map(|s| s.to_string()).collect(),
            OBLIGATION_PATTERNS.iter().map(|s| s.to_string()).collect(),
            chunk_size,
        )
    }

    /// Create an assessor with caller-supplied pattern sets.
    pub fn with_patterns(
        positive: Vec<String>,
        negative: Vec<String>,
        obligations: Vec<String>,
        chunk_size: usize,
    ) -> Self {
        let lower = |patterns: Vec<String>| -> Vec<String> {
            patterns.into_iter().map(|p| p.to_lowercase()).collect()
        };
        Self {
            positive: lower(positive),
            negative: lower(negative),
            obligations: lower(obligations),
            chunk_size: chunk_size.max(1),
            // A sentence is any run of text up to its terminal punctuation.
            sentence_regex: Regex::new(r"[^.!?]+[.!?]+").unwrap(),
        }
    }

    /// Assess the text. Never fails; degenerate input yields the neutral
    /// default.
    pub fn assess(&self, text: &str) -> RightsResult {
        let chunks = self.chunk_text(text);
        if chunks.is_empty() {
            return RightsResult::neutral();
        }

        let total: f64 = chunks.iter().map(|c| self.score_chunk(c)).sum();
        let score = (total / chunks.len() as f64).clamp(0.0, 1.0);

        tracing::debug!(
            chunk_count = chunks.len(),
            score,
            "Rights assessment complete"
        );

        RightsResult {
            score,
            chunk_count: chunks.len(),
            confidence: PATTERN_CONFIDENCE,
        }
    }

    /// Chunk into segments of at most `chunk_size` characters along sentence
    /// boundaries. Text without terminal punctuation becomes one chunk.
    fn chunk_text(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut sentences: Vec<&str> = Vec::new();
        let mut last_end = 0;
        for m in self.sentence_regex.find_iter(text) {
            sentences.push(m.as_str());
            last_end = m.end();
        }

        // Keep any trailing fragment after the last terminal punctuation.
        let remainder = text[last_end..].trim();
        if !remainder.is_empty() {
            sentences.push(remainder);
        }

        if sentences.is_empty() {
            return vec![text.trim().to_string()];
        }

        let mut chunks = Vec::new();
        let mut current = String::new();
        for sentence in sentences {
            if current.len() + sentence.len() > self.chunk_size {
                if !current.is_empty() {
                    chunks.push(current.trim().to_string());
                }
                current = sentence.to_string();
            } else {
                current.push(' ');
                current.push_str(sentence);
            }
        }
        if !current.trim().is_empty() {
            chunks.push(current.trim().to_string());
        }

        chunks
    }

    /// Score one chunk: `1 - (negative + obligations) / (2 * total)`,
    /// clamped to [0, 1]; chunks without any hits are neutral.
    fn score_chunk(&self, chunk: &str) -> f64 {
        let lower = chunk.to_lowercase();
        let count = |patterns: &[String]| -> usize {
            patterns
                .iter()
                .map(|p| lower.match_indices(p.as_str()).count())
                .sum()
        };

        let positive = count(&self.positive);
        let negative = count(&self.negative);
        let obligations = count(&self.obligations);
        let total = positive + negative + obligations;

        if total == 0 {
            return 0.5;
        }

        let score = 1.0 - (negative + obligations) as f64 / (2.0 * total as f64);
        score.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessor() -> RightsAssessor {
        RightsAssessor::new(500)
    }

    #[test]
    fn empty_text_is_neutral() {
        let result = assessor().assess("");
        assert_eq!(result.score, 0.5);
        assert_eq!(result.chunk_count, 0);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn text_without_patterns_is_neutral() {
        let result = assessor().assess("The sky is blue. Water is wet.");
        assert_eq!(result.score, 0.5);
        assert_eq!(result.chunk_count, 1);
    }

    #[test]
    fn permissive_language_scores_high() {
        let result = assessor().assess(
            "You may share your content. You are entitled to a copy of your data. \
             You are permitted to cancel at any time.",
        );
        assert!(result.score > 0.8);
    }

    #[test]
    fn restrictive_language_scores_lower_than_permissive() {
        let a = assessor();
        let permissive = a.assess("You may export your data. You are allowed to unsubscribe.");
        let restrictive = a.assess(
            "You shall not copy the service. Users are prohibited from reverse engineering. \
             You waive all claims and must arbitrate disputes.",
        );
        assert!(restrictive.score < permissive.score);
    }

    #[test]
    fn score_is_always_in_unit_interval() {
        let a = assessor();
        for text in [
            "must must must shall shall.",
            "grant grant grant.",
            "you may not waive; you must forfeit. prohibited!",
            "x.",
        ] {
            let score = a.assess(text).score;
            assert!((0.0..=1.0).contains(&score), "score {} for {:?}", score, text);
        }
    }

    #[test]
    fn never_splits_mid_sentence() {
        let a = RightsAssessor::new(40);
        let text = "This sentence is clearly much longer than the configured chunk size limit. \
                    Short one. Another short one.";
        let result = a.assess(text);
        // Oversized first sentence becomes its own chunk.
        assert!(result.chunk_count >= 2);
    }

    #[test]
    fn unpunctuated_text_is_one_chunk() {
        let result = assessor().assess("you must agree to these terms");
        assert_eq!(result.chunk_count, 1);
        assert!(result.score < 1.0);
    }
}
