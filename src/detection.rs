//! # Legal Term Detection Module
//!
//! ## Purpose
//! Detects legal/contractual vocabulary in normalized text and turns the hit
//! count into the gating decision that drives the orchestrator.
//!
//! ## Input/Output Specification
//! - **Input**: Normalized text, legal-vocabulary phrase set, thresholds
//! - **Output**: `TermMatch` records, hit counts, `GateDecision`
//! - **Signals**: Exact containment, alternation-regex match, proximity match
//!
//! ## Key Features
//! - Three independent match signals; the regex signal is a resilient
//!   superset of exact containment and survives malformed phrase boundaries
//! - Proximity matching over a ±N word window anchored at multi-word phrases
//! - Inclusive threshold gating (AUTO_GRADE / NOTIFY / suppress)
//! - Legal-term density for section ranking

use crate::config::DetectionConfig;
use crate::errors::{AnalysisError, Result};
use crate::{MatchKind, TermMatch};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Gating decision derived from the legal-term hit count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateDecision {
    /// Enough hits to run the full analysis automatically
    AutoGrade,
    /// Enough hits to prompt the user, not enough to auto-analyze
    Notify,
    /// Too few hits; do nothing
    Suppress,
}

/// Detects legal vocabulary in text
pub struct LegalTermDetector {
    /// Lowercased vocabulary phrases, original order preserved
    vocabulary: Vec<String>,
    /// Tokenized forms of each phrase, parallel to `vocabulary`
    phrase_words: Vec<Vec<String>>,
    /// Single-token phrases, for density counting
    single_words: HashSet<String>,
    /// One alternation over the whole vocabulary
    alternation: Option<Regex>,
    config: DetectionConfig,
}

impl LegalTermDetector {
    /// Create a detector over the given vocabulary. Phrases are matched
    /// case-insensitively; empty phrases are dropped.
    pub fn new(vocabulary: Vec<String>, config: DetectionConfig) -> Result<Self> {
        let vocabulary: Vec<String> = vocabulary
            .into_iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();

        let phrase_words: Vec<Vec<String>> = vocabulary
            .iter()
            .map(|p| p.split_whitespace().map(|w| w.to_string()).collect())
            .collect();

        let single_words = vocabulary
            .iter()
            .filter(|p| !p.contains(' '))
            .cloned()
            .collect();

        let alternation = if vocabulary.is_empty() {
            None
        } else {
            let pattern = vocabulary
                .iter()
                .map(|p| regex::escape(p))
                .collect::<Vec<_>>()
                .join("|");
            Some(
                RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| AnalysisError::Internal {
                        message: format!("Invalid vocabulary alternation: {}", e),
                    })?,
            )
        };

        Ok(Self {
            vocabulary,
            phrase_words,
            single_words,
            alternation,
            config,
        })
    }

    /// Exact containment: any vocabulary phrase appears verbatim.
    pub fn contains_exact(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.vocabulary.iter().any(|p| lower.contains(p.as_str()))
    }

    /// Alternation-regex signal. Independent of `contains_exact` so a
    /// malformed phrase cannot silently disable both checks.
    pub fn contains_partial(&self, text: &str) -> bool {
        match &self.alternation {
            Some(re) => re.is_match(text),
            None => false,
        }
    }

    /// Proximity signal: a multi-word phrase occurrence with another distinct
    /// vocabulary phrase starting inside its ±radius word window.
    pub fn contains_proximity(&self, text: &str) -> bool {
        self.find_proximity_pair(text).is_some()
    }

    /// All term matches across the three signals.
    pub fn matches(&self, text: &str) -> Vec<TermMatch> {
        let lower = text.to_lowercase();
        let mut out = Vec::new();

        for phrase in &self.vocabulary {
            for (pos, _) in lower.match_indices(phrase.as_str()) {
                out.push(TermMatch {
                    term: phrase.clone(),
                    kind: MatchKind::Exact,
                    position: pos,
                });
            }
        }

        if let Some(re) = &self.alternation {
            for m in re.find_iter(text) {
                out.push(TermMatch {
                    term: m.as_str().to_lowercase(),
                    kind: MatchKind::Partial,
                    position: m.start(),
                });
            }
        }

        if let Some((anchor_idx, anchor, other_idx, other)) = self.find_proximity_pair(text) {
            out.push(TermMatch {
                term: anchor,
                kind: MatchKind::Proximity,
                position: anchor_idx,
            });
            out.push(TermMatch {
                term: other,
                kind: MatchKind::Proximity,
                position: other_idx,
            });
        }

        out
    }

    /// Count exact phrase occurrences. This is the number the gate runs on.
    pub fn count_hits(&self, text: &str) -> usize {
        let lower = text.to_lowercase();
        self.vocabulary
            .iter()
            .map(|p| lower.match_indices(p.as_str()).count())
            .sum()
    }

    /// Share of word tokens that are single-word vocabulary hits, in [0, 1].
    pub fn legal_term_density(&self, text: &str) -> f64 {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return 0.0;
        }
        let hits = words
            .iter()
            .filter(|w| self.single_words.contains(&w.to_lowercase()))
            .count();
        hits as f64 / words.len() as f64
    }

    /// Apply the inclusive gating thresholds to a hit count.
    pub fn evaluate_gate(&self, hit_count: usize) -> GateDecision {
        if hit_count >= self.config.auto_grade_threshold {
            GateDecision::AutoGrade
        } else if hit_count >= self.config.notify_threshold {
            GateDecision::Notify
        } else {
            GateDecision::Suppress
        }
    }

    /// Scan for the first proximity pair: (anchor word index, anchor phrase,
    /// other word index, other phrase). Scan order is document order; the
    /// window extends both directions, so the pair is found regardless of
    /// which phrase comes first.
    fn find_proximity_pair(&self, text: &str) -> Option<(usize, String, usize, String)> {
        let words: Vec<String> = text
            .to_lowercase()
            .split_whitespace()
            .map(|w| w.to_string())
            .collect();
        if words.is_empty() {
            return None;
        }

        let radius = self.config.proximity_radius;

        for i in 0..words.len() {
            for (a, anchor_words) in self.phrase_words.iter().enumerate() {
                // Anchors are multi-word phrases only.
                if anchor_words.len() < 2 || !phrase_at(&words, i, anchor_words) {
                    continue;
                }

                let window_start = i.saturating_sub(radius);
                let window_end = (i + anchor_words.len() + radius).min(words.len());

                for j in window_start..window_end {
                    for (b, other_words) in self.phrase_words.iter().enumerate() {
                        if b == a || !phrase_at(&words, j, other_words) {
                            continue;
                        }
                        tracing::debug!(
                            anchor = %self.vocabulary[a],
                            other = %self.vocabulary[b],
                            "Proximity match found"
                        );
                        return Some((
                            i,
                            self.vocabulary[a].clone(),
                            j,
                            self.vocabulary[b].clone(),
                        ));
                    }
                }
            }
        }

        None
    }
}

/// Check that every word of `phrase` aligns positionally starting at `idx`.
fn phrase_at(words: &[String], idx: usize, phrase: &[String]) -> bool {
    if phrase.is_empty() || idx + phrase.len() > words.len() {
        return false;
    }
    phrase.iter().enumerate().all(|(k, w)| &words[idx + k] == w)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector(vocab: &[&str]) -> LegalTermDetector {
        LegalTermDetector::new(
            vocab.iter().map(|s| s.to_string()).collect(),
            DetectionConfig {
                auto_grade_threshold: 30,
                notify_threshold: 10,
                proximity_radius: 5,
                interval_ms: 5000,
            },
        )
        .unwrap()
    }

    #[test]
    fn exact_containment_is_case_insensitive() {
        let d = detector(&["terms of service", "privacy policy"]);
        assert!(d.contains_exact("Please read our Terms of Service carefully."));
        assert!(!d.contains_exact("Nothing legal here."));
    }

    #[test]
    fn partial_matches_anywhere() {
        let d = detector(&["terms of service", "eula"]);
        assert!(d.contains_partial("the EULAs of all vendors"));
        assert!(!d.contains_partial("plain prose"));
    }

    #[test]
    fn proximity_requires_two_distinct_phrases() {
        let d = detector(&["terms of service", "privacy policy"]);
        assert!(d.contains_proximity("our terms of service and privacy policy apply"));
        // Repeats of the same phrase are not a pair.
        assert!(!d.contains_proximity("terms of service terms of service"));
    }

    #[test]
    fn proximity_is_order_independent() {
        let d = detector(&["terms of service", "privacy policy"]);
        assert!(d.contains_proximity("our terms of service and privacy policy apply"));
        assert!(d.contains_proximity("our privacy policy and terms of service apply"));
    }

    #[test]
    fn proximity_respects_the_radius() {
        let d = detector(&["terms of service", "privacy policy"]);
        let filler = "lorem ".repeat(12);
        let far = format!("terms of service {} privacy policy", filler.trim());
        assert!(!d.contains_proximity(&far));
    }

    #[test]
    fn single_word_phrases_cannot_anchor_proximity() {
        let d = detector(&["privacy", "terms"]);
        assert!(!d.contains_proximity("privacy terms"));
    }

    #[test]
    fn gate_boundaries_are_inclusive() {
        let d = detector(&["terms"]);
        assert_eq!(d.evaluate_gate(30), GateDecision::AutoGrade);
        assert_eq!(d.evaluate_gate(29), GateDecision::Notify);
        assert_eq!(d.evaluate_gate(10), GateDecision::Notify);
        assert_eq!(d.evaluate_gate(9), GateDecision::Suppress);
        assert_eq!(d.evaluate_gate(0), GateDecision::Suppress);
    }

    #[test]
    fn count_hits_counts_every_occurrence() {
        let d = detector(&["warranty"]);
        assert_eq!(d.count_hits("warranty warranty WARRANTY"), 3);
    }

    #[test]
    fn density_of_empty_text_is_zero() {
        let d = detector(&["liability"]);
        assert_eq!(d.legal_term_density(""), 0.0);
        let density = d.legal_term_density("liability is broad liability");
        assert!(density > 0.0 && density <= 1.0);
    }

    #[test]
    fn matches_reports_kinds_and_positions() {
        let d = detector(&["eula"]);
        let matches = d.matches("the eula applies");
        assert!(matches
            .iter()
            .any(|m| m.kind == MatchKind::Exact && m.position == 4));
        assert!(matches.iter().any(|m| m.kind == MatchKind::Partial));
    }

    #[test]
    fn empty_vocabulary_matches_nothing() {
        let d = detector(&[]);
        assert!(!d.contains_exact("terms of service"));
        assert!(!d.contains_partial("terms of service"));
        assert!(d.matches("terms of service").is_empty());
    }
}
