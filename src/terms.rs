//! # Uncommon Term Identification Module
//!
//! ## Purpose
//! Finds the words and phrases a lay reader is unlikely to know: legal
//! vocabulary present in the text, tokens outside the common-word list, and
//! compound/hyphenated terms. Each candidate is resolved to a definition
//! through the dictionary service; candidates with no resolvable definition
//! are dropped silently.
//!
//! ## Input/Output Specification
//! - **Input**: Normalized document text
//! - **Output**: Deduplicated `UncommonTermEntry` list, legal terms first,
//!   then lexicographic
//! - **Guarantees**: Never fails; extraction problems yield an empty list
//!
//! ## Key Features
//! - Candidate union: verbatim legal phrases, filtered tokens, hyphenates
//!   and two/three-word windows that match a known phrase
//! - Fixed-size resolution batches with bounded concurrency per batch

use crate::dictionary::DictionaryService;
use crate::errors::{AnalysisError, Result};
use crate::UncommonTermEntry;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

/// Uncommon-term extraction and resolution pipeline
pub struct UncommonTermIdentifier {
    common_words: HashSet<String>,
    legal_terms: Vec<String>,
    legal_term_set: HashSet<String>,
    /// Phrases with a curated definition; lets multi-word windows qualify
    known_phrases: HashSet<String>,
    dictionary: Arc<DictionaryService>,
    min_word_length: usize,
    batch_size: usize,
    word_regex: Regex,
}

impl UncommonTermIdentifier {
    pub fn new(
        common_words: Vec<String>,
        legal_terms: Vec<String>,
        known_phrases: HashSet<String>,
        dictionary: Arc<DictionaryService>,
        min_word_length: usize,
        batch_size: usize,
    ) -> Result<Self> {
        let legal_terms: Vec<String> = legal_terms
            .into_iter()
            .map(|t| t.to_lowercase())
            .collect();

        Ok(Self {
            common_words: common_words.into_iter().map(|w| w.to_lowercase()).collect(),
            legal_term_set: legal_terms.iter().cloned().collect(),
            legal_terms,
            known_phrases: known_phrases
                .into_iter()
                .map(|p| p.to_lowercase())
                .collect(),
            dictionary,
            min_word_length,
            batch_size: batch_size.max(1),
            word_regex: Regex::new(r"[a-z]+(?:-[a-z]+)*").map_err(|e| {
                AnalysisError::Internal {
                    message: format!("Invalid token regex: {}", e),
                }
            })?,
        })
    }

    /// Identify uncommon terms and resolve their definitions. Never fails;
    /// candidates without a definition are dropped.
    pub async fn identify(&self, text: &str) -> Vec<UncommonTermEntry> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let candidates = self.extract_candidates(text);
        tracing::debug!(
            candidates = candidates.len(),
            "Uncommon-term candidates extracted"
        );

        let mut entries = Vec::new();
        for batch in candidates.chunks(self.batch_size) {
            let lookups = batch.iter().map(|word| async move {
                self.dictionary
                    .get_definition(word)
                    .await
                    .map(|definition| UncommonTermEntry {
                        word: word.clone(),
                        definition: definition.definition,
                        source: definition.source,
                    })
            });
            entries.extend(
                futures::future::join_all(lookups)
                    .await
                    .into_iter()
                    .flatten(),
            );
        }

        tracing::debug!(resolved = entries.len(), "Uncommon terms identified");
        entries
    }

    /// Build the deduplicated, ordered candidate set.
    fn extract_candidates(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let words: Vec<String> = self
            .word_regex
            .find_iter(&lower)
            .map(|m| m.as_str().to_string())
            .collect();

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        let mut push = |term: String| {
            if seen.insert(term.clone()) {
                candidates.push(term);
            }
        };

        // Legal-vocabulary phrases present verbatim.
        for term in &self.legal_terms {
            if lower.contains(term.as_str()) {
                push(term.clone());
            }
        }

        // Tokens that are neither common English nor legal vocabulary.
        for word in &words {
            if word.chars().count() >= self.min_word_length
                && !self.common_words.contains(word)
                && !self.legal_term_set.contains(word)
            {
                push(word.clone());
            }
        }

        // Compound terms: hyphenates plus two/three-word windows that match
        // a known phrase.
        for (i, word) in words.iter().enumerate() {
            if word.contains('-') {
                push(word.clone());
            }

            if i + 1 < words.len() {
                let two = format!("{} {}", words[i], words[i + 1]);
                if self.is_known_phrase(&two) {
                    push(two);
                }
            }
            if i + 2 < words.len() {
                let three = format!("{} {} {}", words[i], words[i + 1], words[i + 2]);
                if self.is_known_phrase(&three) {
                    push(three);
                }
            }
        }

        // Legal vocabulary first, then lexicographic within each class.
        candidates.sort_by(|a, b| {
            let a_legal = self.legal_term_set.contains(a);
            let b_legal = self.legal_term_set.contains(b);
            match (a_legal, b_legal) {
                (true, false) => std::cmp::Ordering::Less,
                (false, true) => std::cmp::Ordering::Greater,
                _ => a.cmp(b),
            }
        });

        candidates
    }

    fn is_known_phrase(&self, phrase: &str) -> bool {
        self.legal_term_set.contains(phrase) || self.known_phrases.contains(phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dictionary::corpora::DictionaryCorpora;
    use crate::vocabulary;
    use std::collections::HashMap;

    async fn identifier() -> UncommonTermIdentifier {
        let config = Config::default();
        let service = Arc::new(DictionaryService::with_corpora(
            &config.dictionary,
            vocabulary::legal_definitions(),
            DictionaryCorpora::empty(),
            None,
        ));
        UncommonTermIdentifier::new(
            vocabulary::default_common_words(),
            vocabulary::default_legal_terms(),
            vocabulary::legal_definitions().keys().cloned().collect(),
            service,
            config.analysis.min_word_length,
            config.dictionary.batch_size,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn empty_text_yields_no_terms() {
        let id = identifier().await;
        assert!(id.identify("").await.is_empty());
    }

    #[tokio::test]
    async fn finds_legal_phrases_with_definitions() {
        let id = identifier().await;
        let entries = id
            .identify("The eula includes an indemnity clause and a privacy policy.")
            .await;
        let words: Vec<&str> = entries.iter().map(|e| e.word.as_str()).collect();
        assert!(words.contains(&"eula"));
        assert!(words.contains(&"indemnity"));
        assert!(words.contains(&"privacy policy"));
    }

    #[tokio::test]
    async fn never_returns_duplicate_words() {
        let id = identifier().await;
        let entries = id
            .identify("indemnity indemnity indemnity warranty warranty")
            .await;
        let mut words: Vec<&str> = entries.iter().map(|e| e.word.as_str()).collect();
        let before = words.len();
        words.sort();
        words.dedup();
        assert_eq!(words.len(), before);
    }

    #[tokio::test]
    async fn unresolvable_candidates_are_dropped_silently() {
        let id = identifier().await;
        let entries = id.identify("the frobnicator reticulates splines").await;
        assert!(entries
            .iter()
            .all(|e| e.word != "frobnicator" && e.word != "reticulates"));
    }

    #[tokio::test]
    async fn legal_terms_sort_before_other_candidates() {
        let id = identifier().await;
        let candidates =
            id.extract_candidates("zygote arbitration warranty and the eula apply here");
        let first_non_legal = candidates
            .iter()
            .position(|c| !id.legal_term_set.contains(c));
        if let Some(split) = first_non_legal {
            assert!(candidates[split..]
                .iter()
                .all(|c| !id.legal_term_set.contains(c)));
        }
    }

    #[tokio::test]
    async fn two_word_windows_match_known_phrases() {
        let id = identifier().await;
        let candidates = id.extract_candidates("we respect fair use principles");
        assert!(candidates.iter().any(|c| c == "fair use"));
    }

    #[tokio::test]
    async fn hyphenated_tokens_are_candidates() {
        let id = identifier().await;
        let candidates = id.extract_candidates("a non-disclosure agreement applies");
        assert!(candidates.iter().any(|c| c == "non-disclosure"));
    }

    #[tokio::test]
    async fn short_tokens_are_filtered() {
        let config = Config::default();
        let service = Arc::new(DictionaryService::with_corpora(
            &config.dictionary,
            HashMap::new(),
            DictionaryCorpora::empty(),
            None,
        ));
        let id = UncommonTermIdentifier::new(
            vec![],
            vec![],
            HashSet::new(),
            service,
            3,
            50,
        )
        .unwrap();
        let candidates = id.extract_candidates("an ox is on my lawn");
        assert!(candidates.iter().all(|c| c.chars().count() >= 3));
    }
}
