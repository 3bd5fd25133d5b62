//! # Readability Grading Module
//!
//! ## Purpose
//! Grades how hard a document is to read by combining three classical
//! readability formulas (Flesch Reading Ease, Flesch-Kincaid Grade Level,
//! Gunning Fog Index) into a single letter grade.
//!
//! ## Input/Output Specification
//! - **Input**: Normalized document text
//! - **Output**: `ReadabilityResult` with three sub-scores and a letter grade
//! - **Guarantees**: All numeric outputs are finite; empty or unusable input
//!   yields the N/A default without failing
//!
//! ## Key Features
//! - Data-driven syllable heuristics: vowel-cluster base count corrected by
//!   tunable subtractive/additive pattern tables
//! - Zero-denominator guards on every formula
//! - Composite normalization to a 0-100 scale, fixed letter breakpoints and
//!   a grade-level fine-tune rule

use crate::errors::{AnalysisError, Result};
use crate::{Grade, ReadabilityResult};
use regex::Regex;

/// Patterns that overcount a syllable in the vowel-cluster base count.
const SUBTRACTIVE_PATTERNS: &[&str] = &[
    "cial", "tia", "cius", "cious", "giu", "ion", "iou", "sia$", ".ely$", "sed$",
];

/// Patterns the vowel-cluster base count misses.
const ADDITIVE_PATTERNS: &[&str] = &[
    "ia",
    "riet",
    "dien",
    "iu",
    "io",
    "ii",
    "[aeiouym]bl$",
    "[aeiou]{3}",
    "^mc",
    "ism$",
    "[^l]lien",
    "^coa[dglx].",
    "[^gq]ua[^auieo]",
    "dnt$",
    // doubled consonant + l, as in "paddle" or "struggle"
    "(?:bbl|ccl|ddl|ffl|ggl|hhl|jjl|kkl|lll|mml|nnl|ppl|rrl|ssl|ttl|vvl|zzl)$",
];

/// Words with this many syllables or more count as complex for the Fog index.
const COMPLEX_WORD_SYLLABLES: usize = 3;

/// Readability grading pipeline
pub struct ReadabilityGrader {
    subtractive: Vec<Regex>,
    additive: Vec<Regex>,
    word_regex: Regex,
}

impl ReadabilityGrader {
    /// Create a grader, compiling the syllable pattern tables.
    pub fn new() -> Result<Self> {
        let compile = |patterns: &[&str]| -> Result<Vec<Regex>> {
            patterns
                .iter()
                .map(|p| {
                    Regex::new(p).map_err(|e| AnalysisError::Internal {
                        message: format!("Invalid syllable pattern '{}': {}", p, e),
                    })
                })
                .collect()
        };

        Ok(Self {
            subtractive: compile(SUBTRACTIVE_PATTERNS)?,
            additive: compile(ADDITIVE_PATTERNS)?,
            word_regex: Regex::new(r"\b[\w']+(?:-[\w']+)*\b").map_err(|e| {
                AnalysisError::Internal {
                    message: format!("Invalid word regex: {}", e),
                }
            })?,
        })
    }

    /// Grade the text. Any internal failure degrades to the N/A default.
    pub fn grade(&self, text: &str) -> ReadabilityResult {
        match self.try_grade(text) {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(error = %e, "Readability grading degraded to N/A");
                ReadabilityResult::not_applicable()
            }
        }
    }

    fn try_grade(&self, text: &str) -> Result<ReadabilityResult> {
        if text.trim().is_empty() {
            return Err(AnalysisError::InvalidInput {
                details: "empty text for readability analysis".to_string(),
            });
        }

        let words = self.extract_words(text);
        if words.is_empty() {
            return Err(AnalysisError::NoWords);
        }

        let sentence_count = split_into_sentences(text).len();
        let word_count = split_into_words(text).len();
        let syllable_count: usize = words.iter().map(|w| self.count_syllables_in_word(w)).sum();
        let complex_count = words
            .iter()
            .filter(|w| self.count_syllables_in_word(w) >= COMPLEX_WORD_SYLLABLES)
            .count();

        tracing::debug!(
            sentences = sentence_count,
            words = word_count,
            syllables = syllable_count,
            complex_words = complex_count,
            "Readability counts"
        );

        // Zero-denominator guard: degenerate texts score 0 on all formulas.
        let (flesch, kincaid, fog) = if sentence_count == 0 || word_count == 0 {
            (0.0, 0.0, 0.0)
        } else {
            let words_per_sentence = word_count as f64 / sentence_count as f64;
            let syllables_per_word = syllable_count as f64 / word_count as f64;
            let complex_ratio = complex_count as f64 / word_count as f64;
            (
                206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word,
                0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59,
                0.4 * (words_per_sentence + 100.0 * complex_ratio),
            )
        };

        if !flesch.is_finite() || !kincaid.is_finite() || !fog.is_finite() {
            return Err(AnalysisError::Computation {
                formula: "readability".to_string(),
                details: format!("flesch={} kincaid={} fog={}", flesch, kincaid, fog),
            });
        }

        let normalized_flesch = ((120.0 - flesch) / 120.0).clamp(0.0, 1.0);
        let normalized_kincaid = (kincaid / 18.0).clamp(0.0, 1.0);
        let normalized_fog = (fog / 18.0).clamp(0.0, 1.0);
        let composite =
            100.0 * (0.4 * normalized_flesch + 0.3 * normalized_kincaid + 0.3 * normalized_fog);

        let grade = Self::letter_grade(composite, kincaid, fog);
        let confidence = (word_count as f64 / 100.0).min(1.0);

        tracing::debug!(composite, %grade, "Readability grade computed");

        Ok(ReadabilityResult {
            flesch,
            kincaid,
            fog_index: fog,
            average_grade: grade,
            confidence,
        })
    }

    /// Map the composite score to a letter, then fine-tune: a grade-level
    /// score above 12 on either Kincaid or Fog costs one letter.
    fn letter_grade(composite: f64, kincaid: f64, fog: f64) -> Grade {
        let base = match composite {
            c if c <= 30.0 => Grade::A,
            c if c <= 50.0 => Grade::B,
            c if c <= 70.0 => Grade::C,
            c if c <= 90.0 => Grade::D,
            _ => Grade::F,
        };

        if kincaid > 12.0 || fog > 12.0 {
            base.downgraded()
        } else {
            base
        }
    }

    /// Count syllables in one word. Words of three characters or fewer are
    /// one syllable; everything else floors at one.
    pub fn count_syllables_in_word(&self, word: &str) -> usize {
        let cleaned: String = word
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();

        if cleaned.is_empty() {
            return 0;
        }
        if cleaned.chars().count() <= 3 {
            return 1;
        }

        // Strip the trailing silent e / -es / -ed, then a leading y.
        let mut stem = cleaned.as_str();
        if stem.ends_with("es") || stem.ends_with("ed") {
            stem = &stem[..stem.len() - 2];
        } else if stem.ends_with('e') {
            stem = &stem[..stem.len() - 1];
        }
        let stem = stem.strip_prefix('y').unwrap_or(stem);

        let base = vowel_groups(stem) as isize;
        let subtract = self.subtractive.iter().filter(|re| re.is_match(stem)).count() as isize;
        let add = self.additive.iter().filter(|re| re.is_match(stem)).count() as isize;

        (base - subtract + add).max(1) as usize
    }

    /// Total syllables across the text.
    pub fn count_syllables(&self, text: &str) -> usize {
        self.extract_words(text)
            .iter()
            .map(|w| self.count_syllables_in_word(w))
            .sum()
    }

    fn extract_words(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        self.word_regex
            .find_iter(&lower)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Split on terminal punctuation runs, dropping empty fragments.
fn split_into_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split on whitespace, dropping empty fragments.
fn split_into_words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Count `[aeiouy]{1,2}` clusters: a run of vowels yields one cluster per
/// two vowels, rounding up.
fn vowel_groups(word: &str) -> usize {
    let mut groups = 0;
    let mut run = 0;
    for ch in word.chars() {
        if matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u' | 'y') {
            run += 1;
        } else {
            groups += (run + 1) / 2;
            run = 0;
        }
    }
    groups + (run + 1) / 2
}
