//! # Terms Guardian Analysis Engine
//!
//! ## Overview
//! This library implements the document analysis core behind Terms Guardian:
//! it takes arbitrary legal/contractual prose (Terms of Service, EULAs,
//! policies) and produces a structured assessment combining a readability
//! grade, a rights-favorability score, a section-level summary and a list of
//! uncommon legal terms with definitions.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `normalize`: Whitespace/control-character normalization of raw text
//! - `detection`: Legal-term detection (exact, partial, proximity) and gating
//! - `readability`: Sentence/word/syllable counting and readability grading
//! - `rights`: Chunked rights-pattern scoring
//! - `terms`: Uncommon-term identification with definition resolution
//! - `dictionary`: Layered, TTL-cached definition lookup service
//! - `analyzer`: Orchestration of the concurrent analysis pipeline
//! - `summarizer`: Heuristic section-level summarization
//! - `api`: REST boundary for the extraction/presentation layer
//! - `config`: Configuration management and settings
//! - `errors`: Centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: Plain document text with optional provenance (URL, title)
//! - **Output**: Immutable `AnalysisResult` records plus incremental updates
//! - **Guarantee**: No analysis path panics on malformed input; degraded
//!   defaults are returned instead
//!
//! ## Usage
//! ```rust,no_run
//! use terms_guardian::{Analyzer, Config, Document, Trigger};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config.toml")?;
//!     let analyzer = Analyzer::new(std::sync::Arc::new(config)).await?;
//!     let document = Document::new("These terms of service govern your use...");
//!     let outcome = analyzer.analyze(document, Trigger::Manual).await?;
//!     println!("Outcome: {:?}", outcome);
//!     Ok(())
//! }
//! ```

// Core modules
pub mod config;
pub mod errors;
pub mod normalize;
pub mod detection;
pub mod readability;
pub mod rights;
pub mod terms;
pub mod dictionary;
pub mod analyzer;
pub mod summarizer;
pub mod vocabulary;
pub mod api;

// Utilities
pub mod utils;

// Re-exports for convenience
pub use analyzer::{Analyzer, AnalysisOutcome, SkipReason, Trigger};
pub use config::Config;
pub use errors::{AnalysisError, Result};
pub use summarizer::{SectionSummary, Summarizer, TosSummary};

// Core types used throughout the system
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for one analysis run
pub type AnalysisId = Uuid;

/// A document handed to the pipeline. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Full document text
    pub text: String,
    /// Source URL, if the text came from a page
    pub url: Option<String>,
    /// Page or document title
    pub title: Option<String>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
            title: None,
        }
    }

    pub fn with_provenance(
        text: impl Into<String>,
        url: Option<String>,
        title: Option<String>,
    ) -> Self {
        Self {
            text: text.into(),
            url,
            title,
        }
    }

    /// Stable identity used for in-flight locking and detection rate limiting.
    /// Documents from the same URL share an identity; ad-hoc text is keyed by
    /// a hash of its content.
    pub fn identity(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => utils::TextUtils::text_hash(&self.text),
        }
    }
}

/// How a legal term was matched in the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    /// Verbatim substring containment
    Exact,
    /// Alternation-regex hit
    Partial,
    /// Two distinct vocabulary phrases within the proximity window
    Proximity,
}

/// A single legal-term hit produced by the detector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermMatch {
    /// The vocabulary phrase that matched
    pub term: String,
    /// Match signal that produced this hit
    pub kind: MatchKind,
    /// Byte offset (exact/partial) or word index (proximity) of the hit
    pub position: usize,
}

/// Letter grade for readability, ordered A (easiest) through F (hardest).
/// `NotApplicable` is the degraded default for empty or unusable input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl Grade {
    /// One letter harder; F and N/A are fixed points.
    pub fn downgraded(self) -> Self {
        match self {
            Grade::A => Grade::B,
            Grade::B => Grade::C,
            Grade::C => Grade::D,
            Grade::D => Grade::F,
            Grade::F => Grade::F,
            Grade::NotApplicable => Grade::NotApplicable,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
            Grade::NotApplicable => "N/A",
        };
        write!(f, "{}", s)
    }
}

/// Readability assessment. All numeric fields are guaranteed finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityResult {
    /// Flesch Reading Ease (higher = easier)
    pub flesch: f64,
    /// Flesch-Kincaid Grade Level (higher = harder)
    pub kincaid: f64,
    /// Gunning Fog Index (higher = harder)
    pub fog_index: f64,
    /// Composite letter grade
    pub average_grade: Grade,
    /// Confidence in the grade, scaled by sample size
    pub confidence: f64,
}

impl ReadabilityResult {
    /// Degraded default for empty or unusable input
    pub fn not_applicable() -> Self {
        Self {
            flesch: 0.0,
            kincaid: 0.0,
            fog_index: 0.0,
            average_grade: Grade::NotApplicable,
            confidence: 0.0,
        }
    }
}

/// Rights-favorability assessment. 1.0 is maximally user-favorable language,
/// 0.0 maximally restrictive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RightsResult {
    /// Mean chunk score in [0, 1]
    pub score: f64,
    /// Number of chunks scored
    pub chunk_count: usize,
    /// Confidence in the score
    pub confidence: f64,
}

impl RightsResult {
    /// Neutral default used when assessment cannot run
    pub fn neutral() -> Self {
        Self {
            score: 0.5,
            chunk_count: 0,
            confidence: 0.0,
        }
    }
}

/// Where a definition was resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefinitionSource {
    /// Curated static table of common legal terms
    LegalDefinitions,
    /// Bundled dictionary corpora
    Dictionary,
    /// Remote definition API
    #[serde(rename = "RemoteAPI")]
    RemoteApi,
}

/// An uncommon or legal term together with its resolved definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncommonTermEntry {
    pub word: String,
    pub definition: String,
    pub source: DefinitionSource,
}

/// Provenance carried on an [`AnalysisResult`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRef {
    pub url: Option<String>,
    pub title: Option<String>,
}

/// Aggregate result of one analysis run. Created once per run, immutable,
/// handed off to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Unique id of this run
    pub id: AnalysisId,
    /// Originating document reference
    pub document: DocumentRef,
    /// Count of legal-term hits that passed the gate
    pub legal_term_count: usize,
    pub readability: ReadabilityResult,
    pub rights: RightsResult,
    pub uncommon_terms: Vec<UncommonTermEntry>,
    /// Set when one or more analyzers degraded to their default result
    pub error: Option<String>,
    /// Completion timestamp
    pub created_at: DateTime<Utc>,
}

/// Incremental sub-result emitted as each analyzer resolves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnalysisUpdate {
    Readability(ReadabilityResult),
    Rights(RightsResult),
    UncommonTerms(Vec<UncommonTermEntry>),
}

/// Per-document lifecycle state tracked by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisState {
    Idle,
    Extracting,
    Gating,
    Analyzing,
    Complete,
    Failed,
}

/// Application state shared across API handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Config>,
    pub analyzer: Arc<analyzer::Analyzer>,
    pub summarizer: Arc<summarizer::Summarizer>,
}
