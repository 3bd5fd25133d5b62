//! # Analysis Orchestration Module
//!
//! ## Purpose
//! Drives the complete analysis workflow for one document: normalization,
//! legal-term gating, then the concurrent readability / rights /
//! uncommon-term analyzers, aggregated into a single immutable result.
//!
//! ## Input/Output Specification
//! - **Input**: `Document` plus a trigger kind (automatic or manual)
//! - **Output**: `AnalysisOutcome` — completed, partial, notify-only,
//!   skipped or failed
//! - **Workflow**: Extract → Gate → {Analyze ∥ ∥ ∥} → Aggregate
//!
//! ## Key Features
//! - Per-document state machine: Idle → Extracting → Gating → Analyzing →
//!   {Complete | Failed} → Idle
//! - At most one analysis in flight per document identity; a second trigger
//!   is a silent no-op
//! - Automatic detection attempts are rate-limited per document; manual
//!   triggers bypass the interval but not the in-flight lock
//! - Fan-out/fan-in over the three analyzers with partial aggregation: a
//!   failed analyzer degrades its section, it never sinks the run
//! - Incremental sub-results emitted on an optional channel as each
//!   analyzer resolves

use crate::config::Config;
use crate::detection::{GateDecision, LegalTermDetector};
use crate::dictionary::remote::{DefinitionProvider, HttpDefinitionProvider};
use crate::dictionary::DictionaryService;
use crate::errors::Result;
use crate::readability::ReadabilityGrader;
use crate::rights::RightsAssessor;
use crate::terms::UncommonTermIdentifier;
use crate::{
    normalize, vocabulary, AnalysisResult, AnalysisState, AnalysisUpdate, Document, DocumentRef,
    ReadabilityResult, RightsResult,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// What initiated an analysis attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// Periodic/mutation-driven detection; subject to the interval gate
    Automatic,
    /// Explicit user request; bypasses the interval gate
    Manual,
}

/// Why an attempt was skipped without running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// An analysis for this document is already in flight
    AnalysisInFlight,
    /// The automatic-detection interval has not elapsed
    IntervalNotElapsed,
    /// Legal-term count below the notification threshold
    BelowThreshold,
}

/// Outcome of one analysis attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnalysisOutcome {
    /// Every analyzer succeeded
    Completed(AnalysisResult),
    /// At least one analyzer degraded; the result carries its error note
    Partial(AnalysisResult),
    /// Hit count warrants a user prompt but not automatic analysis
    NotifyOnly { legal_term_count: usize },
    /// Attempt was a silent no-op
    Skipped(SkipReason),
    /// Extraction or gating itself failed; caller should offer a retry
    Failed { error: String },
}

/// Orchestrates the analysis pipeline
pub struct Analyzer {
    config: Arc<Config>,
    detector: Arc<LegalTermDetector>,
    grader: Arc<ReadabilityGrader>,
    assessor: Arc<RightsAssessor>,
    identifier: Arc<UncommonTermIdentifier>,
    dictionary: Arc<DictionaryService>,
    in_flight: Mutex<HashSet<String>>,
    last_attempt: Mutex<HashMap<String, Instant>>,
    states: Mutex<HashMap<String, AnalysisState>>,
}

impl Analyzer {
    /// Create an analyzer with the built-in vocabularies and the dictionary
    /// corpora configured on disk.
    pub async fn new(config: Arc<Config>) -> Result<Self> {
        let remote: Option<Arc<dyn DefinitionProvider>> = if config.dictionary.remote.enabled {
            Some(Arc::new(HttpDefinitionProvider::new(
                config.dictionary.remote.base_url.clone(),
            )))
        } else {
            None
        };

        let dictionary = Arc::new(
            DictionaryService::new(
                &config.dictionary,
                vocabulary::legal_definitions(),
                remote,
            )
            .await?,
        );

        Self::with_parts(
            config,
            vocabulary::default_legal_terms(),
            vocabulary::default_common_words(),
            dictionary,
        )
    }

    /// Create an analyzer around caller-supplied vocabularies and dictionary
    /// service. This is the constructor behind the inbound `analyze`
    /// contract; the extraction layer injects its own word lists here.
    pub fn with_parts(
        config: Arc<Config>,
        legal_terms: Vec<String>,
        common_words: Vec<String>,
        dictionary: Arc<DictionaryService>,
    ) -> Result<Self> {
        let detector = Arc::new(LegalTermDetector::new(
            legal_terms.clone(),
            config.detection.clone(),
        )?);
        let grader = Arc::new(ReadabilityGrader::new()?);
        let assessor = Arc::new(RightsAssessor::new(config.analysis.chunk_size));
        let identifier = Arc::new(UncommonTermIdentifier::new(
            common_words,
            legal_terms,
            vocabulary::legal_definitions().keys().cloned().collect(),
            dictionary.clone(),
            config.analysis.min_word_length,
            config.dictionary.batch_size,
        )?);

        Ok(Self {
            config,
            detector,
            grader,
            assessor,
            identifier,
            dictionary,
            in_flight: Mutex::new(HashSet::new()),
            last_attempt: Mutex::new(HashMap::new()),
            states: Mutex::new(HashMap::new()),
        })
    }

    /// Run one analysis attempt. See [`analyze_with_updates`](Self::analyze_with_updates).
    pub async fn analyze(&self, document: Document, trigger: Trigger) -> Result<AnalysisOutcome> {
        self.analyze_with_updates(document, trigger, None).await
    }

    /// Run one analysis attempt, emitting incremental sub-results on
    /// `updates` as each analyzer resolves.
    pub async fn analyze_with_updates(
        &self,
        document: Document,
        trigger: Trigger,
        updates: Option<UnboundedSender<AnalysisUpdate>>,
    ) -> Result<AnalysisOutcome> {
        let document_id = document.identity();

        // Automatic attempts are rate-limited per document; manual attempts
        // bypass the interval gate.
        if trigger == Trigger::Automatic && !self.interval_elapsed(&document_id) {
            tracing::debug!(document = %document_id, "Detection interval not elapsed, skipping");
            return Ok(AnalysisOutcome::Skipped(SkipReason::IntervalNotElapsed));
        }

        // In-flight lock: a concurrent second trigger is a no-op, not queued.
        if !self.mark_in_flight(&document_id) {
            tracing::debug!(document = %document_id, "Analysis already in flight, skipping");
            return Ok(AnalysisOutcome::Skipped(SkipReason::AnalysisInFlight));
        }
        let _guard = InFlightGuard {
            analyzer: self,
            document_id: document_id.clone(),
        };

        let outcome = self.run_locked(&document, &document_id, trigger, updates).await;
        Ok(outcome)
    }

    /// The pipeline body, entered with the in-flight lock held.
    async fn run_locked(
        &self,
        document: &Document,
        document_id: &str,
        trigger: Trigger,
        updates: Option<UnboundedSender<AnalysisUpdate>>,
    ) -> AnalysisOutcome {
        // Extracting: canonicalize the raw text.
        self.set_state(document_id, AnalysisState::Extracting);
        let text = normalize::normalize(&document.text);

        if text.is_empty() {
            self.set_state(document_id, AnalysisState::Failed);
            return AnalysisOutcome::Failed {
                error: "document contains no analyzable text".to_string(),
            };
        }
        if text.len() > self.config.analysis.max_text_length {
            self.set_state(document_id, AnalysisState::Failed);
            return AnalysisOutcome::Failed {
                error: format!(
                    "document exceeds the maximum analyzable length of {} characters",
                    self.config.analysis.max_text_length
                ),
            };
        }

        // Gating: count legal-term hits and apply the thresholds.
        self.set_state(document_id, AnalysisState::Gating);
        let hit_count = self.detector.count_hits(&text);
        let gate = self.detector.evaluate_gate(hit_count);
        tracing::debug!(document = %document_id, hit_count, ?gate, "Gate evaluated");

        match (trigger, gate) {
            (Trigger::Automatic, GateDecision::AutoGrade) => {}
            (Trigger::Automatic, GateDecision::Notify) => {
                self.set_state(document_id, AnalysisState::Idle);
                return AnalysisOutcome::NotifyOnly {
                    legal_term_count: hit_count,
                };
            }
            (Trigger::Automatic, GateDecision::Suppress) => {
                self.set_state(document_id, AnalysisState::Idle);
                return AnalysisOutcome::Skipped(SkipReason::BelowThreshold);
            }
            // Manual grading runs whenever the text clears the notification
            // threshold.
            (Trigger::Manual, GateDecision::Suppress) => {
                self.set_state(document_id, AnalysisState::Idle);
                return AnalysisOutcome::Skipped(SkipReason::BelowThreshold);
            }
            (Trigger::Manual, _) => {}
        }

        // Analyzing: fan out the three analyzers and join all of them.
        self.set_state(document_id, AnalysisState::Analyzing);
        let timer = crate::utils::Timer::new(format!("analysis:{}", document_id));
        let shared_text: Arc<String> = Arc::new(text);

        let grader = self.grader.clone();
        let grader_text = shared_text.clone();
        let grader_updates = updates.clone();
        let readability_task = tokio::spawn(async move {
            let result = grader.grade(&grader_text);
            if let Some(tx) = &grader_updates {
                let _ = tx.send(AnalysisUpdate::Readability(result.clone()));
            }
            result
        });

        let assessor = self.assessor.clone();
        let assessor_text = shared_text.clone();
        let assessor_updates = updates.clone();
        let rights_task = tokio::spawn(async move {
            let result = assessor.assess(&assessor_text);
            if let Some(tx) = &assessor_updates {
                let _ = tx.send(AnalysisUpdate::Rights(result.clone()));
            }
            result
        });

        let identifier = self.identifier.clone();
        let identifier_text = shared_text.clone();
        let identifier_updates = updates;
        let terms_task = tokio::spawn(async move {
            let result = identifier.identify(&identifier_text).await;
            if let Some(tx) = &identifier_updates {
                let _ = tx.send(AnalysisUpdate::UncommonTerms(result.clone()));
            }
            result
        });

        let (readability, rights, terms) =
            tokio::join!(readability_task, rights_task, terms_task);

        // Aggregation waits for all three even when one fails; a lost
        // analyzer degrades its section only.
        let mut section_errors = Vec::new();
        let readability = readability.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Readability analyzer aborted");
            section_errors.push("readability unavailable".to_string());
            ReadabilityResult::not_applicable()
        });
        let rights = rights.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Rights analyzer aborted");
            section_errors.push("rights assessment unavailable".to_string());
            RightsResult::neutral()
        });
        let terms = terms.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Uncommon-term analyzer aborted");
            section_errors.push("uncommon terms unavailable".to_string());
            Vec::new()
        });

        let degraded = !section_errors.is_empty();
        let result = AnalysisResult {
            id: Uuid::new_v4(),
            document: DocumentRef {
                url: document.url.clone(),
                title: document.title.clone(),
            },
            legal_term_count: hit_count,
            readability,
            rights,
            uncommon_terms: terms,
            error: degraded.then(|| section_errors.join("; ")),
            created_at: chrono::Utc::now(),
        };

        self.set_state(document_id, AnalysisState::Complete);
        tracing::info!(
            document = %document_id,
            analysis = %result.id,
            grade = %result.readability.average_grade,
            rights_score = result.rights.score,
            uncommon_terms = result.uncommon_terms.len(),
            degraded,
            elapsed_ms = timer.stop(),
            "Analysis complete"
        );

        if degraded {
            AnalysisOutcome::Partial(result)
        } else {
            AnalysisOutcome::Completed(result)
        }
    }

    /// Current lifecycle state for a document identity.
    pub fn state_of(&self, document_id: &str) -> AnalysisState {
        self.states
            .lock()
            .get(document_id)
            .copied()
            .unwrap_or(AnalysisState::Idle)
    }

    /// The shared dictionary service (for statistics endpoints).
    pub fn dictionary(&self) -> &Arc<DictionaryService> {
        &self.dictionary
    }

    /// The detector (for density queries from the presentation layer).
    pub fn detector(&self) -> &Arc<LegalTermDetector> {
        &self.detector
    }

    /// Record an automatic attempt and report whether the minimum interval
    /// has elapsed since the previous one.
    fn interval_elapsed(&self, document_id: &str) -> bool {
        let interval = Duration::from_millis(self.config.detection.interval_ms);
        let mut last = self.last_attempt.lock();
        let now = Instant::now();
        match last.get(document_id) {
            Some(previous) if now.duration_since(*previous) < interval => false,
            _ => {
                last.insert(document_id.to_string(), now);
                true
            }
        }
    }

    /// Take the in-flight slot for a document. Returns false when taken.
    fn mark_in_flight(&self, document_id: &str) -> bool {
        self.in_flight.lock().insert(document_id.to_string())
    }

    fn release_in_flight(&self, document_id: &str) {
        self.in_flight.lock().remove(document_id);
    }

    fn set_state(&self, document_id: &str, state: AnalysisState) {
        self.states.lock().insert(document_id.to_string(), state);
    }
}

/// Releases the in-flight slot when the attempt ends, on every exit path.
struct InFlightGuard<'a> {
    analyzer: &'a Analyzer,
    document_id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.analyzer.release_in_flight(&self.document_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::corpora::DictionaryCorpora;
    use crate::Grade;

    fn test_config() -> Arc<Config> {
        let mut config = Config::default();
        // Small thresholds keep fixture texts readable.
        config.detection.auto_grade_threshold = 3;
        config.detection.notify_threshold = 2;
        Arc::new(config)
    }

    fn analyzer_with(config: Arc<Config>) -> Analyzer {
        let dictionary = Arc::new(DictionaryService::with_corpora(
            &config.dictionary,
            vocabulary::legal_definitions(),
            DictionaryCorpora::empty(),
            None,
        ));
        Analyzer::with_parts(
            config,
            vocabulary::default_legal_terms(),
            vocabulary::default_common_words(),
            dictionary,
        )
        .unwrap()
    }

    fn legal_document() -> Document {
        Document::with_provenance(
            "These terms of service include a warranty disclaimer. \
             You accept liability limits and an indemnity clause. \
             The privacy policy explains data handling.",
            Some("https://example.com/terms".to_string()),
            Some("Terms".to_string()),
        )
    }

    #[tokio::test]
    async fn hit_count_at_the_auto_threshold_fires_full_analysis() {
        let analyzer = analyzer_with(test_config());
        // "warranty", "liability", "indemnity" = exactly the threshold of 3.
        let doc = Document::new("warranty liability indemnity");
        let outcome = analyzer.analyze(doc, Trigger::Automatic).await.unwrap();
        assert!(matches!(outcome, AnalysisOutcome::Completed(_)));
    }

    #[tokio::test]
    async fn notify_range_prompts_without_analyzing() {
        let analyzer = analyzer_with(test_config());
        let doc = Document::new("warranty liability");
        let outcome = analyzer.analyze(doc, Trigger::Automatic).await.unwrap();
        assert!(matches!(
            outcome,
            AnalysisOutcome::NotifyOnly {
                legal_term_count: 2
            }
        ));
    }

    #[tokio::test]
    async fn below_notify_suppresses() {
        let analyzer = analyzer_with(test_config());
        let doc = Document::new("nothing contractual in this text at all");
        let outcome = analyzer.analyze(doc, Trigger::Automatic).await.unwrap();
        assert!(matches!(
            outcome,
            AnalysisOutcome::Skipped(SkipReason::BelowThreshold)
        ));
    }

    #[tokio::test]
    async fn empty_document_fails_explicitly() {
        let analyzer = analyzer_with(test_config());
        let doc = Document::new("   \t\n  ");
        let outcome = analyzer.analyze(doc, Trigger::Manual).await.unwrap();
        assert!(matches!(outcome, AnalysisOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn second_automatic_attempt_inside_the_interval_is_skipped() {
        let analyzer = analyzer_with(test_config());
        let first = analyzer
            .analyze(legal_document(), Trigger::Automatic)
            .await
            .unwrap();
        assert!(matches!(first, AnalysisOutcome::Completed(_)));

        let second = analyzer
            .analyze(legal_document(), Trigger::Automatic)
            .await
            .unwrap();
        assert!(matches!(
            second,
            AnalysisOutcome::Skipped(SkipReason::IntervalNotElapsed)
        ));
    }

    #[tokio::test]
    async fn manual_trigger_bypasses_the_interval_gate() {
        let analyzer = analyzer_with(test_config());
        analyzer
            .analyze(legal_document(), Trigger::Automatic)
            .await
            .unwrap();
        let manual = analyzer
            .analyze(legal_document(), Trigger::Manual)
            .await
            .unwrap();
        assert!(matches!(manual, AnalysisOutcome::Completed(_)));
    }

    #[tokio::test]
    async fn in_flight_documents_skip_new_attempts() {
        let analyzer = analyzer_with(test_config());
        let doc = legal_document();
        assert!(analyzer.mark_in_flight(&doc.identity()));

        let outcome = analyzer.analyze(doc.clone(), Trigger::Manual).await.unwrap();
        assert!(matches!(
            outcome,
            AnalysisOutcome::Skipped(SkipReason::AnalysisInFlight)
        ));

        // Releasing the slot admits the next attempt.
        analyzer.release_in_flight(&doc.identity());
        let outcome = analyzer.analyze(doc, Trigger::Manual).await.unwrap();
        assert!(matches!(outcome, AnalysisOutcome::Completed(_)));
    }

    #[tokio::test]
    async fn completed_results_are_well_formed() {
        let analyzer = analyzer_with(test_config());
        let outcome = analyzer
            .analyze(legal_document(), Trigger::Manual)
            .await
            .unwrap();

        let result = match outcome {
            AnalysisOutcome::Completed(result) => result,
            other => panic!("expected completion, got {:?}", other),
        };

        assert!(result.readability.flesch.is_finite());
        assert_ne!(result.readability.average_grade, Grade::NotApplicable);
        assert!((0.0..=1.0).contains(&result.rights.score));
        assert!(result.legal_term_count >= 3);
        assert!(result.error.is_none());
        assert_eq!(
            result.document.url.as_deref(),
            Some("https://example.com/terms")
        );
        // Uncommon terms never repeat.
        let mut words: Vec<&str> = result
            .uncommon_terms
            .iter()
            .map(|t| t.word.as_str())
            .collect();
        let before = words.len();
        words.sort();
        words.dedup();
        assert_eq!(words.len(), before);
    }

    #[tokio::test]
    async fn incremental_updates_arrive_for_each_analyzer() {
        let analyzer = analyzer_with(test_config());
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        analyzer
            .analyze_with_updates(legal_document(), Trigger::Manual, Some(tx))
            .await
            .unwrap();

        let mut seen_readability = false;
        let mut seen_rights = false;
        let mut seen_terms = false;
        while let Ok(update) = rx.try_recv() {
            match update {
                AnalysisUpdate::Readability(_) => seen_readability = true,
                AnalysisUpdate::Rights(_) => seen_rights = true,
                AnalysisUpdate::UncommonTerms(_) => seen_terms = true,
            }
        }
        assert!(seen_readability && seen_rights && seen_terms);
    }

    #[tokio::test]
    async fn state_settles_after_completion() {
        let analyzer = analyzer_with(test_config());
        let doc = legal_document();
        let id = doc.identity();
        assert_eq!(analyzer.state_of(&id), AnalysisState::Idle);

        analyzer.analyze(doc, Trigger::Manual).await.unwrap();
        assert_eq!(analyzer.state_of(&id), AnalysisState::Complete);
    }
}
