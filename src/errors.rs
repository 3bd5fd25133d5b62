//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the analysis engine, providing the error
//! taxonomy shared by all pipeline components and conversion utilities for
//! their underlying failures.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from pipeline components and ambient I/O
//! - **Output**: Structured error types with context and error chains
//! - **Error Categories**: Input, Computation, Lookup, Concurrency,
//!   Configuration, System
//!
//! ## Key Features
//! - Hierarchical error types with detailed context
//! - Automatic error conversion and chaining
//! - User-friendly error messages for API responses
//! - Recovery classification: most pipeline errors are recovered locally
//!   into degraded default results and never escape a component's contract
//!
//! ## Usage
//! ```rust,ignore
//! use crate::errors::{Result, AnalysisError};
//!
//! fn grade_operation() -> Result<f64> {
//!     Err(AnalysisError::InvalidInput {
//!         details: "empty document text".to_string(),
//!     })
//! }
//! ```

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Comprehensive error types for the analysis engine
#[derive(Debug, Error)]
pub enum AnalysisError {
    // Input errors: recovered locally with a neutral default result
    /// Empty or otherwise unusable document text
    #[error("Invalid input text: {details}")]
    InvalidInput { details: String },

    /// Text contained no extractable words
    #[error("No extractable words in text")]
    NoWords,

    // Computation errors: guarded preemptively, should never reach a caller
    /// An internal formula produced a non-finite value
    #[error("Non-finite value in {formula}: {details}")]
    Computation { formula: String, details: String },

    // Lookup errors: recovered as a missing definition
    /// Dictionary corpus could not be read or parsed
    #[error("Failed to load dictionary corpus {path}: {details}")]
    CorpusLoad { path: String, details: String },

    /// Remote definition lookup failed
    #[error("Definition lookup failed for '{word}': {details}")]
    Lookup { word: String, details: String },

    /// Remote definition lookup exceeded its deadline
    #[error("Definition lookup timed out after {timeout_ms}ms")]
    LookupTimeout { timeout_ms: u64 },

    // Concurrency errors: silently ignored by the orchestrator
    /// A second analysis was requested while one is in flight
    #[error("Analysis already in flight for document '{document}'")]
    AnalysisInFlight { document: String },

    /// Automatic detection attempted inside the minimum interval
    #[error("Detection interval not elapsed for document '{document}'")]
    DetectionThrottled { document: String },

    // Configuration and system errors
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation failed for field '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    /// Generic I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// JSON parsing errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP client errors
    #[error("HTTP error: {details}")]
    Http { details: String },

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AnalysisError {
    /// Check if the error is recoverable inside a component contract:
    /// recoverable errors degrade to a default result instead of propagating.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidInput { .. }
                | AnalysisError::NoWords
                | AnalysisError::Lookup { .. }
                | AnalysisError::LookupTimeout { .. }
                | AnalysisError::Http { .. }
                | AnalysisError::AnalysisInFlight { .. }
                | AnalysisError::DetectionThrottled { .. }
        )
    }

    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            AnalysisError::InvalidInput { .. } | AnalysisError::NoWords => "input",
            AnalysisError::Computation { .. } => "computation",
            AnalysisError::CorpusLoad { .. }
            | AnalysisError::Lookup { .. }
            | AnalysisError::LookupTimeout { .. }
            | AnalysisError::Http { .. } => "lookup",
            AnalysisError::AnalysisInFlight { .. } | AnalysisError::DetectionThrottled { .. } => {
                "concurrency"
            }
            AnalysisError::Config { .. } | AnalysisError::ValidationFailed { .. } => {
                "configuration"
            }
            AnalysisError::Io { .. }
            | AnalysisError::Json { .. }
            | AnalysisError::Toml(_)
            | AnalysisError::Internal { .. } => "system",
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::Json {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        AnalysisError::Http {
            details: err.to_string(),
        }
    }
}

// Helper macros for common error patterns
#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::errors::AnalysisError::Internal {
            message: $msg.to_string(),
        }
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::errors::AnalysisError::Internal {
            message: format!($fmt, $($arg)*),
        }
    };
}

#[macro_export]
macro_rules! validation_error {
    ($field:expr, $reason:expr) => {
        $crate::errors::AnalysisError::ValidationFailed {
            field: $field.to_string(),
            reason: $reason.to_string(),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_cover_the_taxonomy() {
        assert_eq!(
            AnalysisError::InvalidInput {
                details: "empty".into()
            }
            .category(),
            "input"
        );
        assert_eq!(
            AnalysisError::LookupTimeout { timeout_ms: 5000 }.category(),
            "lookup"
        );
        assert_eq!(
            AnalysisError::AnalysisInFlight {
                document: "doc".into()
            }
            .category(),
            "concurrency"
        );
    }

    #[test]
    fn concurrency_errors_are_recoverable() {
        assert!(AnalysisError::AnalysisInFlight {
            document: "doc".into()
        }
        .is_recoverable());
        assert!(!AnalysisError::Internal {
            message: "broken".into()
        }
        .is_recoverable());
    }
}
