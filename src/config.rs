//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration management for the analysis engine, supporting
//! multiple sources (files, environment variables) with validation and
//! type-safe access to all system settings.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files (TOML), environment variables
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Type checking, range validation, threshold ordering
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Environment variables (highest priority)
//! 2. Configuration files
//! 3. Default values (lowest priority)
//!
//! ## Usage
//! ```rust,ignore
//! use crate::config::Config;
//!
//! // Load from default locations
//! let config = Config::load()?;
//!
//! // Load from specific file
//! let config = Config::from_file("custom.toml")?;
//!
//! // Access configuration
//! println!("Auto-grade threshold: {}", config.detection.auto_grade_threshold);
//! ```

use crate::errors::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server and API configuration
    pub server: ServerConfig,
    /// Legal-term detection and gating settings
    pub detection: DetectionConfig,
    /// Analysis pipeline settings
    pub analysis: AnalysisConfig,
    /// Dictionary service settings
    pub dictionary: DictionaryConfig,
    /// Logging and monitoring
    pub logging: LoggingConfig,
}

/// Server and API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Maximum request payload size in MB
    pub max_payload_size_mb: u32,
    /// Request timeout in seconds
    pub request_timeout_seconds: u64,
    /// Enable CORS
    pub enable_cors: bool,
}

/// Legal-term detection and gating configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Legal-term hits required to trigger automatic full analysis
    pub auto_grade_threshold: usize,
    /// Legal-term hits required to trigger a user notification
    pub notify_threshold: usize,
    /// Maximum word distance for proximity matching
    pub proximity_radius: usize,
    /// Minimum interval between automatic detection attempts on the same
    /// document (milliseconds)
    pub interval_ms: u64,
}

/// Analysis pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Size of text chunks for rights scoring (characters)
    pub chunk_size: usize,
    /// Minimum token length considered for uncommon-term analysis
    pub min_word_length: usize,
    /// Maximum accepted document length (characters)
    pub max_text_length: usize,
}

/// Dictionary service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// Time to live for cached definitions (milliseconds)
    pub cache_ttl_ms: u64,
    /// Number of candidate terms resolved per batch
    pub batch_size: usize,
    /// Courts glossary corpus (checked first)
    pub courts_glossary_path: PathBuf,
    /// General legal dictionary corpus (checked second)
    pub legal_dictionary_path: PathBuf,
    /// Remote definition API settings
    pub remote: RemoteApiConfig,
}

/// Remote definition API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteApiConfig {
    /// Enable the remote fallback tier
    pub enabled: bool,
    /// API base URL
    pub base_url: String,
    /// Per-call timeout in milliseconds
    pub timeout_ms: u64,
}

/// Logging and monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log file path (optional, logs to stdout if not specified)
    pub file_path: Option<PathBuf>,
    /// Enable structured JSON logging
    pub json_format: bool,
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| AnalysisError::Config {
            message: format!("Failed to read config file {:?}: {}", path, e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| AnalysisError::Config {
            message: format!("Failed to parse config file {:?}: {}", path, e),
        })?;

        // Apply environment variable overrides
        config.apply_env_overrides()?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        // Server configuration
        if let Ok(host) = std::env::var("TERMS_GUARDIAN_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("TERMS_GUARDIAN_PORT") {
            self.server.port = port.parse().map_err(|_| AnalysisError::Config {
                message: "Invalid port number in TERMS_GUARDIAN_PORT".to_string(),
            })?;
        }

        // Dictionary corpora
        if let Ok(path) = std::env::var("TERMS_GUARDIAN_COURTS_GLOSSARY") {
            self.dictionary.courts_glossary_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("TERMS_GUARDIAN_LEGAL_DICTIONARY") {
            self.dictionary.legal_dictionary_path = PathBuf::from(path);
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AnalysisError::ValidationFailed {
                field: "server.port".to_string(),
                reason: "Port cannot be zero".to_string(),
            });
        }

        if self.detection.notify_threshold > self.detection.auto_grade_threshold {
            return Err(AnalysisError::ValidationFailed {
                field: "detection.notify_threshold".to_string(),
                reason: "Notify threshold cannot exceed the auto-grade threshold".to_string(),
            });
        }

        if self.analysis.chunk_size == 0 {
            return Err(AnalysisError::ValidationFailed {
                field: "analysis.chunk_size".to_string(),
                reason: "Chunk size must be greater than zero".to_string(),
            });
        }

        if self.dictionary.batch_size == 0 {
            return Err(AnalysisError::ValidationFailed {
                field: "dictionary.batch_size".to_string(),
                reason: "Dictionary batch size must be greater than zero".to_string(),
            });
        }

        if self.dictionary.remote.enabled && self.dictionary.remote.base_url.is_empty() {
            return Err(AnalysisError::ValidationFailed {
                field: "dictionary.remote.base_url".to_string(),
                reason: "Remote API enabled without a base URL".to_string(),
            });
        }

        Ok(())
    }

    /// Get configuration as TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AnalysisError::Config {
            message: format!("Failed to serialize config to TOML: {}", e),
        })
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                max_payload_size_mb: 10,
                request_timeout_seconds: 30,
                enable_cors: true,
            },
            detection: DetectionConfig {
                auto_grade_threshold: 30,
                notify_threshold: 10,
                proximity_radius: 5,
                interval_ms: 5000,
            },
            analysis: AnalysisConfig {
                chunk_size: 500,
                min_word_length: 3,
                max_text_length: 1_000_000,
            },
            dictionary: DictionaryConfig {
                cache_ttl_ms: 86_400_000,
                batch_size: 50,
                courts_glossary_path: PathBuf::from("./data/dictionaries/courts_glossary.json"),
                legal_dictionary_path: PathBuf::from("./data/dictionaries/legal_dictionary.json"),
                remote: RemoteApiConfig {
                    enabled: false,
                    base_url: String::new(),
                    timeout_ms: 5000,
                },
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                json_format: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.detection.auto_grade_threshold, 30);
        assert_eq!(config.detection.notify_threshold, 10);
        assert_eq!(config.dictionary.cache_ttl_ms, 86_400_000);
    }

    #[test]
    fn threshold_ordering_is_enforced() {
        let mut config = Config::default();
        config.detection.notify_threshold = 50;
        assert!(config.validate().is_err());
    }

    #[test]
    fn roundtrips_through_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.detection.proximity_radius, 5);
        assert_eq!(parsed.analysis.chunk_size, 500);
    }
}
