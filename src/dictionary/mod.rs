//! # Dictionary Service Module
//!
//! ## Purpose
//! Resolves definitions for candidate terms through a layered lookup:
//! in-memory TTL cache, curated legal-definitions table, bundled corpora,
//! then an optional remote API. First hit wins; every resolved definition is
//! written back to the cache before it is returned.
//!
//! ## Input/Output Specification
//! - **Input**: Lowercased candidate words/phrases
//! - **Output**: `Definition` (text + source) or `None` for unresolvable
//!   terms
//! - **Tiers**: cache → legal definitions → corpora → remote (timeout-bound)
//!
//! ## Key Features
//! - TTL-based cache with lazy eviction; expired entries are misses and are
//!   overwritten on the next resolution
//! - Concurrent readers tolerated; cache population is last-write-wins
//! - Remote failures and timeouts are definition misses, never hard errors
//! - `clear_cache` empties the cache tier only
//!
//! ## Architecture
//! - `corpora`: bundled JSON corpora loading and ranked lookup
//! - `remote`: the external provider trait and its HTTP implementation

pub mod corpora;
pub mod remote;

use crate::config::DictionaryConfig;
use crate::errors::Result;
use crate::DefinitionSource;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use self::corpora::DictionaryCorpora;
use self::remote::DefinitionProvider;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// A resolved definition with its originating tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub definition: String,
    pub source: DefinitionSource,
}

/// One cached resolution, owned exclusively by the service
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub definition: String,
    pub source: DefinitionSource,
    pub timestamp: DateTime<Utc>,
}

/// Service statistics for monitoring endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryStats {
    pub courts_glossary_entries: usize,
    pub legal_dictionary_entries: usize,
    pub cache_size: usize,
}

/// Layered definition lookup service
pub struct DictionaryService {
    /// Tier 1: in-memory cache keyed by lowercase word
    cache: DashMap<String, CacheEntry>,
    /// Tier 2: curated legal definitions
    legal_definitions: HashMap<String, String>,
    /// Tier 3: bundled corpora
    corpora: DictionaryCorpora,
    /// Tier 4 (optional): remote API
    remote: Option<Arc<dyn DefinitionProvider>>,
    ttl_ms: i64,
    remote_timeout: Duration,
}

impl DictionaryService {
    /// Create the service, loading the bundled corpora from disk.
    pub async fn new(
        config: &DictionaryConfig,
        legal_definitions: HashMap<String, String>,
        remote: Option<Arc<dyn DefinitionProvider>>,
    ) -> Result<Self> {
        let corpora = DictionaryCorpora::load(
            &config.courts_glossary_path,
            &config.legal_dictionary_path,
        )
        .await;

        Ok(Self::with_corpora(config, legal_definitions, corpora, remote))
    }

    /// Create the service around pre-built corpora (used by tests).
    pub fn with_corpora(
        config: &DictionaryConfig,
        legal_definitions: HashMap<String, String>,
        corpora: DictionaryCorpora,
        remote: Option<Arc<dyn DefinitionProvider>>,
    ) -> Self {
        Self {
            cache: DashMap::new(),
            legal_definitions: legal_definitions
                .into_iter()
                .map(|(term, definition)| (term.to_lowercase(), definition))
                .collect(),
            corpora,
            remote,
            ttl_ms: config.cache_ttl_ms as i64,
            remote_timeout: Duration::from_millis(config.remote.timeout_ms),
        }
    }

    /// Resolve a definition, first hit wins across the tiers. Returns `None`
    /// for unknown or empty terms; never fails.
    pub async fn get_definition(&self, word: &str) -> Option<Definition> {
        let key = word.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }

        // Tier 1: cache, valid while inside the TTL window.
        let mut expired = false;
        if let Some(entry) = self.cache.get(&key) {
            let age_ms = (Utc::now() - entry.timestamp).num_milliseconds();
            if age_ms < self.ttl_ms {
                return Some(Definition {
                    definition: entry.definition.clone(),
                    source: entry.source,
                });
            }
            expired = true;
        }
        if expired {
            // Lazy eviction; the fresh resolution below overwrites it anyway.
            self.cache.remove(&key);
        }

        // Tier 2: curated legal definitions.
        if let Some(definition) = self.legal_definitions.get(&key) {
            return Some(self.store(&key, definition.clone(), DefinitionSource::LegalDefinitions));
        }

        // Tier 3: bundled corpora.
        if let Some(definition) = self.corpora.lookup(&key) {
            return Some(self.store(&key, definition.to_string(), DefinitionSource::Dictionary));
        }

        // Tier 4: remote API, timeout-bound; failure is a miss.
        if let Some(provider) = &self.remote {
            match tokio::time::timeout(self.remote_timeout, provider.fetch_definition(&key)).await
            {
                Ok(Ok(Some(definition))) => {
                    return Some(self.store(&key, definition, DefinitionSource::RemoteApi));
                }
                Ok(Ok(None)) => {}
                Ok(Err(e)) => {
                    tracing::debug!(word = %key, provider = provider.name(), error = %e, "Remote definition lookup failed");
                }
                Err(_) => {
                    tracing::debug!(word = %key, provider = provider.name(), timeout_ms = self.remote_timeout.as_millis() as u64, "Remote definition lookup timed out");
                }
            }
        }

        None
    }

    /// Write a resolution into the cache (last-write-wins) and return it.
    fn store(&self, key: &str, definition: String, source: DefinitionSource) -> Definition {
        self.cache.insert(
            key.to_string(),
            CacheEntry {
                definition: definition.clone(),
                source,
                timestamp: Utc::now(),
            },
        );
        Definition { definition, source }
    }

    /// Empty the cache tier only; the static table and corpora are untouched.
    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::debug!("Dictionary cache cleared");
    }

    /// Current service statistics.
    pub fn stats(&self) -> DictionaryStats {
        DictionaryStats {
            courts_glossary_entries: self.corpora.courts_glossary_len(),
            legal_dictionary_entries: self.corpora.legal_dictionary_len(),
            cache_size: self.cache.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::errors::AnalysisError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls; optionally sleeps longer than the service timeout.
    struct CountingProvider {
        calls: AtomicUsize,
        delay: Option<Duration>,
        definition: Option<&'static str>,
    }

    impl CountingProvider {
        fn answering(definition: &'static str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay: None,
                definition: Some(definition),
            })
        }

        fn stalled() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay: Some(Duration::from_millis(200)),
                definition: Some("too late"),
            })
        }
    }

    #[async_trait]
    impl DefinitionProvider for CountingProvider {
        async fn fetch_definition(&self, _word: &str) -> crate::errors::Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(self.definition.map(|d| d.to_string()))
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn dictionary_config() -> crate::config::DictionaryConfig {
        Config::default().dictionary
    }

    fn service_with_remote(
        remote: Arc<CountingProvider>,
        ttl_ms: u64,
        timeout_ms: u64,
    ) -> DictionaryService {
        let mut config = dictionary_config();
        config.cache_ttl_ms = ttl_ms;
        config.remote.timeout_ms = timeout_ms;
        DictionaryService::with_corpora(
            &config,
            HashMap::new(),
            DictionaryCorpora::empty(),
            Some(remote),
        )
    }

    #[tokio::test]
    async fn static_table_wins_before_corpora_and_remote() {
        let remote = CountingProvider::answering("remote definition");
        let mut legal = HashMap::new();
        legal.insert("eula".to_string(), "End User License Agreement.".to_string());
        let service = DictionaryService::with_corpora(
            &dictionary_config(),
            legal,
            DictionaryCorpora::empty(),
            Some(remote.clone()),
        );

        let def = service.get_definition("EULA").await.unwrap();
        assert_eq!(def.source, DefinitionSource::LegalDefinitions);
        assert_eq!(remote.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn second_lookup_hits_the_cache_only() {
        let remote = CountingProvider::answering("a remote definition");
        let service = service_with_remote(remote.clone(), 86_400_000, 5000);

        let first = service.get_definition("estoppel").await.unwrap();
        let second = service.get_definition("estoppel").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.source, DefinitionSource::RemoteApi);
        // Tiers 2-4 were not consulted again.
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entries_are_misses_and_get_overwritten() {
        let remote = CountingProvider::answering("a remote definition");
        let service = service_with_remote(remote.clone(), 0, 5000);

        service.get_definition("estoppel").await.unwrap();
        service.get_definition("estoppel").await.unwrap();
        // TTL of zero expires immediately, so the provider runs twice.
        assert_eq!(remote.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn remote_timeout_is_a_miss_and_does_not_poison_the_cache() {
        let remote = CountingProvider::stalled();
        let service = service_with_remote(remote.clone(), 86_400_000, 10);

        assert!(service.get_definition("slowword").await.is_none());
        assert_eq!(service.stats().cache_size, 0);
    }

    #[tokio::test]
    async fn remote_errors_are_misses() {
        struct FailingProvider;

        #[async_trait]
        impl DefinitionProvider for FailingProvider {
            async fn fetch_definition(
                &self,
                word: &str,
            ) -> crate::errors::Result<Option<String>> {
                Err(AnalysisError::Lookup {
                    word: word.to_string(),
                    details: "unreachable".to_string(),
                })
            }

            fn name(&self) -> &str {
                "failing"
            }
        }

        let service = DictionaryService::with_corpora(
            &dictionary_config(),
            HashMap::new(),
            DictionaryCorpora::empty(),
            Some(Arc::new(FailingProvider)),
        );
        assert!(service.get_definition("anything").await.is_none());
    }

    #[tokio::test]
    async fn clear_cache_empties_tier_one_only() {
        let mut legal = HashMap::new();
        legal.insert("lien".to_string(), "A security interest.".to_string());
        let service = DictionaryService::with_corpora(
            &dictionary_config(),
            legal,
            DictionaryCorpora::empty(),
            None,
        );

        service.get_definition("lien").await.unwrap();
        assert_eq!(service.stats().cache_size, 1);

        service.clear_cache();
        assert_eq!(service.stats().cache_size, 0);
        // The static table still resolves.
        assert!(service.get_definition("lien").await.is_some());
    }

    #[tokio::test]
    async fn empty_words_resolve_to_nothing() {
        let service = DictionaryService::with_corpora(
            &dictionary_config(),
            HashMap::new(),
            DictionaryCorpora::empty(),
            None,
        );
        assert!(service.get_definition("").await.is_none());
        assert!(service.get_definition("   ").await.is_none());
    }
}
