//! # Dictionary Corpora Module
//!
//! ## Purpose
//! Loads the bundled definition corpora at startup: a courts glossary and a
//! general legal dictionary, each a JSON mapping of lowercase term to
//! definition string.
//!
//! ## Input/Output Specification
//! - **Input**: Corpus file paths from `DictionaryConfig`
//! - **Output**: In-memory term maps; ranked lookup (glossary before
//!   dictionary)
//! - **Tolerance**: A missing or unreadable corpus is treated as an empty
//!   map so the service keeps working in test and non-bundled environments

use std::collections::HashMap;
use std::path::Path;

/// Bundled definition corpora, loaded once at startup
pub struct DictionaryCorpora {
    /// Courts glossary, checked first (more current phrasing)
    courts_glossary: HashMap<String, String>,
    /// General legal dictionary, checked second
    legal_dictionary: HashMap<String, String>,
}

impl DictionaryCorpora {
    /// Load both corpora. Absent or malformed files degrade to empty maps.
    pub async fn load(courts_path: &Path, legal_path: &Path) -> Self {
        let courts_glossary = load_corpus(courts_path).await;
        let legal_dictionary = load_corpus(legal_path).await;

        tracing::info!(
            courts_entries = courts_glossary.len(),
            dictionary_entries = legal_dictionary.len(),
            "Dictionary corpora loaded"
        );

        Self {
            courts_glossary,
            legal_dictionary,
        }
    }

    /// Empty corpora, for tests and environments without bundled data.
    pub fn empty() -> Self {
        Self {
            courts_glossary: HashMap::new(),
            legal_dictionary: HashMap::new(),
        }
    }

    /// Ranked lookup: the courts glossary wins over the legal dictionary.
    pub fn lookup(&self, term: &str) -> Option<&str> {
        self.courts_glossary
            .get(term)
            .or_else(|| self.legal_dictionary.get(term))
            .map(String::as_str)
    }

    pub fn courts_glossary_len(&self) -> usize {
        self.courts_glossary.len()
    }

    pub fn legal_dictionary_len(&self) -> usize {
        self.legal_dictionary.len()
    }
}

/// Read one corpus file. Terms are normalized to lowercase on load.
async fn load_corpus(path: &Path) -> HashMap<String, String> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Corpus not available");
            return HashMap::new();
        }
    };

    match serde_json::from_str::<HashMap<String, String>>(&content) {
        Ok(map) => map
            .into_iter()
            .map(|(term, definition)| (term.to_lowercase(), definition))
            .collect(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Corpus failed to parse, treating as empty");
            HashMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn missing_files_yield_empty_corpora() {
        let corpora = DictionaryCorpora::load(
            Path::new("/nonexistent/courts.json"),
            Path::new("/nonexistent/legal.json"),
        )
        .await;
        assert_eq!(corpora.courts_glossary_len(), 0);
        assert_eq!(corpora.legal_dictionary_len(), 0);
        assert!(corpora.lookup("tort").is_none());
    }

    #[tokio::test]
    async fn courts_glossary_outranks_legal_dictionary() {
        let mut courts = tempfile::NamedTempFile::new().unwrap();
        write!(courts, r#"{{"tort": "courts wording"}}"#).unwrap();
        let mut legal = tempfile::NamedTempFile::new().unwrap();
        write!(legal, r#"{{"tort": "dictionary wording", "lien": "a security interest"}}"#)
            .unwrap();

        let corpora = DictionaryCorpora::load(courts.path(), legal.path()).await;
        assert_eq!(corpora.lookup("tort"), Some("courts wording"));
        assert_eq!(corpora.lookup("lien"), Some("a security interest"));
    }

    #[tokio::test]
    async fn terms_are_lowercased_on_load() {
        let mut courts = tempfile::NamedTempFile::new().unwrap();
        write!(courts, r#"{{"Habeas Corpus": "a writ"}}"#).unwrap();

        let corpora =
            DictionaryCorpora::load(courts.path(), Path::new("/nonexistent/legal.json")).await;
        assert_eq!(corpora.lookup("habeas corpus"), Some("a writ"));
    }

    #[tokio::test]
    async fn malformed_corpus_degrades_to_empty() {
        let mut courts = tempfile::NamedTempFile::new().unwrap();
        write!(courts, "not json at all").unwrap();

        let corpora =
            DictionaryCorpora::load(courts.path(), Path::new("/nonexistent/legal.json")).await;
        assert_eq!(corpora.courts_glossary_len(), 0);
    }
}
