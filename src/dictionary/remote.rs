//! # Remote Definition Provider
//!
//! ## Purpose
//! Optional last-resort definition tier backed by an external API. The
//! provider sits behind a trait so the service (and tests) can substitute
//! implementations; the service wraps every call in a timeout and treats
//! any failure as a definition miss.

use crate::errors::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// External definition source. Implementations return `Ok(None)` for words
/// they do not know; errors are recovered as misses by the caller.
#[async_trait]
pub trait DefinitionProvider: Send + Sync {
    async fn fetch_definition(&self, word: &str) -> Result<Option<String>>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Response shape of the definition endpoint
#[derive(Debug, Deserialize)]
struct DefinitionResponse {
    definition: Option<String>,
}

/// HTTP-backed definition provider
pub struct HttpDefinitionProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDefinitionProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DefinitionProvider for HttpDefinitionProvider {
    async fn fetch_definition(&self, word: &str) -> Result<Option<String>> {
        let url = format!("{}/definitions/{}", self.base_url.trim_end_matches('/'), word);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = response.error_for_status()?;
        let body: DefinitionResponse = response.json().await?;
        Ok(body.definition.filter(|d| !d.trim().is_empty()))
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn resolves_a_known_word() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/definitions/estoppel"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "definition": "A bar preventing one from asserting a claim."
            })))
            .mount(&server)
            .await;

        let provider = HttpDefinitionProvider::new(server.uri());
        let definition = provider.fetch_definition("estoppel").await.unwrap();
        assert_eq!(
            definition.as_deref(),
            Some("A bar preventing one from asserting a claim.")
        );
    }

    #[tokio::test]
    async fn unknown_word_is_a_miss_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/definitions/zzyzx"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let provider = HttpDefinitionProvider::new(server.uri());
        assert_eq!(provider.fetch_definition("zzyzx").await.unwrap(), None);
    }

    #[tokio::test]
    async fn server_errors_surface_as_errors_for_the_service_to_recover() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let provider = HttpDefinitionProvider::new(server.uri());
        assert!(provider.fetch_definition("anything").await.is_err());
    }

    #[tokio::test]
    async fn empty_definition_is_a_miss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "definition": "  "
            })))
            .mount(&server)
            .await;

        let provider = HttpDefinitionProvider::new(server.uri());
        assert_eq!(provider.fetch_definition("word").await.unwrap(), None);
    }
}
