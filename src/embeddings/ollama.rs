//! Ollama embedding client.
//!
//! Issues one batched `POST /api/embed` request per run and validates the
//! response shape before trusting it. With `allow_empty` set, provider-side
//! failures degrade to one empty vector per input instead of aborting.

use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use crate::error::{Error, Result};

/// Timeout for the single embed request. Filesystem work is unbounded;
/// the provider call is the only bounded external operation.
const EMBED_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for an Ollama-compatible embedding server.
pub struct OllamaClient {
    client: reqwest::Client,
    url: String,
    model: String,
    allow_empty: bool,
}

/// Ollama API request for batch embedding.
#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

impl OllamaClient {
    /// Create a client for the given provider URL and model.
    ///
    /// `allow_empty` enables degrade mode: provider failures become
    /// warnings plus empty-vector fallbacks instead of fatal errors.
    #[must_use]
    pub fn new(url: &str, model: &str, allow_empty: bool) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            allow_empty,
        }
    }

    /// Generate one embedding per input text, in input order.
    ///
    /// Empty input short-circuits to an empty result without contacting
    /// the provider.
    ///
    /// # Errors
    ///
    /// With `allow_empty` off: [`Error::Provider`] for transport/HTTP/decode
    /// failures, [`Error::Format`] for a missing or non-array `embeddings`
    /// field, [`Error::CountMismatch`] when the returned count differs from
    /// the input count. With `allow_empty` on, those are downgraded to a
    /// warning and `texts.len()` empty vectors.
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        match self.embed_batch(texts).await {
            Ok(embeddings) => Ok(embeddings),
            Err(e) if self.allow_empty => {
                warn!("{e} (continuing with empty vectors due to --allow-empty-embeddings)");
                Ok(vec![Vec::new(); texts.len()])
            }
            Err(e) => Err(e),
        }
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let endpoint = format!("{}/api/embed", self.url);
        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(&endpoint)
            .timeout(EMBED_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.provider_error(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(self.provider_error(format!("HTTP {status}: {body}")));
        }

        // The payload is untrusted; validate the shape explicitly instead
        // of deserializing optimistically.
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| self.provider_error(format!("response is not valid JSON: {e}")))?;

        let Some(embeddings) = body.get("embeddings").and_then(serde_json::Value::as_array)
        else {
            return Err(Error::Format {
                url: self.url.clone(),
                model: self.model.clone(),
                detail: "missing or non-array `embeddings` field".to_string(),
            });
        };

        if embeddings.len() != texts.len() {
            return Err(Error::CountMismatch {
                requested: texts.len(),
                returned: embeddings.len(),
                url: self.url.clone(),
                model: self.model.clone(),
            });
        }

        embeddings
            .iter()
            .map(|value| {
                serde_json::from_value::<Vec<f32>>(value.clone()).map_err(|e| Error::Format {
                    url: self.url.clone(),
                    model: self.model.clone(),
                    detail: format!("embedding vector is not a float array: {e}"),
                })
            })
            .collect()
    }

    fn provider_error(&self, cause: String) -> Error {
        Error::Provider {
            url: self.url.clone(),
            model: self.model.clone(),
            cause,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use httpmock::prelude::*;
    use serde_json::json;

    fn block_on<F: std::future::Future>(fut: F) -> F::Output {
        tokio::runtime::Runtime::new().unwrap().block_on(fut)
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn empty_input_makes_no_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/embed");
            then.status(200).json_body(json!({ "embeddings": [] }));
        });

        let client = OllamaClient::new(&server.base_url(), "nomic-embed-text", false);
        let result = block_on(client.embed(&[])).unwrap();

        assert!(result.is_empty());
        assert_eq!(mock.hits(), 0);
    }

    #[test]
    fn batch_request_returns_vectors_in_order() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/embed").json_body(json!({
                "model": "nomic-embed-text",
                "input": ["hello", "world"],
            }));
            then.status(200).json_body(json!({
                "embeddings": [[1.0, 2.0], [3.0, 4.0]],
                "model": "nomic-embed-text",
            }));
        });

        let client = OllamaClient::new(&server.base_url(), "nomic-embed-text", false);
        let result = block_on(client.embed(&texts(&["hello", "world"]))).unwrap();

        assert_eq!(result, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        mock.assert();
    }

    #[test]
    fn trailing_slash_in_url_is_tolerated() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/embed");
            then.status(200).json_body(json!({ "embeddings": [[0.5]] }));
        });

        let url = format!("{}/", server.base_url());
        let client = OllamaClient::new(&url, "nomic-embed-text", false);
        let result = block_on(client.embed(&texts(&["x"]))).unwrap();
        assert_eq!(result, vec![vec![0.5]]);
    }

    #[test]
    fn missing_embeddings_field_is_a_format_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/embed");
            then.status(200).json_body(json!({ "error": "no such model" }));
        });

        let client = OllamaClient::new(&server.base_url(), "nomic-embed-text", false);
        let err = block_on(client.embed(&texts(&["hello"]))).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::FormatError);
    }

    #[test]
    fn count_mismatch_is_fatal_without_degrade_mode() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/embed");
            then.status(200)
                .json_body(json!({ "embeddings": [[1.0, 2.0]] }));
        });

        let client = OllamaClient::new(&server.base_url(), "nomic-embed-text", false);
        let err = block_on(client.embed(&texts(&["hello", "world"]))).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::CountMismatch);
        let msg = err.to_string();
        assert!(msg.contains('1'));
        assert!(msg.contains('2'));
    }

    #[test]
    fn count_mismatch_degrades_to_empty_vectors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/embed");
            then.status(200)
                .json_body(json!({ "embeddings": [[1.0, 2.0]] }));
        });

        let client = OllamaClient::new(&server.base_url(), "nomic-embed-text", true);
        let result = block_on(client.embed(&texts(&["hello", "world"]))).unwrap();
        assert_eq!(result, vec![Vec::<f32>::new(), Vec::<f32>::new()]);
    }

    #[test]
    fn http_error_status_is_a_provider_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/embed");
            then.status(500).body("boom");
        });

        let client = OllamaClient::new(&server.base_url(), "nomic-embed-text", false);
        let err = block_on(client.embed(&texts(&["hello"]))).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::ProviderError);
        assert!(err.to_string().contains("nomic-embed-text"));
    }

    #[test]
    fn connection_failure_degrades_when_allowed() {
        // Nothing listens on port 1.
        let client = OllamaClient::new("http://127.0.0.1:1", "nomic-embed-text", true);
        let result = block_on(client.embed(&texts(&["hello"]))).unwrap();
        assert_eq!(result, vec![Vec::<f32>::new()]);
    }
}
