//! Ollama embedder via the OpenAI-compatible embeddings endpoint.
//!
//! A thin reqwest client against `{base_url}/embeddings`. The wire types
//! are the handful of fields docent reads, not a full API binding.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use docent_core::embed::Embedder;
use docent_types::error::IndexError;

/// Request body for the embeddings endpoint.
#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

/// One embedding in the response, with its position in the input batch.
#[derive(Debug, Deserialize)]
struct EmbeddingObject {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingObject>,
}

/// Embedder backed by a local Ollama (or any OpenAI-compatible) server.
pub struct OllamaEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimension: usize,
}

impl OllamaEmbedder {
    pub fn new(base_url: &str, model: &str, dimension: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            dimension,
        }
    }

    fn url(&self) -> String {
        format!("{}/embeddings", self.base_url)
    }
}

impl Embedder for OllamaEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, IndexError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let body = EmbeddingsRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(self.url())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                IndexError::Embedding(format!(
                    "cannot reach the inference server at {}: {e}",
                    self.base_url
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(IndexError::Embedding(format!(
                "embeddings request failed with {status}: {detail}"
            )));
        }

        let parsed: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| IndexError::Embedding(format!("invalid embeddings response: {e}")))?;

        if parsed.data.len() != texts.len() {
            return Err(IndexError::Embedding(format!(
                "server returned {} embeddings for {} inputs",
                parsed.data.len(),
                texts.len()
            )));
        }

        // The API does not guarantee response order; place by index.
        let mut vectors: Vec<Vec<f32>> = vec![Vec::new(); texts.len()];
        for object in parsed.data {
            if object.index >= vectors.len() {
                return Err(IndexError::Embedding(format!(
                    "embedding index {} out of range",
                    object.index
                )));
            }
            vectors[object.index] = object.embedding;
        }

        for vector in &vectors {
            if vector.len() != self.dimension {
                return Err(IndexError::DimensionMismatch {
                    expected: self.dimension,
                    actual: vector.len(),
                });
            }
        }

        debug!(count = vectors.len(), model = %self.model, "embedded batch");
        Ok(vectors)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_model_and_input() {
        let input = vec!["first".to_string(), "second".to_string()];
        let body = EmbeddingsRequest {
            model: "nomic-embed-text",
            input: &input,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "nomic-embed-text");
        assert_eq!(json["input"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_response_deserializes_out_of_order() {
        let json = r#"{
            "data": [
                {"index": 1, "embedding": [0.3, 0.4]},
                {"index": 0, "embedding": [0.1, 0.2]}
            ]
        }"#;
        let parsed: EmbeddingsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[0].index, 1);
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let embedder = OllamaEmbedder::new("http://localhost:11434/v1/", "nomic-embed-text", 768);
        assert_eq!(embedder.url(), "http://localhost:11434/v1/embeddings");
    }

    #[tokio::test]
    async fn test_empty_input_short_circuits() {
        // Points at a closed port; must not be contacted for empty input.
        let embedder = OllamaEmbedder::new("http://127.0.0.1:1", "nomic-embed-text", 768);
        let vectors = embedder.embed(&[]).await.unwrap();
        assert!(vectors.is_empty());
    }
}
