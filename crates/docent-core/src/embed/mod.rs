//! Embedder trait for text-to-vector conversion.
//!
//! Defines the interface for embedding chunks and queries into vectors for
//! semantic search. The implementation lives in docent-infra
//! (`OllamaEmbedder`, backed by the inference server's embeddings endpoint).

use docent_types::error::IndexError;

/// Trait for converting text into embedding vectors.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait Embedder: Send + Sync {
    /// Embed one or more texts into vectors.
    ///
    /// Returns one vector per input text, in input order. Batch embedding
    /// is supported for efficiency during index builds.
    fn embed(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, IndexError>> + Send;

    /// The model name used for embeddings (e.g., "nomic-embed-text").
    fn model_name(&self) -> &str;

    /// The dimensionality of the output vectors.
    fn dimension(&self) -> usize;
}
