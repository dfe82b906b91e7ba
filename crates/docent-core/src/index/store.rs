//! ChunkStore trait definition.
//!
//! The interface over the persistent vector index of corpus chunks.
//! The implementation lives in docent-infra (`LanceChunkStore`).
//!
//! Uses RPITIT (native async fn in traits, Rust 2024 edition).

use docent_types::document::Chunk;
use docent_types::error::IndexError;

/// A chunk returned from a vector search, with its cosine distance to
/// the query embedding (lower is closer).
#[derive(Debug, Clone)]
pub struct VectorHit {
    pub chunk: Chunk,
    pub distance: f32,
}

impl VectorHit {
    /// Cosine similarity derived from the stored distance, clamped to 0.
    pub fn similarity(&self) -> f32 {
        (1.0 - self.distance).max(0.0)
    }
}

/// Trait for vector-indexed chunk storage with semantic search.
pub trait ChunkStore: Send + Sync {
    /// Add chunks with their embedding vectors.
    ///
    /// `chunks` and `embeddings` must have equal length; embeddings must
    /// match the store's configured dimension.
    fn add(
        &self,
        chunks: &[Chunk],
        embeddings: &[Vec<f32>],
    ) -> impl std::future::Future<Output = Result<(), IndexError>> + Send;

    /// Search for the chunks closest to the query embedding.
    ///
    /// Results are ordered by ascending cosine distance.
    fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<VectorHit>, IndexError>> + Send;

    /// Read back every stored chunk (without vectors).
    ///
    /// Used to rebuild the in-memory keyword index after reloading a
    /// persisted vector index.
    fn all_chunks(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Chunk>, IndexError>> + Send;

    /// Count stored chunks.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, IndexError>> + Send;

    /// Remove all stored chunks (used by forced rebuilds). Idempotent.
    fn clear(&self) -> impl std::future::Future<Output = Result<(), IndexError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_types::document::{Document, DocumentSource};

    #[test]
    fn test_vector_hit_similarity() {
        let doc = Document::new(DocumentSource::Fallback, "text");
        let hit = VectorHit {
            chunk: Chunk::new(doc.id, 0, "<fallback>", "text"),
            distance: 0.25,
        };
        assert!((hit.similarity() - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn test_vector_hit_similarity_clamps_at_zero() {
        let doc = Document::new(DocumentSource::Fallback, "text");
        let hit = VectorHit {
            chunk: Chunk::new(doc.id, 0, "<fallback>", "text"),
            distance: 1.8,
        };
        assert_eq!(hit.similarity(), 0.0);
    }
}
