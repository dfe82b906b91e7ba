//! Retrieval result types.

use serde::{Deserialize, Serialize};

use crate::document::Chunk;

/// A chunk ranked by the hybrid retriever.
///
/// Carries the fused score used for ordering plus the per-retriever
/// components for the `/sources` view and the `search` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    /// Fused relevance score (higher is better).
    pub score: f32,
    /// Normalized semantic (vector) component, if the chunk appeared in
    /// the vector ranking.
    pub semantic_score: Option<f32>,
    /// Normalized keyword (BM25) component, if the chunk appeared in the
    /// keyword ranking.
    pub keyword_score: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, DocumentSource};

    #[test]
    fn test_scored_chunk_serde_roundtrip() {
        let doc = Document::new(DocumentSource::Fallback, "text");
        let scored = ScoredChunk {
            chunk: Chunk::new(doc.id, 0, "<fallback>", "text"),
            score: 0.85,
            semantic_score: Some(0.9),
            keyword_score: None,
        };
        let json = serde_json::to_string(&scored).unwrap();
        let parsed: ScoredChunk = serde_json::from_str(&json).unwrap();
        assert!((parsed.score - 0.85).abs() < f32::EPSILON);
        assert!(parsed.keyword_score.is_none());
    }
}
