//! Hybrid retrieval engine.
//!
//! Combines semantic vector search (via `Embedder` + `ChunkStore`) with
//! BM25 keyword ranking, fusing the two rankings per the configured
//! method and weights. Both retrievers over-fetch by a configurable
//! multiplier so fusion has enough candidates to reorder.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use docent_types::config::{FusionMethod, RetrievalConfig};
use docent_types::document::Chunk;
use docent_types::error::IndexError;
use docent_types::retrieval::ScoredChunk;

use crate::embed::Embedder;
use crate::index::store::ChunkStore;
use crate::retrieval::fusion::{reciprocal_rank_fusion, weighted_fusion};
use crate::retrieval::keyword::Bm25Index;

/// Hybrid retriever over a fixed, already-indexed chunk set.
pub struct HybridRetriever<E, S> {
    embedder: E,
    store: S,
    bm25: Bm25Index,
    chunks_by_id: HashMap<Uuid, Chunk>,
    config: RetrievalConfig,
}

impl<E: Embedder, S: ChunkStore> HybridRetriever<E, S> {
    /// Build a retriever over `chunks` (the same set held by `store`).
    ///
    /// The BM25 index and the id-to-chunk map are built eagerly here; the
    /// vector side queries the store per question.
    pub fn new(embedder: E, store: S, chunks: Vec<Chunk>, config: RetrievalConfig) -> Self {
        let bm25 = Bm25Index::build(&chunks);
        let chunks_by_id = chunks.into_iter().map(|c| (c.id, c)).collect();
        Self {
            embedder,
            store,
            bm25,
            chunks_by_id,
            config,
        }
    }

    /// Retrieve the top-k chunks for a question.
    ///
    /// An empty or whitespace-only question returns an empty result
    /// without touching the embedder.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<ScoredChunk>, IndexError> {
        if query.trim().is_empty() || self.config.top_k == 0 {
            return Ok(Vec::new());
        }

        let fetch = self.config.top_k * self.config.fetch_multiplier.max(1);

        // Semantic ranking
        let embeddings = self.embedder.embed(&[query.to_string()]).await?;
        let query_embedding = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| IndexError::Embedding("embedder returned no vectors".to_string()))?;

        let vector_hits = self.store.search(&query_embedding, fetch).await?;
        let semantic: Vec<(Uuid, f32)> = vector_hits
            .iter()
            .map(|hit| (hit.chunk.id, hit.similarity()))
            .collect();

        // Keyword ranking
        let keyword = self.bm25.search(query, fetch);

        debug!(
            semantic_hits = semantic.len(),
            keyword_hits = keyword.len(),
            "fusing rankings"
        );

        let fused = match self.config.fusion {
            FusionMethod::Weighted => weighted_fusion(
                &semantic,
                &keyword,
                self.config.semantic_weight,
                self.config.keyword_weight,
            ),
            FusionMethod::Rrf => reciprocal_rank_fusion(
                &semantic,
                &keyword,
                self.config.semantic_weight,
                self.config.keyword_weight,
            ),
        };

        // Vector hits carry their chunk; keyword-only hits resolve
        // through the id map.
        let vector_chunks: HashMap<Uuid, &Chunk> =
            vector_hits.iter().map(|h| (h.chunk.id, &h.chunk)).collect();

        let mut results = Vec::with_capacity(self.config.top_k);
        for entry in fused {
            let chunk = vector_chunks
                .get(&entry.id)
                .map(|c| (*c).clone())
                .or_else(|| self.chunks_by_id.get(&entry.id).cloned());
            let Some(chunk) = chunk else {
                continue;
            };
            results.push(ScoredChunk {
                chunk,
                score: entry.score,
                semantic_score: entry.semantic,
                keyword_score: entry.keyword,
            });
            if results.len() == self.config.top_k {
                break;
            }
        }

        Ok(results)
    }

    /// Number of chunks known to the keyword side.
    pub fn chunk_count(&self) -> usize {
        self.bm25.len()
    }
}
