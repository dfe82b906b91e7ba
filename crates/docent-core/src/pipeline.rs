//! Index build/reload pipeline.
//!
//! Decides, once at startup, whether to serve from the persisted index or
//! to embed the freshly chunked corpus:
//!
//! - persisted index has rows and no rebuild was forced -> reload it;
//! - otherwise, embed the chunks in batches and (re)populate the store;
//! - no chunks *and* no persisted rows -> `IndexError::EmptyCorpus`,
//!   the one fatal startup case.

use tracing::{info, warn};

use docent_types::document::Chunk;
use docent_types::error::IndexError;

use crate::embed::Embedder;
use crate::index::store::ChunkStore;

/// How many chunks are embedded per request to the inference server.
const EMBED_BATCH_SIZE: usize = 32;

/// What the pipeline did, with the chunk set now backing the index.
#[derive(Debug)]
pub enum IndexOutcome {
    /// A persisted index was found and reused; chunks were read back
    /// from it for the keyword side.
    Reloaded { chunks: Vec<Chunk> },
    /// The corpus was embedded and written to the store.
    Rebuilt { chunks: Vec<Chunk> },
}

impl IndexOutcome {
    /// The chunk set backing the index, whichever way it was obtained.
    pub fn into_chunks(self) -> Vec<Chunk> {
        match self {
            IndexOutcome::Reloaded { chunks } | IndexOutcome::Rebuilt { chunks } => chunks,
        }
    }

    pub fn was_reloaded(&self) -> bool {
        matches!(self, IndexOutcome::Reloaded { .. })
    }
}

/// Build or reload the chunk index.
///
/// `progress` is invoked with `(embedded_so_far, total)` after each batch
/// during a rebuild; reloads never call it.
pub async fn build_or_reload<E, S>(
    embedder: &E,
    store: &S,
    chunks: Vec<Chunk>,
    force_rebuild: bool,
    mut progress: impl FnMut(usize, usize),
) -> Result<IndexOutcome, IndexError>
where
    E: Embedder,
    S: ChunkStore,
{
    let persisted = store.count().await?;

    if !force_rebuild && persisted > 0 {
        info!(rows = persisted, "reusing persisted index");
        let chunks = store.all_chunks().await?;
        return Ok(IndexOutcome::Reloaded { chunks });
    }

    if chunks.is_empty() {
        if persisted > 0 {
            // Forced rebuild with nothing to index: keep what exists.
            warn!("rebuild requested but corpus produced no chunks; keeping existing index");
            let chunks = store.all_chunks().await?;
            return Ok(IndexOutcome::Reloaded { chunks });
        }
        return Err(IndexError::EmptyCorpus);
    }

    if persisted > 0 {
        info!(rows = persisted, "clearing index for rebuild");
        store.clear().await?;
    }

    let total = chunks.len();
    let mut embedded = 0usize;

    for batch in chunks.chunks(EMBED_BATCH_SIZE) {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed(&texts).await?;

        if embeddings.len() != batch.len() {
            return Err(IndexError::Embedding(format!(
                "embedder returned {} vectors for {} texts",
                embeddings.len(),
                batch.len()
            )));
        }
        for embedding in &embeddings {
            if embedding.len() != embedder.dimension() {
                return Err(IndexError::DimensionMismatch {
                    expected: embedder.dimension(),
                    actual: embedding.len(),
                });
            }
        }

        store.add(batch, &embeddings).await?;
        embedded += batch.len();
        progress(embedded, total);
    }

    info!(
        chunks = total,
        model = embedder.model_name(),
        "index built"
    );
    Ok(IndexOutcome::Rebuilt { chunks })
}
