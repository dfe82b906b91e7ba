//! Chunker trait definition.
//!
//! Splits loaded documents into bounded-size overlapping chunks for
//! indexing. The implementation lives in docent-infra (`SemanticChunker`,
//! backed by the text-splitter crate).

use docent_types::document::{Chunk, Document};
use docent_types::error::CorpusError;

/// Trait for splitting documents into chunks.
pub trait Chunker: Send + Sync {
    /// Split each document into chunks, preserving document order and
    /// assigning per-document ordinals.
    fn split(&self, documents: &[Document]) -> Result<Vec<Chunk>, CorpusError>;
}
