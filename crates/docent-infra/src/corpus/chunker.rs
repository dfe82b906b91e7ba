//! Semantic text chunker.
//!
//! Uses the `text-splitter` crate to split documents into overlapping
//! chunks suitable for embedding. Markdown sources use `MarkdownSplitter`
//! for heading-aware splitting; all other text uses `TextSplitter`.
//! Sizes are characters, taken from `[corpus]` in the config.

use text_splitter::{ChunkConfig, MarkdownSplitter, TextSplitter};

use docent_core::corpus::Chunker;
use docent_types::document::{Chunk, Document};
use docent_types::error::CorpusError;

/// Chunker over `text-splitter` with configured size and overlap.
pub struct SemanticChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl SemanticChunker {
    /// Create a chunker. Overlap must be smaller than the chunk size.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, CorpusError> {
        if chunk_size == 0 {
            return Err(CorpusError::ChunkConfig(
                "chunk_size must be positive".to_string(),
            ));
        }
        // Validate the pair the same way the splitter will
        ChunkConfig::new(chunk_size)
            .with_overlap(chunk_overlap)
            .map_err(|e| CorpusError::ChunkConfig(e.to_string()))?;

        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    fn config(&self) -> ChunkConfig<text_splitter::Characters> {
        ChunkConfig::new(self.chunk_size)
            .with_overlap(self.chunk_overlap)
            .expect("validated at construction")
    }

    fn split_text<'a>(&self, text: &'a str, markdown: bool) -> Vec<&'a str> {
        if markdown {
            MarkdownSplitter::new(self.config()).chunks(text).collect()
        } else {
            TextSplitter::new(self.config()).chunks(text).collect()
        }
    }
}

impl Chunker for SemanticChunker {
    fn split(&self, documents: &[Document]) -> Result<Vec<Chunk>, CorpusError> {
        let mut chunks = Vec::new();

        for document in documents {
            let source = document.source.to_string();
            let markdown = source.ends_with(".md") || source.ends_with(".markdown");

            let mut ordinal = 0u32;
            for piece in self.split_text(&document.content, markdown) {
                if piece.trim().is_empty() {
                    continue;
                }
                chunks.push(Chunk::new(document.id, ordinal, &source, piece));
                ordinal += 1;
            }
        }

        Ok(chunks)
    }
}
