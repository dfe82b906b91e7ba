//! In-memory BM25 keyword index over corpus chunks.
//!
//! Standard Okapi BM25 with k1 = 1.2 and b = 0.75. The index is built
//! once at startup from the chunk set (freshly chunked or read back from
//! the persisted vector index) and queried per question by the hybrid
//! retriever. Corpora here are demo-sized, so a linear scoring pass over
//! the posting lists is sufficient.

use std::collections::HashMap;

use uuid::Uuid;

use docent_types::document::Chunk;

/// Term saturation parameter.
const K1: f32 = 1.2;

/// Length normalization parameter.
const B: f32 = 0.75;

struct IndexedChunk {
    id: Uuid,
    /// Term -> occurrence count within this chunk.
    term_counts: HashMap<String, u32>,
    token_len: f32,
}

/// BM25 index over a fixed chunk set.
pub struct Bm25Index {
    chunks: Vec<IndexedChunk>,
    /// Term -> number of chunks containing it.
    doc_freq: HashMap<String, u32>,
    avg_len: f32,
}

impl Bm25Index {
    /// Build the index from a chunk set.
    pub fn build(chunks: &[Chunk]) -> Self {
        let mut indexed = Vec::with_capacity(chunks.len());
        let mut doc_freq: HashMap<String, u32> = HashMap::new();
        let mut total_len: f32 = 0.0;

        for chunk in chunks {
            let tokens = tokenize(&chunk.text);
            let mut term_counts: HashMap<String, u32> = HashMap::new();
            for token in &tokens {
                *term_counts.entry(token.clone()).or_insert(0) += 1;
            }
            for term in term_counts.keys() {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            total_len += tokens.len() as f32;
            indexed.push(IndexedChunk {
                id: chunk.id,
                term_counts,
                token_len: tokens.len() as f32,
            });
        }

        let avg_len = if indexed.is_empty() {
            0.0
        } else {
            total_len / indexed.len() as f32
        };

        Self {
            chunks: indexed,
            doc_freq,
            avg_len,
        }
    }

    /// Score all chunks against the query and return the top `limit`,
    /// ordered by descending score. Chunks with zero score are omitted.
    pub fn search(&self, query: &str, limit: usize) -> Vec<(Uuid, f32)> {
        let query_terms = tokenize(query);
        if query_terms.is_empty() || self.chunks.is_empty() {
            return Vec::new();
        }

        let n = self.chunks.len() as f32;
        let mut scored: Vec<(Uuid, f32)> = Vec::new();

        for chunk in &self.chunks {
            let mut score = 0.0f32;
            for term in &query_terms {
                let Some(&tf) = chunk.term_counts.get(term) else {
                    continue;
                };
                let df = *self.doc_freq.get(term).unwrap_or(&0) as f32;
                // Okapi IDF with the +1 inside the log to keep it positive
                let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
                let tf = tf as f32;
                let norm = K1 * (1.0 - B + B * chunk.token_len / self.avg_len.max(1.0));
                score += idf * (tf * (K1 + 1.0)) / (tf + norm);
            }
            if score > 0.0 {
                scored.push((chunk.id, score));
            }
        }

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        scored
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of distinct terms across the corpus.
    pub fn vocabulary_size(&self) -> usize {
        self.doc_freq.len()
    }
}

/// Lowercase alphanumeric tokenization.
///
/// Splits on any non-alphanumeric character and drops single-character
/// tokens, which are almost always noise in prose corpora.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1)
        .map(|t| t.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_types::document::{Document, DocumentSource};

    fn chunk(text: &str) -> Chunk {
        let doc = Document::new(DocumentSource::Fallback, text);
        Chunk::new(doc.id, 0, "<fallback>", text)
    }

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        let tokens = tokenize("The quick-brown Fox, jumps!");
        assert_eq!(tokens, vec!["the", "quick", "brown", "fox", "jumps"]);
    }

    #[test]
    fn test_tokenize_drops_single_chars() {
        let tokens = tokenize("a b rust c");
        assert_eq!(tokens, vec!["rust"]);
    }

    #[test]
    fn test_matching_chunk_ranks_first() {
        let chunks = vec![
            chunk("the robotics team won the international competition"),
            chunk("the cafeteria menu changes every tuesday"),
            chunk("robotics workshops run every semester for new members"),
        ];
        let index = Bm25Index::build(&chunks);

        let results = index.search("robotics competition", 10);
        assert!(!results.is_empty());
        assert_eq!(results[0].0, chunks[0].id);
    }

    #[test]
    fn test_nonmatching_query_returns_empty() {
        let chunks = vec![chunk("alpha beta gamma")];
        let index = Bm25Index::build(&chunks);
        assert!(index.search("zeppelin", 10).is_empty());
    }

    #[test]
    fn test_empty_query_returns_empty() {
        let chunks = vec![chunk("alpha beta gamma")];
        let index = Bm25Index::build(&chunks);
        assert!(index.search("", 10).is_empty());
        assert!(index.search("?!", 10).is_empty());
    }

    #[test]
    fn test_empty_index_returns_empty() {
        let index = Bm25Index::build(&[]);
        assert!(index.is_empty());
        assert!(index.search("anything", 10).is_empty());
    }

    #[test]
    fn test_rare_term_outweighs_common_term() {
        // "team" appears everywhere, "holland" in exactly one chunk.
        let chunks = vec![
            chunk("the team practices daily"),
            chunk("the team travels to holland"),
            chunk("the team recruits in autumn"),
        ];
        let index = Bm25Index::build(&chunks);

        let results = index.search("team holland", 10);
        assert_eq!(results[0].0, chunks[1].id);
        // Every chunk matches "team" so all three score.
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_limit_truncates() {
        let chunks: Vec<Chunk> = (0..5)
            .map(|i| chunk(&format!("shared term plus unique{i}")))
            .collect();
        let index = Bm25Index::build(&chunks);
        let results = index.search("shared term", 2);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_vocabulary_size() {
        let chunks = vec![chunk("alpha beta"), chunk("beta gamma")];
        let index = Bm25Index::build(&chunks);
        assert_eq!(index.vocabulary_size(), 3);
        assert_eq!(index.len(), 2);
    }
}
