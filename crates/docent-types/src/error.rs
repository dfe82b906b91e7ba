//! Error taxonomies for the docent pipeline.

use thiserror::Error;

/// Errors from loading or splitting the document corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read '{path}': {message}")]
    FileRead { path: String, message: String },

    #[error("failed to fetch '{url}': {message}")]
    Fetch { url: String, message: String },

    #[error("source '{0}' has no usable content")]
    EmptyContent(String),

    #[error("invalid chunking config: {0}")]
    ChunkConfig(String),
}

/// Errors from building, reloading, or querying the vector index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The fatal startup case: nothing to index and nothing persisted.
    #[error("no chunks to index and no persisted index on disk")]
    EmptyCorpus,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("embedding dimension mismatch: index expects {expected}, embedder produced {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Errors while answering a single question.
///
/// These are caught by the ask loop, printed, and never terminate the
/// session.
#[derive(Debug, Error)]
pub enum AskError {
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] IndexError),

    #[error("generation failed: {0}")]
    Generation(#[from] crate::llm::LlmError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_error_display() {
        let err = CorpusError::FileRead {
            path: "data/corpus.txt".to_string(),
            message: "No such file or directory".to_string(),
        };
        assert!(err.to_string().contains("data/corpus.txt"));
    }

    #[test]
    fn test_empty_corpus_is_the_fatal_case() {
        let err = IndexError::EmptyCorpus;
        assert_eq!(
            err.to_string(),
            "no chunks to index and no persisted index on disk"
        );
    }

    #[test]
    fn test_ask_error_wraps_index_error() {
        let err: AskError = IndexError::Storage("table missing".to_string()).into();
        assert!(err.to_string().contains("retrieval failed"));
        assert!(err.to_string().contains("table missing"));
    }

    #[test]
    fn test_ask_error_wraps_llm_error() {
        let err: AskError = crate::llm::LlmError::Stream("reset".to_string()).into();
        assert!(err.to_string().contains("generation failed"));
    }
}
