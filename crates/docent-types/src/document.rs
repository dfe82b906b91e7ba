//! Corpus document and chunk types.
//!
//! A `Document` is one loaded text source (a file, a fetched URL, or the
//! fallback placeholder). A `Chunk` is a bounded-size slice of a document
//! produced by the chunker, and is the unit of indexing and retrieval.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a document's content came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentSource {
    /// A local text file.
    File { path: PathBuf },
    /// A fetched URL.
    Url { url: String },
    /// The built-in placeholder substituted when loading fails.
    Fallback,
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::File { path } => write!(f, "{}", path.display()),
            DocumentSource::Url { url } => write!(f, "{url}"),
            DocumentSource::Fallback => write!(f, "<fallback>"),
        }
    }
}

/// One loaded text source, prior to chunking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub source: DocumentSource,
    pub content: String,
}

impl Document {
    /// Create a document with a fresh v7 id.
    pub fn new(source: DocumentSource, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            source,
            content: content.into(),
        }
    }

    /// True when the content is empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// A bounded-size slice of a document, the unit of indexing and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: Uuid,
    pub document_id: Uuid,
    /// Position of this chunk within its document (0-based).
    pub ordinal: u32,
    /// Display name of the originating source, carried for answer citations.
    pub source: String,
    pub text: String,
}

impl Chunk {
    pub fn new(
        document_id: Uuid,
        ordinal: u32,
        source: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            document_id,
            ordinal,
            source: source.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_source_display() {
        let file = DocumentSource::File {
            path: PathBuf::from("data/corpus.txt"),
        };
        assert_eq!(file.to_string(), "data/corpus.txt");

        let url = DocumentSource::Url {
            url: "https://example.com/page".to_string(),
        };
        assert_eq!(url.to_string(), "https://example.com/page");

        assert_eq!(DocumentSource::Fallback.to_string(), "<fallback>");
    }

    #[test]
    fn test_document_is_blank() {
        let doc = Document::new(DocumentSource::Fallback, "  \n\t ");
        assert!(doc.is_blank());

        let doc = Document::new(DocumentSource::Fallback, "some text");
        assert!(!doc.is_blank());
    }

    #[test]
    fn test_chunk_carries_document_id() {
        let doc = Document::new(DocumentSource::Fallback, "content");
        let chunk = Chunk::new(doc.id, 0, "<fallback>", "content");
        assert_eq!(chunk.document_id, doc.id);
        assert_eq!(chunk.ordinal, 0);
    }

    #[test]
    fn test_document_source_serde_roundtrip() {
        let source = DocumentSource::Url {
            url: "https://example.com".to_string(),
        };
        let json = serde_json::to_string(&source).unwrap();
        let parsed: DocumentSource = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, source);
    }
}
