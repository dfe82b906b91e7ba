//! Corpus loading and chunking implementations.

pub mod chunker;
pub mod file;
pub mod web;

pub use chunker::SemanticChunker;
pub use file::FileLoader;
pub use web::WebLoader;

use docent_core::corpus::DocumentLoader;
use docent_types::document::Document;
use docent_types::error::CorpusError;

/// Loader selected from the configured corpus source string.
///
/// `http://` and `https://` sources fetch over the network; anything
/// else is treated as a local file path.
pub enum SourceLoader {
    File(FileLoader),
    Web(WebLoader),
}

impl SourceLoader {
    pub fn from_source(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            SourceLoader::Web(WebLoader::new(source))
        } else {
            SourceLoader::File(FileLoader::new(source))
        }
    }
}

impl DocumentLoader for SourceLoader {
    async fn load(&self) -> Result<Vec<Document>, CorpusError> {
        match self {
            SourceLoader::File(loader) => loader.load().await,
            SourceLoader::Web(loader) => loader.load().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            SourceLoader::File(loader) => loader.describe(),
            SourceLoader::Web(loader) => loader.describe(),
        }
    }
}
