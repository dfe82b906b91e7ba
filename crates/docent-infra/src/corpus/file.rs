//! Local text file loader.

use std::path::PathBuf;

use docent_core::corpus::DocumentLoader;
use docent_types::document::{Document, DocumentSource};
use docent_types::error::CorpusError;

/// Loads the corpus from a single UTF-8 text file.
pub struct FileLoader {
    path: PathBuf,
}

impl FileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentLoader for FileLoader {
    async fn load(&self) -> Result<Vec<Document>, CorpusError> {
        let content =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| CorpusError::FileRead {
                    path: self.path.display().to_string(),
                    message: e.to_string(),
                })?;

        if content.trim().is_empty() {
            return Err(CorpusError::EmptyContent(self.path.display().to_string()));
        }

        Ok(vec![Document::new(
            DocumentSource::File {
                path: self.path.clone(),
            },
            content,
        )])
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_loads_utf8_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "the corpus text").unwrap();

        let loader = FileLoader::new(file.path());
        let docs = loader.load().await.unwrap();

        assert_eq!(docs.len(), 1);
        assert!(docs[0].content.contains("the corpus text"));
        assert!(matches!(docs[0].source, DocumentSource::File { .. }));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let loader = FileLoader::new("/nonexistent/corpus.txt");
        let err = loader.load().await.unwrap_err();
        assert!(matches!(err, CorpusError::FileRead { .. }));
    }

    #[tokio::test]
    async fn test_blank_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "   \n\t").unwrap();

        let loader = FileLoader::new(file.path());
        let err = loader.load().await.unwrap_err();
        assert!(matches!(err, CorpusError::EmptyContent(_)));
    }
}
