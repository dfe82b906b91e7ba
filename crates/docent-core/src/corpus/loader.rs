//! Document loading with the substitute-on-failure rule.
//!
//! `DocumentLoader` is implemented in docent-infra for local files and
//! URLs. `load_with_fallback` wraps any loader with the corpus-level
//! policy: a failed or empty load never aborts startup, it yields a
//! single placeholder document instead.

use tracing::{info, warn};

use docent_types::document::{Document, DocumentSource};
use docent_types::error::CorpusError;

/// Trait for loading the document corpus from its configured source.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait DocumentLoader: Send + Sync {
    /// Load all documents from the source.
    fn load(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Document>, CorpusError>> + Send;

    /// Display name of the source (shown in the banner and status view).
    fn describe(&self) -> String;
}

/// Load documents, substituting a one-document placeholder corpus when
/// the loader fails or returns only blank content.
pub async fn load_with_fallback<L: DocumentLoader>(
    loader: &L,
    fallback_text: &str,
) -> Vec<Document> {
    let loaded = match loader.load().await {
        Ok(documents) if documents.iter().any(|d| !d.is_blank()) => Some(documents),
        Ok(_) => {
            warn!(source = %loader.describe(), "source loaded but has no usable content");
            None
        }
        Err(e) => {
            warn!(source = %loader.describe(), error = %e, "failed to load corpus source");
            None
        }
    };

    match loaded {
        Some(documents) => {
            info!(
                source = %loader.describe(),
                count = documents.len(),
                "corpus loaded"
            );
            documents
        }
        None => {
            info!("substituting fallback document");
            vec![Document::new(DocumentSource::Fallback, fallback_text)]
        }
    }
}
