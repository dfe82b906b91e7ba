//! Application state wiring the pipeline together.
//!
//! `AppState` holds the loaded configuration. Command handlers call the
//! open/build helpers here, which pin the generic core machinery to the
//! concrete infra implementations (Ollama + LanceDB).

use std::path::Path;

use anyhow::Context;
use tracing::debug;

use docent_core::answer::AnswerEngine;
use docent_core::answer::engine::AnswerOptions;
use docent_core::corpus::{Chunker, load_with_fallback};
use docent_core::pipeline::build_or_reload;
use docent_core::retrieval::HybridRetriever;
use docent_infra::corpus::{SemanticChunker, SourceLoader};
use docent_infra::embed::OllamaEmbedder;
use docent_infra::llm::OllamaProvider;
use docent_infra::vector::LanceChunkStore;
use docent_types::config::DocentConfig;

/// Concrete type aliases for the core generics pinned to infra
/// implementations.
pub type ConcreteRetriever = HybridRetriever<OllamaEmbedder, LanceChunkStore>;
pub type ConcreteAnswerEngine = AnswerEngine<OllamaProvider>;

/// What the startup pipeline did, for the banner and index summaries.
pub struct IndexSummary {
    pub chunk_count: usize,
    pub reloaded: bool,
}

/// Shared application state holding the configuration.
#[derive(Debug)]
pub struct AppState {
    pub config: DocentConfig,
    /// Where the config came from, for the status view.
    pub config_origin: String,
}

impl AppState {
    /// Load configuration from an explicit path, `./docent.toml`, or
    /// defaults.
    pub fn init(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let (config, config_origin) = match config_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("cannot read config file {}", path.display()))?;
                let config: DocentConfig = toml::from_str(&raw)
                    .with_context(|| format!("invalid config file {}", path.display()))?;
                (config, path.display().to_string())
            }
            None => match discover_config()? {
                Some((config, origin)) => (config, origin),
                None => (DocentConfig::default(), "built-in defaults".to_string()),
            },
        };

        debug!(origin = %config_origin, "configuration loaded");
        Ok(Self {
            config,
            config_origin,
        })
    }

    /// Open the chunk store at the configured index directory.
    pub async fn open_store(&self) -> anyhow::Result<LanceChunkStore> {
        LanceChunkStore::new(
            self.config.index.dir.clone(),
            self.config.ollama.embedding_dimension,
            &self.config.ollama.embed_model,
        )
        .await
        .context("cannot open the vector index")
    }

    fn embedder(&self) -> OllamaEmbedder {
        OllamaEmbedder::new(
            &self.config.ollama.base_url,
            &self.config.ollama.embed_model,
            self.config.ollama.embedding_dimension,
        )
    }

    /// Load the corpus, chunk it, build or reload the index, and return
    /// the ready retriever using the configured retrieval settings.
    ///
    /// `progress` is forwarded to the pipeline's embedding loop.
    pub async fn open_retriever(
        &self,
        force_rebuild: bool,
        progress: impl FnMut(usize, usize),
    ) -> anyhow::Result<(ConcreteRetriever, IndexSummary)> {
        self.open_retriever_with(force_rebuild, self.config.retrieval.clone(), progress)
            .await
    }

    /// Same as [`open_retriever`](Self::open_retriever) with explicit
    /// retrieval settings (the `search` command overrides `top_k`).
    pub async fn open_retriever_with(
        &self,
        force_rebuild: bool,
        retrieval: docent_types::config::RetrievalConfig,
        progress: impl FnMut(usize, usize),
    ) -> anyhow::Result<(ConcreteRetriever, IndexSummary)> {
        let loader = SourceLoader::from_source(&self.config.corpus.source);
        let documents = load_with_fallback(&loader, &self.config.corpus.fallback_text).await;

        let chunker =
            SemanticChunker::new(self.config.corpus.chunk_size, self.config.corpus.chunk_overlap)?;
        let chunks = chunker.split(&documents)?;
        debug!(documents = documents.len(), chunks = chunks.len(), "corpus split");

        let store = self.open_store().await?;
        let embedder = self.embedder();

        let outcome = build_or_reload(&embedder, &store, chunks, force_rebuild, progress)
            .await
            .context("cannot build or reload the index")?;

        let reloaded = outcome.was_reloaded();
        let chunks = outcome.into_chunks();
        let summary = IndexSummary {
            chunk_count: chunks.len(),
            reloaded,
        };

        let retriever = HybridRetriever::new(embedder, store, chunks, retrieval);
        Ok((retriever, summary))
    }

    /// The answer engine against the configured chat model.
    pub fn answer_engine(&self) -> ConcreteAnswerEngine {
        let provider = OllamaProvider::new(
            &self.config.ollama.base_url,
            &self.config.ollama.chat_model,
        );
        AnswerEngine::new(
            provider,
            AnswerOptions {
                model: self.config.ollama.chat_model.clone(),
                max_tokens: self.config.ollama.max_tokens,
                temperature: self.config.ollama.temperature,
            },
        )
    }
}

/// Look for a config file in the conventional places: `./docent.toml`,
/// then the platform config directory.
fn discover_config() -> anyhow::Result<Option<(DocentConfig, String)>> {
    let mut candidates = vec![std::path::PathBuf::from("docent.toml")];
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("docent").join("docent.toml"));
    }

    for path in candidates {
        if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read config file {}", path.display()))?;
            let config: DocentConfig = toml::from_str(&raw)
                .with_context(|| format!("invalid config file {}", path.display()))?;
            return Ok(Some((config, path.display().to_string())));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_init_without_config_falls_back_cleanly() {
        let state = AppState::init(None).unwrap();
        assert!(!state.config.ollama.chat_model.is_empty());
        assert!(!state.config_origin.is_empty());
    }

    #[test]
    fn test_init_with_explicit_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[ollama]\nchat_model = \"llama3.1\"\n\n[retrieval]\ntop_k = 8"
        )
        .unwrap();

        let state = AppState::init(Some(file.path())).unwrap();
        assert_eq!(state.config.ollama.chat_model, "llama3.1");
        assert_eq!(state.config.retrieval.top_k, 8);
        // Unspecified fields keep defaults
        assert_eq!(state.config.corpus.chunk_size, 1000);
    }

    #[test]
    fn test_init_with_missing_config_is_an_error() {
        let err = AppState::init(Some(Path::new("/nonexistent/docent.toml"))).unwrap_err();
        assert!(err.to_string().contains("cannot read config file"));
    }

    #[test]
    fn test_init_with_invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[retrieval\ntop_k = oops").unwrap();

        let err = AppState::init(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("invalid config file"));
    }
}
