//! Configuration for docent.
//!
//! `DocentConfig` represents the `docent.toml` file that controls the
//! inference server endpoint, the corpus source, chunking parameters,
//! retrieval weights, and the index location. All fields have defaults,
//! so an absent or empty config file yields a working setup pointed at
//! a local Ollama instance.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration, loaded from `docent.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocentConfig {
    #[serde(default)]
    pub ollama: OllamaConfig,

    #[serde(default)]
    pub corpus: CorpusConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub index: IndexConfig,
}

/// Inference server settings (chat + embeddings).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// OpenAI-compatible base URL of the inference server.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for answer generation.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Model used for embeddings.
    #[serde(default = "default_embed_model")]
    pub embed_model: String,

    /// Output dimensionality of the embedding model.
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,

    /// Maximum tokens to generate per answer.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature for answers.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_base_url() -> String {
    "http://localhost:11434/v1".to_string()
}

fn default_chat_model() -> String {
    "llama3".to_string()
}

fn default_embed_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_embedding_dimension() -> usize {
    768
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f64 {
    0.2
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_model: default_chat_model(),
            embed_model: default_embed_model(),
            embedding_dimension: default_embedding_dimension(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Corpus source and chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Path to a local `.txt` file, or an http(s) URL.
    #[serde(default = "default_source")]
    pub source: String,

    /// Target chunk size in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Text substituted as a one-document corpus when loading fails.
    #[serde(default = "default_fallback_text")]
    pub fallback_text: String,
}

fn default_source() -> String {
    "data/corpus.txt".to_string()
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_fallback_text() -> String {
    "Placeholder corpus: the configured document source could not be loaded. \
     docent answers questions from retrieved context only, so answers will \
     be limited until a real corpus is indexed."
        .to_string()
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            fallback_text: default_fallback_text(),
        }
    }
}

/// How semantic and keyword rankings are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionMethod {
    /// Max-normalize each ranking, then weighted sum.
    Weighted,
    /// Reciprocal rank fusion (score = weight / (k + rank)).
    Rrf,
}

/// Hybrid retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks handed to the answer prompt.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Each retriever fetches `top_k * fetch_multiplier` candidates
    /// before fusion.
    #[serde(default = "default_fetch_multiplier")]
    pub fetch_multiplier: usize,

    /// Weight of the semantic (vector) ranking.
    #[serde(default = "default_semantic_weight")]
    pub semantic_weight: f32,

    /// Weight of the keyword (BM25) ranking.
    #[serde(default = "default_keyword_weight")]
    pub keyword_weight: f32,

    #[serde(default = "default_fusion")]
    pub fusion: FusionMethod,
}

fn default_top_k() -> usize {
    4
}

fn default_fetch_multiplier() -> usize {
    3
}

fn default_semantic_weight() -> f32 {
    0.7
}

fn default_keyword_weight() -> f32 {
    0.3
}

fn default_fusion() -> FusionMethod {
    FusionMethod::Weighted
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            fetch_multiplier: default_fetch_multiplier(),
            semantic_weight: default_semantic_weight(),
            keyword_weight: default_keyword_weight(),
            fusion: default_fusion(),
        }
    }
}

/// Persistent index location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Directory holding the LanceDB dataset.
    #[serde(default = "default_index_dir")]
    pub dir: PathBuf,
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("./docent_index")
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dir: default_index_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: DocentConfig = toml::from_str("").unwrap();
        assert_eq!(config.ollama.base_url, "http://localhost:11434/v1");
        assert_eq!(config.ollama.chat_model, "llama3");
        assert_eq!(config.ollama.embed_model, "nomic-embed-text");
        assert_eq!(config.ollama.embedding_dimension, 768);
        assert_eq!(config.corpus.chunk_size, 1000);
        assert_eq!(config.corpus.chunk_overlap, 200);
        assert_eq!(config.retrieval.top_k, 4);
        assert!((config.retrieval.semantic_weight - 0.7).abs() < f32::EPSILON);
        assert!((config.retrieval.keyword_weight - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.retrieval.fusion, FusionMethod::Weighted);
        assert_eq!(config.index.dir, PathBuf::from("./docent_index"));
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let toml_str = r#"
[corpus]
source = "https://example.com/handbook"
chunk_size = 500

[retrieval]
fusion = "rrf"
"#;
        let config: DocentConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.corpus.source, "https://example.com/handbook");
        assert_eq!(config.corpus.chunk_size, 500);
        // Untouched sections keep their defaults
        assert_eq!(config.corpus.chunk_overlap, 200);
        assert_eq!(config.ollama.chat_model, "llama3");
        assert_eq!(config.retrieval.fusion, FusionMethod::Rrf);
    }

    #[test]
    fn test_full_toml_roundtrip() {
        let config = DocentConfig {
            ollama: OllamaConfig {
                base_url: "http://10.0.0.5:11434/v1".to_string(),
                chat_model: "llama3.1".to_string(),
                embed_model: "mxbai-embed-large".to_string(),
                embedding_dimension: 1024,
                max_tokens: 2048,
                temperature: 0.5,
            },
            ..Default::default()
        };
        let serialized = toml::to_string(&config).unwrap();
        let parsed: DocentConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.ollama.base_url, "http://10.0.0.5:11434/v1");
        assert_eq!(parsed.ollama.embedding_dimension, 1024);
    }

    #[test]
    fn test_fallback_text_is_nonempty() {
        let config = CorpusConfig::default();
        assert!(!config.fallback_text.trim().is_empty());
    }
}
