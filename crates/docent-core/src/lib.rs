//! Retrieval logic and provider traits for docent.
//!
//! This crate owns everything between the raw corpus and the rendered
//! answer: the trait seams implemented by `docent-infra` (`LlmProvider`,
//! `Embedder`, `ChunkStore`, `DocumentLoader`, `Chunker`), the BM25
//! keyword index, rank fusion, the hybrid retrieval engine, prompt
//! assembly, and the index build/reload pipeline.

pub mod answer;
pub mod corpus;
pub mod embed;
pub mod index;
pub mod llm;
pub mod pipeline;
pub mod retrieval;
