//! Infrastructure implementations for docent.
//!
//! Concrete backends for the docent-core trait seams: the Ollama chat
//! provider and embedder (OpenAI-compatible API), the LanceDB chunk
//! store, the file/URL document loaders, and the text-splitter chunker.

pub mod corpus;
pub mod embed;
pub mod llm;
pub mod vector;
