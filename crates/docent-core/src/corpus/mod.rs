//! Corpus loading and chunking seams.

pub mod chunker;
pub mod loader;

pub use chunker::Chunker;
pub use loader::{DocumentLoader, load_with_fallback};
