//! LanceDB-backed persistent chunk index.

pub mod lance;
pub mod schema;

pub use lance::LanceChunkStore;
