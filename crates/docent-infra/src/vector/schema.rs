//! Arrow schema for the LanceDB chunk table.
//!
//! One table (`chunks`) holds every indexed corpus chunk together with
//! its embedding vector. The vector width is the configured embedding
//! dimension, so the schema is built per-run rather than being a static.
//!
//! Arrow versions MUST match lancedb's transitive dependency (57.3 for
//! lancedb 0.26).

use std::sync::Arc;

use arrow_schema::{DataType, Field, Schema};

/// Name of the single chunk table.
pub const CHUNK_TABLE: &str = "chunks";

/// Schema for the chunk table, parameterized by embedding dimension.
pub fn chunk_table_schema(dimension: i32) -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("document_id", DataType::Utf8, false),
        Field::new("ordinal", DataType::Int32, false),
        Field::new("source", DataType::Utf8, false),
        Field::new("text", DataType::Utf8, false),
        Field::new("embedding_model", DataType::Utf8, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, true)),
                dimension,
            ),
            false,
        ),
    ])
}
