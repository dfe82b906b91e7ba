//! Shared domain types for docent.
//!
//! This crate contains the core domain types used across the docent
//! pipeline: documents and chunks, retrieval results, LLM request/response
//! shapes, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, thiserror.

pub mod config;
pub mod document;
pub mod error;
pub mod llm;
pub mod retrieval;
