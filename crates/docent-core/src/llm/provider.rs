//! LlmProvider trait definition.
//!
//! The abstraction over the chat model that answers questions. Uses RPITIT
//! (native async fn in traits, Rust 2024 edition) for `complete`, and
//! `Pin<Box<dyn Stream>>` for `stream` so streaming stays object-safe.
//!
//! The implementation lives in docent-infra (`OllamaProvider`).

use std::pin::Pin;

use futures_util::Stream;

use docent_types::llm::{CompletionRequest, CompletionResponse, LlmError, StreamEvent};

/// Trait for chat-model backends.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "ollama").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;

    /// Send a streaming completion request. Returns a stream of events.
    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;
}
