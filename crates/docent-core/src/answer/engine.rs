//! Answer engine: one question plus retrieved context in, one grounded
//! answer out, streaming or not.

use std::pin::Pin;

use futures_util::Stream;

use docent_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, Message, MessageRole, StreamEvent,
};
use docent_types::retrieval::ScoredChunk;

use crate::answer::prompt::{SYSTEM_PROMPT, build_user_prompt};
use crate::llm::provider::LlmProvider;

/// Generation settings carried per engine instance.
#[derive(Debug, Clone)]
pub struct AnswerOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

/// Turns a question and its retrieved context into a completion request
/// against the configured provider.
pub struct AnswerEngine<P> {
    provider: P,
    options: AnswerOptions,
}

impl<P: LlmProvider> AnswerEngine<P> {
    pub fn new(provider: P, options: AnswerOptions) -> Self {
        Self { provider, options }
    }

    /// Answer a question in one shot.
    pub async fn answer(
        &self,
        question: &str,
        context: &[ScoredChunk],
    ) -> Result<CompletionResponse, LlmError> {
        let request = self.build_request(question, context, false);
        self.provider.complete(&request).await
    }

    /// Answer a question as a stream of events.
    pub fn answer_stream(
        &self,
        question: &str,
        context: &[ScoredChunk],
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        let request = self.build_request(question, context, true);
        self.provider.stream(request)
    }

    fn build_request(
        &self,
        question: &str,
        context: &[ScoredChunk],
        stream: bool,
    ) -> CompletionRequest {
        CompletionRequest {
            model: self.options.model.clone(),
            messages: vec![Message {
                role: MessageRole::User,
                content: build_user_prompt(question, context),
            }],
            system: Some(SYSTEM_PROMPT.to_string()),
            max_tokens: self.options.max_tokens,
            temperature: Some(self.options.temperature),
            stream,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_types::llm::{StopReason, Usage};

    /// Provider that records the request and echoes a canned answer.
    struct EchoProvider;

    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            Ok(CompletionResponse {
                id: "resp-1".to_string(),
                content: format!("echo: {}", request.messages[0].content),
                model: request.model.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            })
        }

        fn stream(
            &self,
            request: CompletionRequest,
        ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
            Box::pin(futures_util::stream::iter(vec![
                Ok(StreamEvent::TextDelta {
                    text: format!("echo: {}", request.messages[0].content),
                }),
                Ok(StreamEvent::Done),
            ]))
        }
    }

    fn engine() -> AnswerEngine<EchoProvider> {
        AnswerEngine::new(
            EchoProvider,
            AnswerOptions {
                model: "llama3".to_string(),
                max_tokens: 512,
                temperature: 0.2,
            },
        )
    }

    #[tokio::test]
    async fn test_answer_sends_question_and_model() {
        let response = engine().answer("where is the team from?", &[]).await.unwrap();
        assert!(response.content.contains("where is the team from?"));
        assert_eq!(response.model, "llama3");
    }

    #[tokio::test]
    async fn test_answer_stream_emits_text_then_done() {
        use futures_util::StreamExt;

        let mut stream = engine().answer_stream("question?", &[]);
        let first = stream.next().await.unwrap().unwrap();
        match first {
            StreamEvent::TextDelta { text } => assert!(text.contains("question?")),
            other => panic!("expected TextDelta, got {other:?}"),
        }
        let second = stream.next().await.unwrap().unwrap();
        assert!(matches!(second, StreamEvent::Done));
    }
}
