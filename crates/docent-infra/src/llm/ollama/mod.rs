//! Ollama chat provider via the OpenAI-compatible API.
//!
//! Ollama exposes `/v1/chat/completions` alongside its native API, so one
//! [`async_openai`] client pointed at the configured base URL covers both
//! streaming and non-streaming generation. The same approach works for
//! any other OpenAI-compatible inference server (llama.cpp server, vLLM)
//! by changing `base_url` in `docent.toml`.

pub mod streaming;

use std::pin::Pin;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, ChatCompletionStreamOptions,
    CreateChatCompletionRequest, FinishReason,
};
use futures_util::Stream;

use docent_core::llm::provider::LlmProvider;
use docent_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, MessageRole, StopReason, StreamEvent, Usage,
};

use self::streaming::map_openai_stream;

/// Chat provider for a local Ollama (or any OpenAI-compatible) server.
pub struct OllamaProvider {
    client: Client<OpenAIConfig>,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    /// Create a provider against the given OpenAI-compatible base URL.
    ///
    /// Ollama ignores the API key but async-openai requires one to be
    /// set, so a placeholder is used.
    pub fn new(base_url: &str, model: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key("ollama")
            .with_api_base(base_url);

        Self {
            client: Client::with_config(config),
            base_url: base_url.to_string(),
            model: model.to_string(),
        }
    }

    /// The configured chat model.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build a [`CreateChatCompletionRequest`] from a generic
    /// [`CompletionRequest`].
    fn build_request(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> CreateChatCompletionRequest {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();

        if let Some(ref system) = request.system {
            messages.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(system.clone()),
                    name: None,
                },
            ));
        }

        for msg in &request.messages {
            let oai_msg = match msg.role {
                MessageRole::System => {
                    ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                        content: ChatCompletionRequestSystemMessageContent::Text(
                            msg.content.clone(),
                        ),
                        name: None,
                    })
                }
                // The answer engine only ever sends a single user turn,
                // but map assistant turns anyway so the provider stays
                // usable for multi-turn shapes.
                MessageRole::User | MessageRole::Assistant => {
                    ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                        content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
                        name: None,
                    })
                }
            };
            messages.push(oai_msg);
        }

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        let mut req = CreateChatCompletionRequest {
            model,
            messages,
            max_completion_tokens: Some(request.max_tokens),
            temperature: request.temperature.map(|t| t as f32),
            ..Default::default()
        };

        if stream {
            req.stream = Some(true);
            req.stream_options = Some(ChatCompletionStreamOptions {
                include_usage: Some(true),
                include_obfuscation: None,
            });
        }

        req
    }
}

// OllamaProvider does not derive Debug: the async-openai Client holds
// configuration internals that have no business in logs.

impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let oai_request = self.build_request(request, false);

        let response = self
            .client
            .chat()
            .create(oai_request)
            .await
            .map_err(|e| map_openai_error(e, &self.base_url, &self.model))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        let stop_reason = response
            .choices
            .first()
            .and_then(|c| c.finish_reason.as_ref())
            .map(|fr| match fr {
                FinishReason::Length => StopReason::MaxTokens,
                _ => StopReason::EndTurn,
            })
            .unwrap_or(StopReason::EndTurn);

        let usage = response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: response.id,
            content,
            model: response.model,
            stop_reason,
            usage,
        })
    }

    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        let oai_request = self.build_request(&request, true);

        // Clone for the 'static stream closure
        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let model = self.model.clone();

        Box::pin(async_stream::try_stream! {
            let oai_stream = client
                .chat()
                .create_stream(oai_request)
                .await
                .map_err(|e| map_openai_error(e, &base_url, &model))?;

            let mut inner = map_openai_stream(oai_stream);

            use futures_util::StreamExt;
            while let Some(event) = inner.next().await {
                match event {
                    Ok(ev) => yield ev,
                    Err(e) => Err(e)?,
                }
            }
        })
    }
}

/// Map an `async_openai::error::OpenAIError` to an [`LlmError`].
///
/// The cases worth distinguishing against a local server: the server is
/// not running at all, and the requested model has not been pulled.
fn map_openai_error(
    err: async_openai::error::OpenAIError,
    base_url: &str,
    model: &str,
) -> LlmError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            if api_err.message.contains("not found")
                || api_err.code.as_deref() == Some("model_not_found")
            {
                LlmError::ModelNotFound(model.to_string())
            } else {
                LlmError::Server {
                    message: api_err.message.clone(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => {
            if reqwest_err.is_connect() || reqwest_err.is_timeout() {
                LlmError::Unreachable {
                    base_url: base_url.to_string(),
                    message: reqwest_err.to_string(),
                }
            } else if reqwest_err.status() == Some(reqwest::StatusCode::NOT_FOUND) {
                LlmError::ModelNotFound(model.to_string())
            } else {
                LlmError::Server {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::JSONDeserialize(_, content) => {
            LlmError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::StreamError(stream_err) => LlmError::Stream(stream_err.to_string()),
        OpenAIError::InvalidArgument(msg) => LlmError::InvalidRequest(msg.clone()),
        _ => LlmError::Server {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_types::llm::Message;

    fn request(stream: bool) -> CompletionRequest {
        CompletionRequest {
            model: "llama3".to_string(),
            messages: vec![Message {
                role: MessageRole::User,
                content: "Context...\n\nQuestion: who?".to_string(),
            }],
            system: Some("Answer from context only.".to_string()),
            max_tokens: 1024,
            temperature: Some(0.2),
            stream,
        }
    }

    #[test]
    fn test_build_request_includes_system_and_user() {
        let provider = OllamaProvider::new("http://localhost:11434/v1", "llama3");
        let oai_req = provider.build_request(&request(false), false);

        assert_eq!(oai_req.model, "llama3");
        // 1 system + 1 user
        assert_eq!(oai_req.messages.len(), 2);
        assert_eq!(oai_req.max_completion_tokens, Some(1024));
        assert!(oai_req.stream.is_none());
        assert!(oai_req.stream_options.is_none());
    }

    #[test]
    fn test_build_request_streaming_sets_options() {
        let provider = OllamaProvider::new("http://localhost:11434/v1", "llama3");
        let oai_req = provider.build_request(&request(true), true);

        assert_eq!(oai_req.stream, Some(true));
        let opts = oai_req.stream_options.unwrap();
        assert_eq!(opts.include_usage, Some(true));
    }

    #[test]
    fn test_build_request_empty_model_uses_default() {
        let provider = OllamaProvider::new("http://localhost:11434/v1", "llama3");
        let mut req = request(false);
        req.model = String::new();

        let oai_req = provider.build_request(&req, false);
        assert_eq!(oai_req.model, "llama3");
    }

    #[test]
    fn test_map_api_error_model_not_found() {
        use async_openai::error::{ApiError, OpenAIError};

        let api_err = ApiError {
            message: "model 'llama9' not found, try pulling it first".to_string(),
            r#type: None,
            param: None,
            code: None,
        };
        let err = map_openai_error(
            OpenAIError::ApiError(api_err),
            "http://localhost:11434/v1",
            "llama9",
        );
        assert!(matches!(err, LlmError::ModelNotFound(m) if m == "llama9"));
    }

    #[test]
    fn test_map_invalid_argument() {
        use async_openai::error::OpenAIError;

        let err = map_openai_error(
            OpenAIError::InvalidArgument("bad arg".to_string()),
            "http://localhost:11434/v1",
            "llama3",
        );
        assert!(matches!(err, LlmError::InvalidRequest(_)));
    }
}
