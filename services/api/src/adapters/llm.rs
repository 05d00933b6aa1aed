//! services/api/src/adapters/llm.rs
//!
//! This module contains the adapter for the chat-completion LLM used by every
//! study-material pipeline. It implements the `ChatCompletionService` port
//! from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use study_buddy_core::{
    domain::ChatRequest,
    ports::{ChatCompletionService, PortError, PortResult},
};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ChatCompletionService` using an OpenAI-compatible LLM.
///
/// The client is optional so the server can start without a key; every call
/// then fails fast with a configuration error.
#[derive(Clone)]
pub struct OpenAiChatAdapter {
    client: Option<Client<OpenAIConfig>>,
}

impl OpenAiChatAdapter {
    /// Creates a new `OpenAiChatAdapter`.
    pub fn new(api_key: Option<&str>) -> Self {
        let client = api_key.map(|key| Client::with_config(OpenAIConfig::new().with_api_key(key)));
        Self { client }
    }
}

//=========================================================================================
// `ChatCompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ChatCompletionService for OpenAiChatAdapter {
    async fn complete(&self, request: &ChatRequest) -> PortResult<String> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| PortError::Configuration("OpenAI API key not set.".to_string()))?;

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system.as_str())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.user.as_str())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let api_request = CreateChatCompletionRequestArgs::default()
            .model(&request.model)
            .messages(messages)
            .temperature(request.temperature)
            .max_completion_tokens(request.max_tokens)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        debug!(model = %request.model, prompt_len = request.user.len(), "Sending chat completion");

        // Call the API and manually map the error, which respects the orphan rule.
        let response = client
            .chat()
            .create(api_request)
            .await
            .map_err(|e: OpenAIError| PortError::Generation(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| PortError::Generation("No response from OpenAI".to_string()))
    }
}
