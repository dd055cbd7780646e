//! OpenAI Chat Completions client implementing `LlmClient` (ChatOpenAI).
//!
//! Uses the real OpenAI Chat Completions API or any compatible endpoint. Requires an
//! API key from the environment (`OPENAI_API_KEY`) or explicit config.
//!
//! **Interaction**: Implements `LlmClient`; built by the server and CLI per request
//! from `PhaseConfig` credentials. Depends on `async_openai` (feature `openai`).

use async_trait::async_trait;

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::Message;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
    },
    Client,
};

/// Model used when neither request config nor environment names one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI Chat Completions client implementing `LlmClient`.
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
}

impl ChatOpenAI {
    /// Build client with default config (API key from `OPENAI_API_KEY` env).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            model: model.into(),
            temperature: None,
        }
    }

    /// Build client with custom config (e.g. custom API key or base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            temperature: None,
        }
    }

    /// Build client from optional key / base URL / model, as carried in request config.
    /// Missing pieces fall back to the async-openai defaults and [`DEFAULT_MODEL`].
    pub fn from_parts(api_key: Option<&str>, base_url: Option<&str>, model: Option<&str>) -> Self {
        let mut config = OpenAIConfig::new();
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            config = config.with_api_key(key);
        }
        if let Some(base) = base_url.filter(|b| !b.is_empty()) {
            // async_openai appends "/chat/completions"; a trailing slash would double it.
            config = config.with_api_base(base.trim_end_matches('/'));
        }
        Self::with_config(config, model.unwrap_or(DEFAULT_MODEL))
    }

    /// Set temperature (0–2). Lower values are more deterministic.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    /// Convert our `Message` list to OpenAI request messages.
    fn messages_to_request(messages: &[Message]) -> Vec<ChatCompletionRequestMessage> {
        messages
            .iter()
            .map(|m| match m {
                Message::System(s) => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage::from(s.as_str()),
                ),
                Message::User(s) => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage::from(s.as_str()),
                ),
                Message::Assistant(s) => {
                    ChatCompletionRequestMessage::Assistant((s.as_str()).into())
                }
            })
            .collect()
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(Self::messages_to_request(messages));
        if let Some(t) = self.temperature {
            args.temperature(t);
        }

        let request = args.build().map_err(|e| {
            AgentError::ExecutionFailed(format!("OpenAI request build failed: {}", e))
        })?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::Service(format!("OpenAI API error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Service("OpenAI returned no choices".to_string()))?;

        Ok(LlmResponse {
            content: choice.message.content.unwrap_or_default(),
        })
    }
}

#[cfg(all(test, feature = "openai"))]
mod tests {
    use super::*;

    /// **Scenario**: ChatOpenAI::new sets the model.
    #[test]
    fn chat_openai_new_creates_client() {
        assert_eq!(ChatOpenAI::new("gpt-4").model(), "gpt-4");
    }

    /// **Scenario**: from_parts falls back to the default model and accepts a base URL.
    #[test]
    fn chat_openai_from_parts_defaults_model() {
        let c = ChatOpenAI::from_parts(Some("sk-test"), Some("http://localhost:1234/v1/"), None);
        assert_eq!(c.model(), DEFAULT_MODEL);
        let c = ChatOpenAI::from_parts(None, None, Some("gpt-4o"));
        assert_eq!(c.model(), "gpt-4o");
        assert_eq!(c.temperature(), None);
        assert_eq!(c.with_temperature(0.2).temperature(), Some(0.2));
    }
}
