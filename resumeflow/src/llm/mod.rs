//! LLM client abstraction for the node library.
//!
//! Every generative step (JD extraction, query writing, reflection, scoring,
//! rewriting) goes through [`LlmClient::invoke`]. Structured steps ask for JSON and
//! validate it with [`parse_json_response`].

mod mock;
mod structured;

#[cfg(feature = "openai")]
mod openai;

pub use mock::MockLlm;
pub use structured::parse_json_response;

#[cfg(feature = "openai")]
pub use openai::{ChatOpenAI, DEFAULT_MODEL};

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::Message;

/// Response from an LLM completion: assistant message text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LlmResponse {
    pub content: String,
}

/// LLM client: given messages, returns assistant text.
///
/// Implementations: `MockLlm` (scripted), `ChatOpenAI` (real API, feature `openai`).
/// Timeouts are the implementation's concern; the engine never cancels a call.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Invoke one turn: read messages, return assistant content.
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError>;
}
