//! Mock LLM for tests and offline runs.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::Message;

use super::{LlmClient, LlmResponse};

type Responder = Box<dyn Fn(&[Message]) -> Result<String, AgentError> + Send + Sync>;

/// Mock LLM: answers from a fixed text or a closure over the request messages.
///
/// Closures usually dispatch on the system prompt (`messages[0]`) to script each
/// node's answer. `call_count` counts every invocation, failed ones included.
pub struct MockLlm {
    responder: Responder,
    calls: AtomicUsize,
}

impl MockLlm {
    /// Always answers `text`.
    pub fn with_response(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::from_fn(move |_| Ok(text.clone()))
    }

    /// Answers with whatever `f` returns for the request.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&[Message]) -> Result<String, AgentError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(f),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let content = (self.responder)(messages)?;
        Ok(LlmResponse { content })
    }
}
