//! External collaborators reachable from nodes.

use std::sync::Arc;

use crate::llm::LlmClient;
use crate::search::SearchClient;

/// Generative and search clients shared (read-only) by every node of a run.
///
/// **Interaction**: Built by the server or CLI from request config; carried in
/// [`RunContext`](crate::graph::RunContext).
#[derive(Clone)]
pub struct Services {
    pub llm: Arc<dyn LlmClient>,
    pub search: Arc<dyn SearchClient>,
}

impl Services {
    pub fn new(llm: Arc<dyn LlmClient>, search: Arc<dyn SearchClient>) -> Self {
        Self { llm, search }
    }

    /// Real clients from the credential fields of `config`: `ChatOpenAI` for the model
    /// (with the configured temperature, if any),
    /// `HttpSearchClient` when a search key is present and
    /// [`UnconfiguredSearch`](crate::search::UnconfiguredSearch) otherwise.
    #[cfg(all(feature = "openai", feature = "web-search"))]
    pub fn from_config(config: &crate::config::PhaseConfig) -> Result<Self, crate::error::AgentError> {
        use crate::llm::ChatOpenAI;
        use crate::search::{HttpSearchClient, UnconfiguredSearch};

        let mut llm = ChatOpenAI::from_parts(
            config.api_key.as_deref(),
            config.base_url.as_deref(),
            config.model.as_deref(),
        );
        if let Some(t) = config.temperature {
            llm = llm.with_temperature(t);
        }
        let search: Arc<dyn SearchClient> = match config.search_api_key.as_deref() {
            Some(key) if !key.is_empty() => {
                Arc::new(HttpSearchClient::new(key, config.search_url.as_deref())?)
            }
            _ => Arc::new(UnconfiguredSearch),
        };
        Ok(Self::new(Arc::new(llm), search))
    }
}
