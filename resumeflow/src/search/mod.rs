//! Web search abstraction used by the research loop.
//!
//! `web_searcher` issues one [`SearchClient::search`] per pending query (concurrently,
//! at most three) and folds the hits into a summary string.

mod mock;

#[cfg(feature = "web-search")]
mod http;

pub use mock::MockSearch;

#[cfg(feature = "web-search")]
pub use http::{HttpSearchClient, DEFAULT_SEARCH_URL};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// One search result.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
}

/// Search backend: query text in, ranked hits out.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, AgentError>;
}

/// Stand-in when no search API key is configured: every query fails, so the research
/// phase reports the missing key through its `error` frame while the other phases run.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnconfiguredSearch;

#[async_trait]
impl SearchClient for UnconfiguredSearch {
    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, AgentError> {
        Err(AgentError::Service(
            "no search API key configured (SEARCH_API_KEY or config.searchApiKey)".to_string(),
        ))
    }
}
