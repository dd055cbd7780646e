//! HTTP search client for Tavily-compatible JSON search APIs.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

use super::{SearchClient, SearchHit};

/// Default endpoint when the request config names none.
pub const DEFAULT_SEARCH_URL: &str = "https://api.tavily.com/search";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_RESULTS: u32 = 5;

/// Search over HTTP: `POST {url}` with `{api_key, query, max_results}`, expecting
/// `{results: [{title, url, content}]}` back.
///
/// # Interaction
///
/// - **reqwest::Client**: performs the POST; carries the request timeout
/// - **web_searcher**: calls `search` once per pending query
pub struct HttpSearchClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    max_results: u32,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

impl HttpSearchClient {
    /// Creates a client with a 30s timeout against `url` (or [`DEFAULT_SEARCH_URL`]).
    pub fn new(api_key: impl Into<String>, url: Option<&str>) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| AgentError::ExecutionFailed(format!("search client build failed: {}", e)))?;
        Ok(Self::with_client(client, api_key, url))
    }

    /// Creates a client around a custom `reqwest::Client` (proxies, timeouts).
    pub fn with_client(client: reqwest::Client, api_key: impl Into<String>, url: Option<&str>) -> Self {
        Self {
            client,
            url: url.unwrap_or(DEFAULT_SEARCH_URL).to_string(),
            api_key: api_key.into(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }
}

#[async_trait]
impl SearchClient for HttpSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, AgentError> {
        let body = SearchRequest {
            api_key: &self.api_key,
            query,
            max_results: self.max_results,
        };
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Service(format!("search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AgentError::Service(format!(
                "search failed with status: {}",
                response.status()
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Service(format!("failed to read search response: {}", e)))?;
        Ok(parsed.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Missing URL falls back to the default endpoint.
    #[test]
    fn new_uses_default_url() {
        let c = HttpSearchClient::new("key", None).unwrap().with_max_results(3);
        assert_eq!(c.url, DEFAULT_SEARCH_URL);
        assert_eq!(c.max_results, 3);
    }

    /// **Scenario**: Response parsing tolerates missing fields.
    #[test]
    fn response_parses_partial_hits() {
        let r: SearchResponse =
            serde_json::from_str(r#"{"results":[{"title":"t"}],"answer":null}"#).unwrap();
        assert_eq!(r.results[0].title, "t");
        assert!(r.results[0].url.is_empty());
    }
}
