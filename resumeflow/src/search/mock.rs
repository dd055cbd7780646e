//! Mock search backend for tests and offline runs.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AgentError;

use super::{SearchClient, SearchHit};

type Responder = Box<dyn Fn(&str) -> Result<Vec<SearchHit>, AgentError> + Send + Sync>;

/// Mock search: answers from a closure over the query and records every query seen.
pub struct MockSearch {
    responder: Responder,
    queries: Mutex<Vec<String>>,
}

impl MockSearch {
    /// Answers every query with one hit echoing the query text.
    pub fn echo() -> Self {
        Self::from_fn(|q| {
            Ok(vec![SearchHit {
                title: format!("Result for {}", q),
                url: format!("https://example.com/search?q={}", q.replace(' ', "+")),
                content: format!("Notes about {}", q),
            }])
        })
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<Vec<SearchHit>, AgentError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(f),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queries received so far, in call order.
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }
}

impl Default for MockSearch {
    fn default() -> Self {
        Self::echo()
    }
}

#[async_trait]
impl SearchClient for MockSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, AgentError> {
        if let Ok(mut seen) = self.queries.lock() {
            seen.push(query.to_string());
        }
        (self.responder)(query)
    }
}
