//! `web_searcher`: one search per pending query, summaries appended.

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::json;

use crate::error::AgentError;
use crate::graph::{Node, RunContext};
use crate::search::SearchHit;
use crate::state::{keys, StateUpdate, WorkflowState};

use super::names;

/// Searches every query in `queries` concurrently, appends one summary per query to
/// `summaries` and consumes the queue (`queries = []`). Any failed search fails the node.
pub struct WebSearcherNode;

fn summarize(query: &str, hits: &[SearchHit]) -> String {
    let mut out = format!("Search: {}", query);
    if hits.is_empty() {
        out.push_str("\nNo results.");
    }
    for hit in hits {
        out.push_str(&format!("\n- {} ({}): {}", hit.title, hit.url, hit.content.trim()));
    }
    out
}

#[async_trait]
impl Node for WebSearcherNode {
    fn id(&self) -> &str {
        names::WEB_SEARCHER
    }

    async fn run(&self, state: WorkflowState, ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        let queries: Vec<String> = state.decode(keys::QUERIES)?.unwrap_or_default();
        let search = &ctx.services.search;
        let results = join_all(queries.iter().map(|q| search.search(q))).await;

        let mut summaries = Vec::with_capacity(queries.len());
        for (query, result) in queries.iter().zip(results) {
            let hits = result?;
            summaries.push(summarize(query, &hits));
        }
        Ok(StateUpdate::new()
            .set(keys::SUMMARIES, summaries)
            .set(keys::QUERIES, json!([])))
    }
}
