//! `reflection`: decides whether the research loop has enough material.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::AgentError;
use crate::graph::{Node, RunContext};
use crate::llm::parse_json_response;
use crate::state::{keys, StateUpdate, WorkflowState};

use super::query_writer::distinct_queries;
use super::{ask, names, prompts};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Verdict {
    #[serde(alias = "is_sufficient")]
    is_sufficient: bool,
    #[serde(default, alias = "knowledge_gap")]
    knowledge_gap: String,
    #[serde(default, alias = "follow_up_queries")]
    follow_up_queries: Vec<String>,
}

/// Judges `summaries` against `research_topic` and bumps `research_loop_count`.
///
/// Sufficient clears `queries`; otherwise the follow-up queries and the gap are
/// written for the next `web_searcher` pass. The loop exit lives in
/// [`routes::after_reflection`](super::routes::after_reflection).
pub struct ReflectionNode;

#[async_trait]
impl Node for ReflectionNode {
    fn id(&self) -> &str {
        names::REFLECTION
    }

    async fn run(&self, state: WorkflowState, ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        let topic = state.get_str(keys::RESEARCH_TOPIC).unwrap_or_default();
        let summaries: Vec<String> = state.decode(keys::SUMMARIES)?.unwrap_or_default();
        let loops: u64 = state.decode(keys::RESEARCH_LOOP_COUNT)?.unwrap_or(0);

        let input = format!(
            "Research topic: {}\n\nSummaries:\n{}",
            topic,
            summaries.join("\n\n---\n\n")
        );
        let answer = ask(ctx, prompts::REFLECTION_PROMPT, input).await?;
        let verdict: Verdict = parse_json_response(&answer)?;

        let update = StateUpdate::new().set(keys::RESEARCH_LOOP_COUNT, loops + 1);
        if verdict.is_sufficient {
            return Ok(update
                .set(keys::IS_SUFFICIENT, true)
                .set(keys::QUERIES, json!([]))
                .set(keys::KNOWLEDGE_GAP, ""));
        }
        Ok(update
            .set(keys::IS_SUFFICIENT, false)
            .set(keys::KNOWLEDGE_GAP, verdict.knowledge_gap)
            .set(keys::QUERIES, distinct_queries(verdict.follow_up_queries)))
    }
}
