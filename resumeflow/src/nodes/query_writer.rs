//! `query_writer`: research topic and first search queries.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AgentError;
use crate::graph::{Node, RunContext};
use crate::llm::parse_json_response;
use crate::resume::JdAnalysis;
use crate::state::{keys, StateUpdate, WorkflowState};

use super::{ask, names, prompts};

/// Most queries kept from one model answer.
pub const MAX_QUERIES: usize = 3;

/// Skills named in the research topic.
const TOPIC_SKILLS: usize = 5;

#[derive(Debug, Deserialize)]
struct QueryPlan {
    #[serde(default)]
    #[allow(dead_code)]
    rationale: String,
    #[serde(alias = "queries")]
    query: Vec<String>,
}

/// Deterministic research topic built from the JD analysis.
pub fn research_topic_for(analysis: &JdAnalysis) -> String {
    let skills: Vec<&str> = analysis
        .key_skills
        .iter()
        .take(TOPIC_SKILLS)
        .map(String::as_str)
        .collect();
    let mut topic = String::from("Hiring expectations for a role requiring ");
    if skills.is_empty() {
        topic.push_str("the listed qualifications");
    } else {
        topic.push_str(&skills.join(", "));
    }
    if !analysis.responsibilities.is_empty() {
        topic.push_str("; responsibilities: ");
        topic.push_str(&analysis.responsibilities.join("; "));
    }
    topic
}

/// Trimmed, non-empty, first-seen-order distinct queries, at most [`MAX_QUERIES`].
pub(crate) fn distinct_queries(raw: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for q in raw {
        let q = q.trim();
        if q.is_empty() || out.iter().any(|seen| seen == q) {
            continue;
        }
        out.push(q.to_string());
        if out.len() == MAX_QUERIES {
            break;
        }
    }
    out
}

/// Writes `research_topic` and up to three `queries`.
pub struct QueryWriterNode;

#[async_trait]
impl Node for QueryWriterNode {
    fn id(&self) -> &str {
        names::QUERY_WRITER
    }

    async fn run(&self, state: WorkflowState, ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        let analysis: JdAnalysis = state.require(keys::JD_ANALYSIS)?;
        let topic = research_topic_for(&analysis);
        let input = format!(
            "Research topic: {}\n\nJob analysis:\n{}",
            topic,
            serde_json::to_string_pretty(&analysis)
                .map_err(|e| AgentError::ExecutionFailed(e.to_string()))?
        );
        let answer = ask(ctx, prompts::QUERY_WRITER_PROMPT, input).await?;
        let plan: QueryPlan = parse_json_response(&answer)?;
        Ok(StateUpdate::new()
            .set(keys::RESEARCH_TOPIC, topic)
            .set(keys::QUERIES, distinct_queries(plan.query)))
    }
}
