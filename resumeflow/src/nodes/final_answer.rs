//! `final_answer`: long-form research synthesis.

use async_trait::async_trait;
use serde_json::json;

use crate::error::AgentError;
use crate::graph::{Node, RunContext};
use crate::state::{keys, StateUpdate, WorkflowState};

use super::{ask, names, prompts};

/// Writes the synthesis into `analysisReport.webSearchResults` (merged, so later
/// phases can add to the same report).
pub struct FinalAnswerNode;

#[async_trait]
impl Node for FinalAnswerNode {
    fn id(&self) -> &str {
        names::FINAL_ANSWER
    }

    async fn run(&self, state: WorkflowState, ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        let topic = state.get_str(keys::RESEARCH_TOPIC).unwrap_or_default();
        let summaries: Vec<String> = state.decode(keys::SUMMARIES)?.unwrap_or_default();
        let input = format!(
            "Research topic: {}\n\nSummaries:\n{}",
            topic,
            summaries.join("\n\n---\n\n")
        );
        let answer = ask(ctx, prompts::FINAL_ANSWER_PROMPT, input).await?;
        Ok(StateUpdate::new().set(
            keys::ANALYSIS_REPORT,
            json!({ "webSearchResults": answer.trim() }),
        ))
    }
}
