//! Research-phase setup nodes: `preparer` and `prepare_research`.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::AgentError;
use crate::graph::{Node, RunContext};
use crate::resume::{JdAnalysis, Resume};
use crate::state::{keys, StateUpdate, WorkflowState};

use super::names;

/// Checks the seed (non-empty `jd`, decodable `resume`) and renders `resumeText`.
pub struct PreparerNode;

#[async_trait]
impl Node for PreparerNode {
    fn id(&self) -> &str {
        names::PREPARER
    }

    async fn run(&self, state: WorkflowState, _ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        let jd = state.get_str(keys::JD).map(str::trim).unwrap_or_default();
        if jd.is_empty() {
            return Err(AgentError::ExecutionFailed(
                "jd must be a non-empty string".into(),
            ));
        }
        let resume: Resume = state.require(keys::RESUME)?;
        Ok(StateUpdate::new().set(keys::RESUME_TEXT, resume.render_text()))
    }
}

/// Resets the research-loop channels before the first query is written.
pub struct PrepareResearchNode;

#[async_trait]
impl Node for PrepareResearchNode {
    fn id(&self) -> &str {
        names::PREPARE_RESEARCH
    }

    async fn run(&self, state: WorkflowState, _ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        let _: JdAnalysis = state.require(keys::JD_ANALYSIS)?;
        Ok(StateUpdate::new()
            .set(keys::RESEARCH_LOOP_COUNT, 0)
            .set(keys::IS_SUFFICIENT, false)
            .set(keys::SUMMARIES, Value::Null)
            .set(keys::QUERIES, json!([]))
            .set(keys::KNOWLEDGE_GAP, ""))
    }
}
