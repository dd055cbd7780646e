//! `jd_analyzer`: structured extraction of the job description.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Node, RunContext};
use crate::llm::parse_json_response;
use crate::resume::JdAnalysis;
use crate::state::{keys, StateUpdate, WorkflowState};

use super::{ask, names, prompts};

/// Extracts `{keySkills, responsibilities, qualifications}` from `jd`.
///
/// An answer that does not match the shape fails the node with
/// `AgentError::Validation`; the phase halts on it.
pub struct JdAnalyzerNode;

#[async_trait]
impl Node for JdAnalyzerNode {
    fn id(&self) -> &str {
        names::JD_ANALYZER
    }

    async fn run(&self, state: WorkflowState, ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        let jd: String = state.require(keys::JD)?;
        let answer = ask(ctx, prompts::JD_ANALYSIS_PROMPT, format!("Job description:\n{}", jd)).await?;
        let analysis: JdAnalysis = parse_json_response(&answer)?;
        StateUpdate::new().set_serialized(keys::JD_ANALYSIS, &analysis)
    }
}
