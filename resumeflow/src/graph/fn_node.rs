//! Closure-backed node, for small glue steps and tests.

use std::future::Future;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::state::{StateUpdate, WorkflowState};

use super::{ErrorPolicy, Node, RunContext};

/// Node wrapping an async closure `state -> Result<StateUpdate, AgentError>`.
///
/// ```rust,no_run
/// use resumeflow::graph::FnNode;
/// use resumeflow::state::StateUpdate;
///
/// let node = FnNode::new("touch", |_state| async { Ok(StateUpdate::new().set("done", true)) });
/// ```
pub struct FnNode<F> {
    id: String,
    f: F,
    policy: ErrorPolicy,
}

impl<F, Fut> FnNode<F>
where
    F: Fn(WorkflowState) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<StateUpdate, AgentError>> + Send + 'static,
{
    pub fn new(id: impl Into<String>, f: F) -> Self {
        Self {
            id: id.into(),
            f,
            policy: ErrorPolicy::Halt,
        }
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[async_trait]
impl<F, Fut> Node for FnNode<F>
where
    F: Fn(WorkflowState) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<StateUpdate, AgentError>> + Send + 'static,
{
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, state: WorkflowState, _ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        (self.f)(state).await
    }

    fn error_policy(&self) -> ErrorPolicy {
        self.policy
    }
}
