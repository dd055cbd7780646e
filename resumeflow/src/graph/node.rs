//! Graph node trait: one step in a StateGraph.
//!
//! Receives a snapshot of the full state and returns only the channels it touches.
//! Routing is not the node's concern; edges decide where control goes next.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::state::{StateUpdate, WorkflowState};

use super::RunContext;

/// What the engine does after a node returns `Err`.
///
/// In both cases the error is written to the `error` channel and emitted as that
/// node's frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop the run after emitting the error frame.
    #[default]
    Halt,
    /// Keep routing as if the node had succeeded.
    Continue,
}

/// One step in a graph: state snapshot in, partial update out.
///
/// **Interaction**: Registered with `StateGraph::add_node`; invoked by
/// `CompiledStateGraph` with the current state and the run's [`RunContext`].
#[async_trait]
pub trait Node: Send + Sync {
    /// Node id (e.g. `"jd_analyzer"`). Used in logs; frames carry the registered name.
    fn id(&self) -> &str;

    /// One step: read the snapshot, return the channels to merge.
    async fn run(&self, state: WorkflowState, ctx: &RunContext) -> Result<StateUpdate, AgentError>;

    /// Whether a failure of this node ends the run. Defaults to [`ErrorPolicy::Halt`].
    fn error_policy(&self) -> ErrorPolicy {
        ErrorPolicy::Halt
    }
}
