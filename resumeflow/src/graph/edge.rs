//! Outgoing edge of a node: fixed target or routing function over the state.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::AgentError;
use crate::state::WorkflowState;

/// Routing function: reads the updated state, returns a label from the edge's map.
pub type RouteFn = Arc<dyn Fn(&WorkflowState) -> String + Send + Sync>;

/// One outgoing edge. A node has at most one.
#[derive(Clone)]
pub enum Edge {
    /// Always go to this node (or `END`).
    Static(String),
    /// Call `router` on the updated state and go to `targets[label]`.
    Conditional {
        router: RouteFn,
        targets: HashMap<String, String>,
    },
}

impl Edge {
    /// Every node id this edge can lead to.
    pub fn targets(&self) -> Vec<&str> {
        match self {
            Edge::Static(to) => vec![to.as_str()],
            Edge::Conditional { targets, .. } => targets.values().map(String::as_str).collect(),
        }
    }

    /// Resolves the next node id for `from` against the updated state.
    pub fn resolve(&self, from: &str, state: &WorkflowState) -> Result<String, AgentError> {
        match self {
            Edge::Static(to) => Ok(to.clone()),
            Edge::Conditional { router, targets } => {
                let label = router(state);
                targets.get(&label).cloned().ok_or_else(|| AgentError::Routing {
                    node: from.to_string(),
                    label,
                })
            }
        }
    }
}

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Static(to) => f.debug_tuple("Static").field(to).finish(),
            Edge::Conditional { targets, .. } => f
                .debug_struct("Conditional")
                .field("targets", targets)
                .finish_non_exhaustive(),
        }
    }
}
