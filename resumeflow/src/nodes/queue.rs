//! Pop-one-task routing node shared by the analyze and rewrite loops.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;
use crate::graph::{Node, RunContext};
use crate::state::{StateUpdate, WorkflowState};

/// Pops the head of the `queue_key` array into `current_key`; an empty queue sets
/// `current_key` to `null`, which [`routes::while_current`](super::routes::while_current)
/// turns into the loop exit.
pub struct QueueRouterNode {
    id: &'static str,
    queue_key: &'static str,
    current_key: &'static str,
}

impl QueueRouterNode {
    pub fn new(id: &'static str, queue_key: &'static str, current_key: &'static str) -> Self {
        Self {
            id,
            queue_key,
            current_key,
        }
    }
}

#[async_trait]
impl Node for QueueRouterNode {
    fn id(&self) -> &str {
        self.id
    }

    async fn run(&self, state: WorkflowState, _ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        let mut queue: Vec<Value> = state.decode(self.queue_key)?.unwrap_or_default();
        let current = if queue.is_empty() {
            Value::Null
        } else {
            queue.remove(0)
        };
        Ok(StateUpdate::new()
            .set(self.queue_key, Value::Array(queue))
            .set(self.current_key, current))
    }
}
