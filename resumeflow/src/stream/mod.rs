//! Execution frames emitted while running a graph.
//!
//! One [`Frame`] per node invocation, in completion order. Produced by
//! `CompiledStateGraph::stream`, encoded by [`crate::wire`], consumed by
//! [`crate::client::StateAccumulator`] and [`crate::progress`].

use serde_json::{Map, Value};

use crate::state::keys;

/// One node's output after reducers ran: `{ nodeId: partialState }`.
///
/// `partial_state` holds the post-reducer value of every channel the node touched,
/// so replacing those keys in a caller-held map reproduces the engine's state.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub node_id: String,
    pub partial_state: Map<String, Value>,
}

impl Frame {
    pub fn new(node_id: impl Into<String>, partial_state: Map<String, Value>) -> Self {
        Self {
            node_id: node_id.into(),
            partial_state,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.partial_state.get(key)
    }

    /// Error text when the node failed (the `error` channel is a non-empty string).
    pub fn error(&self) -> Option<&str> {
        self.get(keys::ERROR)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Wire shape: a single-key object `{ node_id: partial_state }`.
    pub fn to_value(&self) -> Value {
        let mut outer = Map::new();
        outer.insert(
            self.node_id.clone(),
            Value::Object(self.partial_state.clone()),
        );
        Value::Object(outer)
    }
}
