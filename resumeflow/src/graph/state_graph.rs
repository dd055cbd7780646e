//! State graph: nodes + channels + explicit edges (static or conditional).
//!
//! Add nodes with `add_node`, declare merge rules with `add_channel`, wire the graph
//! with `add_edge(from, to)` / `add_conditional_edges(from, router, targets)` using
//! `START` and `END` for entry and exit, then `compile` to get a `CompiledStateGraph`.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::graph::compile_error::CompilationError;
use crate::graph::compiled::CompiledStateGraph;
use crate::graph::edge::Edge;
use crate::graph::node::Node;
use crate::state::{Channel, Reducer, WorkflowState};

/// Sentinel for graph entry: use as `from_id` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as a target in `add_edge(last_node_id, END)`.
pub const END: &str = "__end__";

/// State graph builder.
///
/// **Interaction**: Accepts `Arc<dyn Node>`; produces [`CompiledStateGraph`].
#[derive(Default)]
pub struct StateGraph {
    nodes: HashMap<String, Arc<dyn Node>>,
    channels: HashMap<String, Channel>,
    /// Edges in declaration order; validation rejects more than one per source.
    edges: Vec<(String, Edge)>,
}

impl StateGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node; replaces if the same id was registered before.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Declares a channel's reducer and the value fresh runs start with.
    /// Undeclared channels behave as `Replace` starting from absent.
    pub fn add_channel(
        &mut self,
        name: impl Into<String>,
        reducer: Reducer,
        default: serde_json::Value,
    ) -> &mut Self {
        self.channels
            .insert(name.into(), Channel::new(reducer, default));
        self
    }

    /// Adds a static edge from `from_id` to `to_id` (`START` / `END` allowed).
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        self.edges
            .push((from_id.into(), Edge::Static(to_id.into())));
        self
    }

    /// Adds a conditional edge: after `from_id` runs, `router(&state)` picks a label
    /// and control goes to `targets[label]`.
    pub fn add_conditional_edges<F, I, L, T>(
        &mut self,
        from_id: impl Into<String>,
        router: F,
        targets: I,
    ) -> &mut Self
    where
        F: Fn(&WorkflowState) -> String + Send + Sync + 'static,
        I: IntoIterator<Item = (L, T)>,
        L: Into<String>,
        T: Into<String>,
    {
        let targets = targets
            .into_iter()
            .map(|(l, t)| (l.into(), t.into()))
            .collect();
        self.edges.push((
            from_id.into(),
            Edge::Conditional {
                router: Arc::new(router),
                targets,
            },
        ));
        self
    }

    /// Validates the graph and freezes it.
    ///
    /// Rejects unknown node ids, a missing or duplicated START edge, nodes with more
    /// than one outgoing edge, empty route maps, reachable nodes with no outgoing
    /// edge, and graphs where END cannot be reached.
    pub fn compile(self) -> Result<CompiledStateGraph, CompilationError> {
        let mut outgoing: HashMap<String, Edge> = HashMap::new();
        let mut entry: Option<String> = None;

        for (from, edge) in &self.edges {
            if from != START && !self.nodes.contains_key(from) {
                return Err(CompilationError::NodeNotFound(from.clone()));
            }
            for to in edge.targets() {
                if to != END && !self.nodes.contains_key(to) {
                    return Err(CompilationError::NodeNotFound(to.to_string()));
                }
            }
            if let Edge::Conditional { targets, .. } = edge {
                if targets.is_empty() {
                    return Err(CompilationError::EmptyRouteMap(from.clone()));
                }
            }
            if from == START {
                match (edge, &entry) {
                    (Edge::Static(to), None) if to != END => entry = Some(to.clone()),
                    _ => return Err(CompilationError::MissingStart),
                }
                continue;
            }
            if outgoing.insert(from.clone(), edge.clone()).is_some() {
                return Err(CompilationError::AmbiguousEdge(from.clone()));
            }
        }

        let entry = entry.ok_or(CompilationError::MissingStart)?;

        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([entry.clone()]);
        let mut end_reachable = false;
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id.clone()) {
                continue;
            }
            let edge = outgoing
                .get(&id)
                .ok_or_else(|| CompilationError::DanglingNode(id.clone()))?;
            for to in edge.targets() {
                if to == END {
                    end_reachable = true;
                } else if !seen.contains(to) {
                    queue.push_back(to.to_string());
                }
            }
        }
        if !end_reachable {
            return Err(CompilationError::UnreachableEnd);
        }

        Ok(CompiledStateGraph {
            nodes: Arc::new(self.nodes),
            edges: Arc::new(outgoing),
            channels: Arc::new(self.channels),
            entry,
        })
    }
}
