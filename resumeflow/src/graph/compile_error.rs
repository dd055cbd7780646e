//! Graph compilation error.
//!
//! Returned by `StateGraph::compile` when edges reference unknown nodes or the
//! graph could stall at run time (a reachable node with nowhere to go).

use thiserror::Error;

/// Error when compiling a state graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompilationError {
    /// A node id in an edge was not registered via `add_node` (and is not START/END).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No edge has from_id == START, or more than one such edge.
    #[error("graph must have exactly one edge from START")]
    MissingStart,

    /// A node declares more than one outgoing edge.
    #[error("node {0} has more than one outgoing edge")]
    AmbiguousEdge(String),

    /// A conditional edge was declared with no label targets.
    #[error("conditional edge from {0} has an empty label map")]
    EmptyRouteMap(String),

    /// A non-terminal node reachable from START has no outgoing edge.
    #[error("node {0} is reachable from START but has no outgoing edge")]
    DanglingNode(String),

    /// No path from START reaches END.
    #[error("END is not reachable from START")]
    UnreachableEnd,
}
