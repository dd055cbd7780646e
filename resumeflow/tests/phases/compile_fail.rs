//! Graph validation through the public builder.

use std::sync::Arc;

use resumeflow::graph::FnNode;
use resumeflow::{CompilationError, Node, StateGraph, StateUpdate, END, START};

fn noop(id: &str) -> Arc<dyn Node> {
    Arc::new(FnNode::new(id, |_s| async { Ok(StateUpdate::new()) }))
}

#[test]
fn compile_fails_when_reachable_node_has_no_outgoing_edge() {
    let mut graph = StateGraph::new();
    graph
        .add_node("a", noop("a"))
        .add_node("b", noop("b"))
        .add_edge(START, "a")
        .add_conditional_edges("a", |_s| "next".to_string(), [("next", "b"), ("end", END)]);

    match graph.compile() {
        Err(CompilationError::DanglingNode(id)) => assert_eq!(id, "b"),
        other => panic!("expected DanglingNode, got {:?}", other.err()),
    }
}

#[test]
fn compile_fails_when_end_is_unreachable() {
    let mut graph = StateGraph::new();
    graph
        .add_node("a", noop("a"))
        .add_node("b", noop("b"))
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", "a");
    assert_eq!(graph.compile().err(), Some(CompilationError::UnreachableEnd));
}

#[test]
fn compile_fails_on_static_and_conditional_edge_from_one_node() {
    let mut graph = StateGraph::new();
    graph
        .add_node("a", noop("a"))
        .add_edge(START, "a")
        .add_edge("a", END)
        .add_conditional_edges("a", |_s| "end".to_string(), [("end", END)]);
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::AmbiguousEdge("a".into()))
    );
}

#[test]
fn compile_fails_on_empty_route_map() {
    let mut graph = StateGraph::new();
    graph
        .add_node("a", noop("a"))
        .add_edge(START, "a")
        .add_conditional_edges("a", |_s| "end".to_string(), Vec::<(&str, &str)>::new());
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::EmptyRouteMap("a".into()))
    );
}
