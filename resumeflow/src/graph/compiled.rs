//! Compiled state graph: immutable, supports invoke and stream.
//!
//! Built by `StateGraph::compile`. Holds nodes, one resolved outgoing edge per node,
//! channel declarations and the entry node. Everything sits behind `Arc`, so clones
//! are cheap and independent runs share nothing mutable.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::AgentError;
use crate::state::{Channel, StateUpdate, WorkflowState};
use crate::stream::Frame;

use super::edge::Edge;
use super::logging;
use super::{ErrorPolicy, Node, RunContext, END};

/// Frames buffered between the run task and a slow consumer.
const STREAM_BUFFER: usize = 128;

/// Compiled graph: immutable structure, reusable across runs.
///
/// Created by `StateGraph::compile()`. Starts at the successor of START; after each
/// node, merges its update through channel reducers, emits a [`Frame`], and follows
/// the node's edge until END.
#[derive(Clone)]
pub struct CompiledStateGraph {
    pub(super) nodes: Arc<HashMap<String, Arc<dyn Node>>>,
    pub(super) edges: Arc<HashMap<String, Edge>>,
    pub(super) channels: Arc<HashMap<String, Channel>>,
    pub(super) entry: String,
}

impl CompiledStateGraph {
    /// Shared run loop used by invoke() and stream(): one node at a time until END,
    /// a halting node failure, or a closed consumer.
    async fn run_loop_inner(
        &self,
        state: &mut WorkflowState,
        ctx: &RunContext,
        tx: Option<&mpsc::Sender<Frame>>,
    ) -> Result<(), AgentError> {
        logging::log_graph_start(&self.entry);
        state.fill_defaults(&self.channels);
        let mut current_id = self.entry.clone();

        loop {
            let node = self.nodes.get(&current_id).cloned().ok_or_else(|| {
                AgentError::ExecutionFailed(format!("node not in compiled graph: {}", current_id))
            })?;

            logging::log_node_start(&current_id);
            let (update, failed) = match node.run(state.clone(), ctx).await {
                Ok(update) => (update, false),
                Err(e) => {
                    logging::log_node_error(&current_id, &e);
                    (StateUpdate::error(e.to_string()), true)
                }
            };

            let touched = state.apply(update, &self.channels);
            logging::log_state_update(&current_id, touched.keys());

            if let Some(tx) = tx {
                if tx.send(Frame::new(current_id.clone(), touched)).await.is_err() {
                    logging::log_stream_closed(&current_id);
                    return Ok(());
                }
            }

            if failed && node.error_policy() == ErrorPolicy::Halt {
                logging::log_graph_halted(&current_id);
                return Ok(());
            }

            let edge = self.edges.get(&current_id).ok_or_else(|| {
                AgentError::ExecutionFailed(format!("no outgoing edge for {}", current_id))
            })?;
            let next = edge.resolve(&current_id, state)?;
            logging::log_node_complete(&current_id, &next);

            if next == END {
                logging::log_graph_complete();
                return Ok(());
            }
            current_id = next;
        }
    }

    /// Runs the graph to completion and returns the final state.
    ///
    /// Node failures do not surface as `Err`: they land in the `error` channel of the
    /// returned state. `Err` means the engine itself could not proceed (routing).
    pub async fn invoke(
        &self,
        state: WorkflowState,
        ctx: &RunContext,
    ) -> Result<WorkflowState, AgentError> {
        let mut state = state;
        if let Err(e) = self.run_loop_inner(&mut state, ctx, None).await {
            logging::log_graph_error(&e);
            return Err(e);
        }
        Ok(state)
    }

    /// Streams graph execution: one [`Frame`] per node, in completion order.
    ///
    /// The run happens on a spawned task; dropping the returned stream stops the run
    /// at the next frame boundary.
    pub fn stream(&self, state: WorkflowState, ctx: RunContext) -> ReceiverStream<Frame> {
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let graph = self.clone();

        tokio::spawn(async move {
            let mut state = state;
            if let Err(e) = graph.run_loop_inner(&mut state, &ctx, Some(&tx)).await {
                logging::log_graph_error(&e);
            }
        });

        ReceiverStream::new(rx)
    }

    /// Node id the run starts at (the successor of START).
    pub fn entry(&self) -> &str {
        &self.entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::{json, Value};
    use tokio_stream::StreamExt;

    use crate::graph::{FnNode, StateGraph, START};
    use crate::state::Reducer;
    use crate::test_support::test_context;

    fn counter_value(state: &WorkflowState) -> i64 {
        state.get("n").and_then(Value::as_i64).unwrap_or(0)
    }

    /// Loop graph: `inc` adds one to `n` and appends to `log`; routes back while n < limit.
    fn build_loop_graph(limit: i64) -> crate::graph::CompiledStateGraph {
        let mut graph = StateGraph::new();
        graph
            .add_channel("n", Reducer::Replace, json!(0))
            .add_channel("log", Reducer::Append, json!([]))
            .add_node(
                "inc",
                Arc::new(FnNode::new("inc", |s: WorkflowState| async move {
                    let n = counter_value(&s) + 1;
                    Ok(StateUpdate::new().set("n", n).set("log", json!([n])))
                })),
            )
            .add_node(
                "done",
                Arc::new(FnNode::new("done", |_s| async {
                    Ok(StateUpdate::new().set("finished", true))
                })),
            )
            .add_edge(START, "inc")
            .add_conditional_edges(
                "inc",
                move |s| {
                    if counter_value(s) < limit {
                        "continue".to_string()
                    } else {
                        "end".to_string()
                    }
                },
                [("continue", "inc"), ("end", "done")],
            )
            .add_edge("done", END);
        graph.compile().expect("graph compiles")
    }

    /// **Scenario**: Loop-back edge runs the node until the router says end.
    #[tokio::test]
    async fn invoke_loops_until_router_ends() {
        let graph = build_loop_graph(3);
        let out = graph
            .invoke(WorkflowState::new(), &test_context())
            .await
            .unwrap();
        assert_eq!(counter_value(&out), 3);
        assert_eq!(out.get("log"), Some(&json!([1, 2, 3])));
        assert_eq!(out.get("finished"), Some(&json!(true)));
    }

    /// **Scenario**: stream emits one frame per node invocation, in order, with post-reducer values.
    #[tokio::test]
    async fn stream_emits_frames_in_order() {
        let graph = build_loop_graph(2);
        let frames: Vec<Frame> = graph
            .stream(WorkflowState::new(), test_context())
            .collect()
            .await;
        let ids: Vec<_> = frames.iter().map(|f| f.node_id.as_str()).collect();
        assert_eq!(ids, vec!["inc", "inc", "done"]);
        assert_eq!(frames[1].get("log"), Some(&json!([1, 2])));
    }

    /// **Scenario**: A compiled graph is reusable; runs do not leak state into each other.
    #[tokio::test]
    async fn compiled_graph_reuse_is_independent() {
        let graph = build_loop_graph(2);
        let a = graph.invoke(WorkflowState::new(), &test_context()).await.unwrap();
        let b = graph.invoke(WorkflowState::new(), &test_context()).await.unwrap();
        assert_eq!(a, b);
    }

    /// **Scenario**: A halting node failure becomes an error frame and ends the run.
    #[tokio::test]
    async fn halting_failure_emits_error_frame_and_stops() {
        let mut graph = StateGraph::new();
        graph
            .add_node(
                "boom",
                Arc::new(FnNode::new("boom", |_s| async {
                    Err::<StateUpdate, _>(AgentError::Validation("bad shape".into()))
                })),
            )
            .add_node(
                "after",
                Arc::new(FnNode::new("after", |_s| async { Ok(StateUpdate::new()) })),
            )
            .add_edge(START, "boom")
            .add_edge("boom", "after")
            .add_edge("after", END);
        let graph = graph.compile().unwrap();
        let frames: Vec<Frame> = graph
            .stream(WorkflowState::new(), test_context())
            .collect()
            .await;
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].node_id, "boom");
        assert!(frames[0].error().unwrap().contains("bad shape"));
    }

    /// **Scenario**: With ErrorPolicy::Continue the failure is recorded and routing proceeds.
    #[tokio::test]
    async fn continue_policy_keeps_routing() {
        let mut graph = StateGraph::new();
        graph
            .add_node(
                "soft",
                Arc::new(
                    FnNode::new("soft", |_s| async {
                        Err::<StateUpdate, _>(AgentError::Service("flaky".into()))
                    })
                    .with_error_policy(ErrorPolicy::Continue),
                ),
            )
            .add_node(
                "after",
                Arc::new(FnNode::new("after", |_s| async {
                    Ok(StateUpdate::new().set("after", true))
                })),
            )
            .add_edge(START, "soft")
            .add_edge("soft", "after")
            .add_edge("after", END);
        let graph = graph.compile().unwrap();
        let out = graph.invoke(WorkflowState::new(), &test_context()).await.unwrap();
        assert!(out.get_str("error").unwrap().contains("flaky"));
        assert_eq!(out.get("after"), Some(&json!(true)));
    }

    /// **Scenario**: Router returning an unmapped label fails invoke with a Routing error.
    #[tokio::test]
    async fn unknown_route_label_fails_invoke() {
        let mut graph = StateGraph::new();
        graph
            .add_node(
                "a",
                Arc::new(FnNode::new("a", |_s| async { Ok(StateUpdate::new()) })),
            )
            .add_edge(START, "a")
            .add_conditional_edges("a", |_s| "nowhere".to_string(), [("end", END)]);
        let graph = graph.compile().unwrap();
        let res = graph.invoke(WorkflowState::new(), &test_context()).await;
        assert!(matches!(res, Err(AgentError::Routing { .. })));
    }

    /// **Scenario**: Dropping the stream stops the run; the node is not invoked again.
    #[tokio::test]
    async fn dropped_stream_stops_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut graph = StateGraph::new();
        graph
            .add_node(
                "spin",
                Arc::new(FnNode::new("spin", move |_s| {
                    let seen = Arc::clone(&seen);
                    async move {
                        seen.fetch_add(1, Ordering::SeqCst);
                        Ok(StateUpdate::new())
                    }
                })),
            )
            .add_edge(START, "spin")
            .add_conditional_edges(
                "spin",
                |_s| "again".to_string(),
                [("again", "spin"), ("end", END)],
            );
        let graph = graph.compile().unwrap();
        let mut stream = graph.stream(WorkflowState::new(), test_context());
        let first = stream.next().await;
        assert!(first.is_some());
        drop(stream);
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let after_drop = calls.load(Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(calls.load(Ordering::SeqCst), after_drop);
    }
}
