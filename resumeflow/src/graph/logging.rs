//! Logging utilities for graph execution.
//!
//! Structured events for run start/end, node execution, state merges and failures.
//! Uses `tracing` with the `tracing` feature, stderr otherwise.

use crate::error::AgentError;

/// Log graph execution start.
pub fn log_graph_start(entry: &str) {
    #[cfg(feature = "tracing")]
    tracing::info!(entry = entry, "Starting graph execution");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[INFO] Starting graph execution at {}", entry);
}

/// Log node execution start.
pub fn log_node_start(node_id: &str) {
    #[cfg(feature = "tracing")]
    tracing::debug!(node_id = node_id, "Starting node execution");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[DEBUG] Starting node execution: {}", node_id);
}

/// Log the resolved successor of a node.
pub fn log_node_complete(node_id: &str, next: &str) {
    #[cfg(feature = "tracing")]
    tracing::debug!(node_id = node_id, next = next, "Node execution complete");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[DEBUG] Node execution complete: {} -> {}", node_id, next);
}

/// Log the channels a node's update touched.
pub fn log_state_update<'a>(node_id: &str, channels: impl Iterator<Item = &'a String>) {
    let channels: Vec<&str> = channels.map(String::as_str).collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(node_id = node_id, ?channels, "State updated");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[DEBUG] State updated after node {}: {:?}", node_id, channels);
}

/// Log a node failure captured into the `error` channel.
pub fn log_node_error(node_id: &str, error: &AgentError) {
    #[cfg(feature = "tracing")]
    tracing::warn!(node_id = node_id, %error, "Node failed");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[WARN] Node failed: {}: {}", node_id, error);
}

/// Log a run stopped by a halting node failure.
pub fn log_graph_halted(node_id: &str) {
    #[cfg(feature = "tracing")]
    tracing::warn!(node_id = node_id, "Graph execution halted after node failure");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[WARN] Graph execution halted after node failure: {}", node_id);
}

/// Log a run stopped because the frame consumer went away.
pub fn log_stream_closed(node_id: &str) {
    #[cfg(feature = "tracing")]
    tracing::info!(node_id = node_id, "Stream consumer closed; stopping run");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[INFO] Stream consumer closed after {}; stopping run", node_id);
}

/// Log graph execution completion.
pub fn log_graph_complete() {
    #[cfg(feature = "tracing")]
    tracing::info!("Graph execution complete");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[INFO] Graph execution complete");
}

/// Log graph execution error.
pub fn log_graph_error(error: &AgentError) {
    #[cfg(feature = "tracing")]
    tracing::error!(?error, "Graph execution error");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[ERROR] Graph execution error: {:?}", error);
}
