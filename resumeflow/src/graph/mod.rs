//! State graph: nodes, channels, static and conditional edges; compile and run.
//!
//! Build with [`StateGraph`], validate with [`StateGraph::compile`], then run the
//! immutable [`CompiledStateGraph`] with `invoke` or `stream` as many times as needed.

mod compile_error;
mod compiled;
mod edge;
mod fn_node;
pub mod logging;
mod node;
mod run_context;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::CompiledStateGraph;
pub use edge::{Edge, RouteFn};
pub use fn_node::FnNode;
pub use node::{ErrorPolicy, Node};
pub use run_context::RunContext;
pub use state_graph::{StateGraph, END, START};
