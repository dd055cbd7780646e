//! # resumeflow
//!
//! A small state-graph engine and the resume optimization workflow built on it.
//! One JSON state map flows through nodes; each node returns only the channels it
//! touches, and channel reducers merge those updates.
//!
//! ## Design Principles
//!
//! - **Channels, not structs**: [`WorkflowState`] is a JSON object. Each channel has a
//!   [`Reducer`] (replace, append or merge) declared on the graph.
//! - **Explicit edges**: static edges or conditional edges with a router and a label
//!   map. Loops are a queue channel plus a loop-back edge.
//! - **Frames out**: every node invocation yields one [`Frame`] carrying the
//!   post-reducer values it touched, so callers rebuild state by key replacement.
//! - **Phases**: research, analyze and rewrite are separate graphs; callers thread
//!   state between them.
//!
//! ## Main Modules
//!
//! - [`graph`]: `StateGraph`, `CompiledStateGraph`, `Node`, edges and run logging.
//! - [`state`]: `WorkflowState`, `StateUpdate`, reducers and channel names.
//! - [`nodes`]: the research, analysis and rewrite nodes and their routers.
//! - [`phases`]: `Phase`, the phase graphs and `PhaseRunner`.
//! - [`wire`]: `data: {json}\n\n` framing and the incremental `FrameDecoder`.
//! - [`progress`]: the client-side progress tree reducer.
//! - [`client`]: `StateAccumulator`, `PhaseDriver` and `run_pipeline`.
//! - [`llm`] / [`search`]: service traits with mock and real implementations.
//!
//! ## Features
//!
//! - `openai` (default): `ChatOpenAI` over `async-openai`.
//! - `web-search` (default): `HttpSearchClient` over `reqwest`.
//! - `tracing` (default): run logging through `tracing`; stderr otherwise.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use resumeflow::{MockLlm, MockSearch, Phase, PhaseRunner, Services};
//! use serde_json::json;
//! use tokio_stream::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let runner = PhaseRunner::new()?;
//! let services = Services::new(Arc::new(MockLlm::with_response("{}")), Arc::new(MockSearch::echo()));
//! let seed = json!({"jd": "Senior Go engineer", "resume": {"sections": {}}});
//! let mut frames = runner.stream(Phase::Research, seed, services)?;
//! while let Some(frame) = frames.next().await {
//!     println!("{}", resumeflow::wire::encode_frame(&frame));
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod graph;
pub mod llm;
pub mod message;
pub mod nodes;
pub mod phases;
pub mod progress;
pub mod resume;
pub mod search;
pub mod services;
pub mod state;
pub mod stream;
pub mod wire;

pub use client::{run_pipeline, FrameSource, LocalSource, PhaseDriver, StateAccumulator};
pub use config::PhaseConfig;
pub use error::AgentError;
pub use graph::{CompilationError, CompiledStateGraph, ErrorPolicy, Node, RunContext, StateGraph, END, START};
pub use llm::{LlmClient, LlmResponse, MockLlm};
#[cfg(feature = "openai")]
pub use llm::ChatOpenAI;
pub use message::Message;
pub use phases::{Phase, PhaseRunner, RunError};
pub use progress::{ErrorDisplay, LogEntry, ProgressLog, StepStatus};
pub use resume::{JdAnalysis, Resume};
pub use search::{MockSearch, SearchClient, SearchHit, UnconfiguredSearch};
#[cfg(feature = "web-search")]
pub use search::HttpSearchClient;
pub use services::Services;
pub use state::{Reducer, StateUpdate, WorkflowState};
pub use stream::Frame;
pub use wire::{encode_frame, FrameDecoder, ProtocolError};
