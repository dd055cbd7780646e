//! Phase runner: compiles the phase graphs once and runs them per request.
//!
//! Used by the server (one stream per HTTP request) and the CLI (in-process mode).
//! Each call builds a fresh [`WorkflowState`] from the caller's seed and a
//! [`RunContext`] from the given services plus the seed's `config`.

use serde_json::Value;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;

use crate::config::PhaseConfig;
use crate::error::AgentError;
use crate::graph::{CompilationError, CompiledStateGraph, RunContext};
use crate::nodes::PrepareAnalyzerNode;
use crate::services::Services;
use crate::state::WorkflowState;
use crate::stream::Frame;

use super::graphs::{build_analyze_graph, build_research_graph, build_rewrite_graph};
use super::Phase;

/// Error type for PhaseRunner invoke/stream operations.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("compilation failed: {0}")]
    Compilation(#[from] CompilationError),
    #[error("execution failed: {0}")]
    Execution(#[from] AgentError),
    #[error("unknown phase: {0}")]
    UnknownPhase(String),
    #[error("stream ended without final state")]
    StreamEndedWithoutState,
}

/// Holds the three compiled phase graphs; cheap to share behind `Arc`.
pub struct PhaseRunner {
    research: CompiledStateGraph,
    analyze: CompiledStateGraph,
    rewrite: CompiledStateGraph,
}

impl PhaseRunner {
    pub fn new() -> Result<Self, CompilationError> {
        Self::with_analyzer(PrepareAnalyzerNode::new())
    }

    /// Runner whose analyze phase announces the categories chosen by `prepare`.
    pub fn with_analyzer(prepare: PrepareAnalyzerNode) -> Result<Self, CompilationError> {
        Ok(Self {
            research: build_research_graph()?,
            analyze: build_analyze_graph(prepare)?,
            rewrite: build_rewrite_graph()?,
        })
    }

    pub fn graph(&self, phase: Phase) -> &CompiledStateGraph {
        match phase {
            Phase::Research => &self.research,
            Phase::Analyze => &self.analyze,
            Phase::Rewrite => &self.rewrite,
        }
    }

    fn prepare(seed: Value, services: Services) -> Result<(WorkflowState, RunContext), RunError> {
        let state = WorkflowState::from_value(seed)?;
        let config = PhaseConfig::from_state(&state)?;
        Ok((state, RunContext::new(services, config)))
    }

    /// Starts `phase` on a spawned task and returns its frames.
    ///
    /// Fails only when the seed is not an object or its `config` is malformed;
    /// everything after that is reported through `error` frames.
    pub fn stream(
        &self,
        phase: Phase,
        seed: Value,
        services: Services,
    ) -> Result<ReceiverStream<Frame>, RunError> {
        let (state, ctx) = Self::prepare(seed, services)?;
        Ok(self.graph(phase).stream(state, ctx))
    }

    /// Runs `phase` to completion and returns the final state.
    pub async fn invoke(
        &self,
        phase: Phase,
        seed: Value,
        services: Services,
    ) -> Result<WorkflowState, RunError> {
        let (state, ctx) = Self::prepare(seed, services)?;
        Ok(self.graph(phase).invoke(state, &ctx).await?)
    }

    /// Streams `phase`, handing every frame to `on_frame`, and returns the frames'
    /// accumulated state merged over the seed.
    pub async fn stream_with_callback<F>(
        &self,
        phase: Phase,
        seed: Value,
        services: Services,
        mut on_frame: F,
    ) -> Result<WorkflowState, RunError>
    where
        F: FnMut(&Frame),
    {
        let mut acc = crate::client::StateAccumulator::from_seed(seed.clone())?;
        let mut stream = self.stream(phase, seed, services)?;
        let mut frames = 0usize;
        while let Some(frame) = stream.next().await {
            on_frame(&frame);
            acc.merge(&frame);
            frames += 1;
        }
        if frames == 0 {
            return Err(RunError::StreamEndedWithoutState);
        }
        Ok(WorkflowState::from_value(acc.into_value())?)
    }
}
