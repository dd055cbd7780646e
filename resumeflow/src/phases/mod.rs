//! The three optimization phases and the runner that executes them.
//!
//! Each phase is its own compiled graph. Callers thread state between phases
//! themselves: the accumulated state of one phase seeds the next.

mod graphs;
mod runner;

use std::fmt;
use std::str::FromStr;

pub use graphs::{build_analyze_graph, build_research_graph, build_rewrite_graph};
pub use runner::{PhaseRunner, RunError};

/// One independently invokable stage of the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Research,
    Analyze,
    Rewrite,
}

impl Phase {
    /// Pipeline order.
    pub const ALL: [Phase; 3] = [Phase::Research, Phase::Analyze, Phase::Rewrite];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Research => "research",
            Phase::Analyze => "analyze",
            Phase::Rewrite => "rewrite",
        }
    }

    /// HTTP path serving this phase.
    pub fn endpoint(&self) -> String {
        format!("/api/optimize/{}", self.as_str())
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = RunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "research" => Ok(Phase::Research),
            "analyze" => Ok(Phase::Analyze),
            "rewrite" => Ok(Phase::Rewrite),
            other => Err(RunError::UnknownPhase(other.to_string())),
        }
    }
}
