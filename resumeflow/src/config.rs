//! Phase settings carried in the pass-through `config` channel.
//!
//! The caller sends `config` with every phase request; it rides along in the seed
//! untouched and nodes read the parsed [`PhaseConfig`] from their `RunContext`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::nodes::RetryPolicy;
use crate::state::{keys, WorkflowState};

/// Default cap on reflection passes in the research loop.
pub const DEFAULT_MAX_RESEARCH_LOOPS: u32 = 3;
/// Default pause before each category analysis, so per-task progress is observable.
pub const DEFAULT_ANALYSIS_DELAY_MS: u64 = 500;
/// Default retries after the first failed section rewrite.
pub const DEFAULT_MAX_RETRIES: u32 = 2;
/// Upper bound on rewrite retries, whatever the request asks for.
pub const MAX_RETRIES_CAP: u32 = 10;
/// Default first backoff between rewrite attempts; doubles per retry.
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1000;

/// Settings for one phase call. Credential fields are only read by whoever builds
/// the services (server, CLI); nodes read the tuning fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhaseConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    /// Sampling temperature for the model; provider default when absent.
    pub temperature: Option<f32>,
    pub search_api_key: Option<String>,
    pub search_url: Option<String>,
    pub max_research_loops: u32,
    pub analysis_delay_ms: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    /// Section keys never sent to the rewriter.
    pub exclude_sections: Vec<String>,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: None,
            temperature: None,
            search_api_key: None,
            search_url: None,
            max_research_loops: DEFAULT_MAX_RESEARCH_LOOPS,
            analysis_delay_ms: DEFAULT_ANALYSIS_DELAY_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            exclude_sections: Vec::new(),
        }
    }
}

impl PhaseConfig {
    /// Parses the `config` channel; absent or `null` yields defaults.
    pub fn from_state(state: &WorkflowState) -> Result<Self, AgentError> {
        Ok(state.decode(keys::CONFIG)?.unwrap_or_default())
    }

    /// Defaults with every delay set to zero (tests, offline runs).
    pub fn immediate() -> Self {
        Self {
            analysis_delay_ms: 0,
            retry_base_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }

    /// Rewrite retry budget; `max_retries` is capped at [`MAX_RETRIES_CAP`].
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries.min(MAX_RETRIES_CAP),
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }
}
