//! Optional overrides for a run (CLI args or programmatic).
//!
//! Used by [`RunConfig::apply_options`](super::RunConfig::apply_options). Only set
//! fields override the base config read from the environment.

#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Server base URL; when set, phases run remotely.
    pub server: Option<String>,
    /// Override model name.
    pub model: Option<String>,
    /// Override sampling temperature.
    pub temperature: Option<f32>,
    /// Override the cap on reflection passes.
    pub max_research_loops: Option<u32>,
    /// Section keys the rewriter must leave alone.
    pub exclude_sections: Vec<String>,
    /// Print every frame as it arrives.
    pub verbose: bool,
}
