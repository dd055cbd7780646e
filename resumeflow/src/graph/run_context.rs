//! Run context passed into nodes: external services and the phase config.

use crate::config::PhaseConfig;
use crate::services::Services;

/// Per-run context. Cloned into the spawned stream task; never shared mutably.
#[derive(Clone)]
pub struct RunContext {
    /// Generative and search clients the nodes call.
    pub services: Services,
    /// Phase settings parsed from the pass-through `config` channel.
    pub config: PhaseConfig,
}

impl RunContext {
    pub fn new(services: Services, config: PhaseConfig) -> Self {
        Self { services, config }
    }
}
