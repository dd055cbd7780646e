use futures::{Stream, StreamExt};
use serde_json::Value;

use crate::error::AgentError;
use crate::phases::{Phase, RunError};
use crate::progress::{ErrorDisplay, ProgressLog};
use crate::state::keys;
use crate::stream::Frame;

use super::{FrameSource, StateAccumulator};

/// Result of one phase call as seen by the caller.
#[derive(Clone, Debug)]
pub struct PhaseOutcome {
    pub phase: Phase,
    /// Seed merged with every frame.
    pub state: Value,
    pub log: ProgressLog,
    /// First node failure reported by the phase.
    pub error: Option<String>,
    pub frames: usize,
}

/// Folds one phase's frames into a [`StateAccumulator`] and a [`ProgressLog`].
pub struct PhaseDriver {
    phase: Phase,
    acc: StateAccumulator,
    log: ProgressLog,
    error: Option<String>,
    frames: usize,
}

impl PhaseDriver {
    pub fn new(phase: Phase, seed: Value) -> Result<Self, AgentError> {
        Ok(Self {
            phase,
            acc: StateAccumulator::from_seed(seed)?,
            log: ProgressLog::new(phase),
            error: None,
            frames: 0,
        })
    }

    pub fn with_error_display(mut self, display: ErrorDisplay) -> Self {
        self.log = self.log.with_error_display(display);
        self
    }

    pub fn log(&self) -> &ProgressLog {
        &self.log
    }

    pub fn state(&self) -> &StateAccumulator {
        &self.acc
    }

    /// Merges one frame, then advances the log.
    pub fn feed(&mut self, frame: &Frame) {
        self.frames += 1;
        if self.error.is_none() {
            self.error = frame.error().map(str::to_string);
        }
        self.acc.merge(frame);
        self.log.apply(frame);
    }

    /// Consumes `frames` to the end, calling `on_frame` after each one is folded in.
    pub async fn drive<S, F>(mut self, frames: S, mut on_frame: F) -> PhaseOutcome
    where
        S: Stream<Item = Frame> + Unpin,
        F: FnMut(&Frame, &ProgressLog),
    {
        let mut frames = frames;
        while let Some(frame) = frames.next().await {
            self.feed(&frame);
            on_frame(&frame, &self.log);
        }
        self.finish()
    }

    pub fn finish(self) -> PhaseOutcome {
        PhaseOutcome {
            phase: self.phase,
            state: self.acc.into_value(),
            log: self.log,
            error: self.error,
            frames: self.frames,
        }
    }
}

/// Result of a Research → Analyze → Rewrite run.
#[derive(Clone, Debug)]
pub struct PipelineOutcome {
    /// One outcome per phase that ran, in order.
    pub phases: Vec<PhaseOutcome>,
}

impl PipelineOutcome {
    /// State after the last phase that ran.
    pub fn final_state(&self) -> Option<&Value> {
        self.phases.last().map(|p| &p.state)
    }

    /// The failure that stopped the pipeline, if any.
    pub fn error(&self) -> Option<(Phase, &str)> {
        self.phases
            .iter()
            .find_map(|p| p.error.as_deref().map(|e| (p.phase, e)))
    }

    pub fn optimized_resume(&self) -> Option<&Value> {
        self.final_state()?
            .get(keys::OPTIMIZED_RESUME)
            .filter(|v| !v.is_null())
    }
}

/// Runs all three phases in order, seeding each with the previous phase's
/// accumulated state. Stops after the first phase that reports an `error`.
///
/// `on_frame` sees every frame with its phase and the updated log.
pub async fn run_pipeline<F>(
    source: &dyn FrameSource,
    seed: Value,
    mut on_frame: F,
) -> Result<PipelineOutcome, RunError>
where
    F: FnMut(Phase, &Frame, &ProgressLog),
{
    let mut seed = seed;
    let mut phases = Vec::with_capacity(Phase::ALL.len());
    for phase in Phase::ALL {
        let driver = PhaseDriver::new(phase, seed.clone())?;
        let frames = source.open(phase, seed).await?;
        let outcome = driver
            .drive(frames, |frame, log| on_frame(phase, frame, log))
            .await;
        if outcome.frames == 0 {
            return Err(RunError::StreamEndedWithoutState);
        }
        let failed = outcome.error.is_some();
        seed = outcome.state.clone();
        phases.push(outcome);
        if failed {
            break;
        }
    }
    Ok(PipelineOutcome { phases })
}
