//! Caller side of the phase protocol.
//!
//! A caller keeps one [`StateAccumulator`] per phase, replaces keys in it from every
//! frame, feeds the frame to the [`ProgressLog`](crate::progress::ProgressLog), and
//! seeds the next phase with the result. [`run_pipeline`] does this for all three
//! phases over any [`FrameSource`].

mod accumulator;
mod driver;
mod source;

pub use accumulator::StateAccumulator;
pub use driver::{run_pipeline, PhaseDriver, PhaseOutcome, PipelineOutcome};
pub use source::{FrameSource, FrameStream, LocalSource};
