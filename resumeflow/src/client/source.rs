use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde_json::Value;

use crate::phases::{Phase, PhaseRunner, RunError};
use crate::services::Services;
use crate::stream::Frame;

/// Frames of one phase call, in emission order.
pub type FrameStream = BoxStream<'static, Frame>;

/// Where phase frames come from: the in-process runner or a remote server.
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Starts `phase` from `seed`.
    async fn open(&self, phase: Phase, seed: Value) -> Result<FrameStream, RunError>;
}

/// Runs phases in-process on a shared [`PhaseRunner`].
#[derive(Clone)]
pub struct LocalSource {
    runner: Arc<PhaseRunner>,
    services: Services,
}

impl LocalSource {
    pub fn new(runner: Arc<PhaseRunner>, services: Services) -> Self {
        Self { runner, services }
    }
}

#[async_trait]
impl FrameSource for LocalSource {
    async fn open(&self, phase: Phase, seed: Value) -> Result<FrameStream, RunError> {
        let frames = self.runner.stream(phase, seed, self.services.clone())?;
        Ok(frames.boxed())
    }
}
