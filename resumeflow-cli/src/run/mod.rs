//! Run entry points: pick a frame source, thread state through the three phases,
//! and report progress as frames arrive.

mod inputs;
mod remote;

use std::io::{self, Write};
use std::sync::Arc;

use resumeflow::client::PipelineOutcome;
use resumeflow::{run_pipeline, FrameSource, LocalSource, PhaseRunner, Services};
use serde_json::Value;

use crate::config::{Error, RunConfig};
use crate::render::{render_line, render_log};

pub use inputs::{initial_seed, read_jd, read_resume};
pub use remote::{decode_body, RemoteSource};

/// Source for `config`: the server when one is configured, in-process otherwise.
pub fn source_for(config: &RunConfig) -> Result<Box<dyn FrameSource>, Error> {
    config.check()?;
    if let Some(server) = &config.server {
        return Ok(Box::new(RemoteSource::new(server.clone())));
    }
    let runner = Arc::new(PhaseRunner::new()?);
    let services = Services::from_config(&config.to_phase_config())?;
    Ok(Box::new(LocalSource::new(runner, services)))
}

/// Runs research, analyze and rewrite for `jd` and `resume`, printing progress to `out`.
pub async fn optimize(
    config: &RunConfig,
    jd: String,
    resume: Value,
    out: &mut dyn Write,
) -> Result<PipelineOutcome, Error> {
    let source = source_for(config)?;
    let seed = initial_seed(jd, resume, config)?;
    run_with_source(source.as_ref(), seed, config.verbose, out).await
}

/// Drives the pipeline on `source`. Each finished top-level step prints one line;
/// each phase ends with its full progress tree.
///
/// Writing stops at the first I/O error on `out`; the pipeline still runs to the
/// end and the error is returned after it.
pub async fn run_with_source(
    source: &dyn FrameSource,
    seed: Value,
    verbose: bool,
    out: &mut dyn Write,
) -> Result<PipelineOutcome, Error> {
    let mut write_error: Option<io::Error> = None;
    let outcome = run_pipeline(source, seed, |phase, frame, log| {
        if write_error.is_some() {
            return;
        }
        let mut line = String::new();
        if verbose {
            let keys: Vec<&str> = frame.partial_state.keys().map(String::as_str).collect();
            line.push_str(&format!("[frame] {} {} {:?}\n", phase, frame.node_id, keys));
        }
        if let Some(entry) = log.find(&frame.node_id) {
            line.push_str(&format!("{} {}\n", phase, render_line(entry)));
        }
        if line.is_empty() {
            return;
        }
        if let Err(e) = out.write_all(line.as_bytes()) {
            write_error = Some(e);
        }
    })
    .await?;
    if let Some(e) = write_error {
        return Err(format!("cannot write progress: {}", e).into());
    }

    for phase in &outcome.phases {
        write!(out, "\n{}", render_log(&phase.log))?;
    }
    out.flush()?;
    Ok(outcome)
}
