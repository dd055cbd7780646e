//! resumeflow-cli library: reusable run logic behind the `resumeflow` binary.
//!
//! Reads credentials from env / .env, runs research, analyze and rewrite either
//! in-process or against a resumeflow-server, and renders the progress log.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), resumeflow_cli::Error> {
//! use std::path::Path;
//! use resumeflow_cli::{optimize, read_jd, read_resume, RunConfig};
//!
//! let config = RunConfig::from_env();
//! let jd = read_jd(Path::new("jd.txt"))?;
//! let resume = read_resume(Path::new("resume.json"))?;
//! let outcome = optimize(&config, jd, resume, &mut std::io::stdout()).await?;
//! println!("{:?}", outcome.optimized_resume());
//! # Ok(())
//! # }
//! ```

mod config;
mod render;
mod run;

pub use config::{Error, RunConfig, RunOptions};
pub use render::{render_line, render_log};
pub use run::{
    decode_body, initial_seed, optimize, read_jd, read_resume, run_with_source, source_for,
    RemoteSource,
};

#[cfg(test)]
mod tests;
