//! resumeflow binary: reads a job description and a resume, runs the three phases,
//! and writes the optimized resume.

use std::path::PathBuf;

use clap::Parser;
use resumeflow_cli::{optimize, read_jd, read_resume, RunConfig, RunOptions};

#[derive(Parser, Debug)]
#[command(name = "resumeflow")]
#[command(about = "Optimize a resume for a job: research → analyze → rewrite")]
struct Args {
    /// Job description text file.
    #[arg(long, value_name = "FILE")]
    jd: PathBuf,

    /// Resume JSON file (`{"sections": {...}, ...}`).
    #[arg(long, value_name = "FILE")]
    resume: PathBuf,

    /// resumeflow-server base URL; runs in-process when omitted.
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Write the optimized resume here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Model name (overrides OPENAI_MODEL).
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature for the model.
    #[arg(long, value_name = "T")]
    temperature: Option<f32>,

    /// Cap on research reflection passes.
    #[arg(long, value_name = "N")]
    max_research_loops: Option<u32>,

    /// Section key the rewriter must leave alone (repeatable).
    #[arg(long = "exclude", value_name = "SECTION")]
    exclude_sections: Vec<String>,

    /// Print every frame as it arrives.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn options(&self) -> RunOptions {
        RunOptions {
            server: self.server.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_research_loops: self.max_research_loops,
            exclude_sections: self.exclude_sections.clone(),
            verbose: self.verbose,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();
    if let Err(e) = run(&args).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: &Args) -> Result<(), resumeflow_cli::Error> {
    let mut config = RunConfig::from_env();
    config.apply_options(&args.options());

    let jd = read_jd(&args.jd)?;
    let resume = read_resume(&args.resume)?;

    // Progress goes to stderr so stdout carries only the resume.
    let outcome = optimize(&config, jd, resume, &mut std::io::stderr()).await?;
    if let Some((phase, message)) = outcome.error() {
        return Err(format!("{} phase failed: {}", phase, message).into());
    }
    let optimized = outcome
        .optimized_resume()
        .ok_or("pipeline finished without an optimized resume")?;
    let text = serde_json::to_string_pretty(optimized)?;
    match &args.output {
        Some(path) => std::fs::write(path, text + "\n")?,
        None => println!("{}", text),
    }
    Ok(())
}
