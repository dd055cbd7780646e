//! Run config: model credentials, search credentials, server URL and phase tuning.
//! Filled from env / .env, then adjusted by [`RunOptions`](super::RunOptions).

use resumeflow::PhaseConfig;

use super::RunOptions;

/// Error type used for config loading and runs.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunConfig {
    /// OpenAI API key. Required for in-process runs only.
    pub api_key: Option<String>,
    /// OpenAI-compatible base URL, e.g. `https://api.openai.com/v1`.
    pub api_base: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub search_api_key: Option<String>,
    pub search_url: Option<String>,
    /// Base URL of a resumeflow-server; `None` runs the phases in-process.
    pub server: Option<String>,
    pub max_research_loops: Option<u32>,
    pub exclude_sections: Vec<String>,
    pub verbose: bool,
}

impl RunConfig {
    /// Fill config from env vars. Call `dotenv::dotenv().ok()` first to pick up `.env`.
    ///
    /// Reads `OPENAI_API_KEY`, `OPENAI_API_BASE`, `OPENAI_MODEL`, `SEARCH_API_KEY`,
    /// `SEARCH_URL` and `RESUMEFLOW_SERVER`. All optional here; [`check`](Self::check)
    /// decides what a run needs.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            api_key: var("OPENAI_API_KEY"),
            api_base: var("OPENAI_API_BASE").or_else(|| var("OPENAI_BASE_URL")),
            model: var("OPENAI_MODEL"),
            temperature: None,
            search_api_key: var("SEARCH_API_KEY"),
            search_url: var("SEARCH_URL"),
            server: var("RESUMEFLOW_SERVER"),
            max_research_loops: None,
            exclude_sections: Vec::new(),
            verbose: false,
        }
    }

    /// Apply optional overrides from `RunOptions` to this config.
    pub fn apply_options(&mut self, options: &RunOptions) {
        if let Some(server) = &options.server {
            self.server = Some(server.clone());
        }
        if let Some(model) = &options.model {
            self.model = Some(model.clone());
        }
        if options.temperature.is_some() {
            self.temperature = options.temperature;
        }
        if options.max_research_loops.is_some() {
            self.max_research_loops = options.max_research_loops;
        }
        for key in &options.exclude_sections {
            if !self.exclude_sections.contains(key) {
                self.exclude_sections.push(key.clone());
            }
        }
        self.verbose = options.verbose;
    }

    /// Fails when an in-process run has no model key. Remote runs rely on the server's.
    pub fn check(&self) -> Result<(), Error> {
        if self.server.is_none() && self.api_key.is_none() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "OPENAI_API_KEY is not set; configure it in .env or pass --server",
            )
            .into());
        }
        Ok(())
    }

    /// The `config` object sent with every phase request.
    ///
    /// Remote runs leave credentials out so the server's own apply.
    pub fn to_phase_config(&self) -> PhaseConfig {
        let mut config = PhaseConfig {
            exclude_sections: self.exclude_sections.clone(),
            ..PhaseConfig::default()
        };
        if let Some(loops) = self.max_research_loops {
            config.max_research_loops = loops;
        }
        config.model = self.model.clone();
        config.temperature = self.temperature;
        if self.server.is_none() {
            config.api_key = self.api_key.clone();
            config.base_url = self.api_base.clone();
            config.search_api_key = self.search_api_key.clone();
            config.search_url = self.search_url.clone();
        }
        config
    }
}
