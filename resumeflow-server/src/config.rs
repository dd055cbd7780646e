//! Server settings read from the environment.
//!
//! Credentials here are defaults: a request's `config` object wins field by field.

use resumeflow::PhaseConfig;

/// Address used when `LISTEN` is unset.
pub const DEFAULT_LISTEN: &str = "0.0.0.0:8123";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ServerConfig {
    pub listen: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub search_api_key: Option<String>,
    pub search_url: Option<String>,
}

impl ServerConfig {
    /// Reads `LISTEN`, `OPENAI_API_KEY`, `OPENAI_BASE_URL` (or `OPENAI_API_BASE`),
    /// `OPENAI_MODEL`, `SEARCH_API_KEY` and `SEARCH_URL`. Empty values count as unset.
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
            listen: var("LISTEN").unwrap_or_else(|| DEFAULT_LISTEN.to_string()),
            api_key: var("OPENAI_API_KEY"),
            base_url: var("OPENAI_BASE_URL").or_else(|| var("OPENAI_API_BASE")),
            model: var("OPENAI_MODEL"),
            search_api_key: var("SEARCH_API_KEY"),
            search_url: var("SEARCH_URL"),
        }
    }

    /// Fills the credential fields `request` leaves unset from these defaults.
    pub fn overlay(&self, mut request: PhaseConfig) -> PhaseConfig {
        fn fill(slot: &mut Option<String>, default: &Option<String>) {
            if slot.as_deref().map_or(true, str::is_empty) {
                slot.clone_from(default);
            }
        }
        fill(&mut request.api_key, &self.api_key);
        fill(&mut request.base_url, &self.base_url);
        fill(&mut request.model, &self.model);
        fill(&mut request.search_api_key, &self.search_api_key);
        fill(&mut request.search_url, &self.search_url);
        request
    }
}
