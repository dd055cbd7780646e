//! resumeflow-server binary: environment config, tracing, then serve.
//!
//! Configure via env: LISTEN, OPENAI_API_KEY, OPENAI_BASE_URL (or OPENAI_API_BASE),
//! OPENAI_MODEL, SEARCH_API_KEY, SEARCH_URL, LOG_FILE. Load .env with dotenv.

use std::sync::Arc;

use resumeflow::PhaseRunner;
use resumeflow_server::logging::{init_tracing, load_dotenv};
use resumeflow_server::{router, AppState, LiveServices, ServerConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    load_dotenv();

    if std::env::var("LOG_FILE").is_err() {
        eprintln!("resumeflow-server: LOG_FILE not set, logs only to stdout. Set LOG_FILE=./resumeflow-server.log in .env or env to also write to a file.");
    }

    init_tracing()?;

    let config = ServerConfig::from_env();
    if config.api_key.is_none() {
        warn!("OPENAI_API_KEY not set; requests must carry config.apiKey");
    }
    if config.search_api_key.is_none() {
        warn!("SEARCH_API_KEY not set; research requests must carry config.searchApiKey");
    }
    info!(
        model = ?config.model,
        base_url = ?config.base_url,
        search_url = ?config.search_url,
        "service defaults loaded"
    );

    let runner = PhaseRunner::new()?;
    let listen = config.listen.clone();
    let state = Arc::new(AppState::new(runner, config, Arc::new(LiveServices)));
    let app = router(state);

    info!("listening on http://{}", listen);
    let listener = tokio::net::TcpListener::bind(&listen).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
