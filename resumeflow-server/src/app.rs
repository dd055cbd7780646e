//! Routes: `POST /api/optimize/:phase` streams one phase as `data: {json}\n\n` records;
//! `GET /health` answers liveness checks.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{Path, State},
    http::{header, HeaderValue, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use resumeflow::{encode_frame, AgentError, Phase, PhaseConfig, PhaseRunner, RunError, Services};
use serde::Serialize;
use serde_json::Value;
use tokio_stream::StreamExt;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info_span;

use crate::config::ServerConfig;

/// Max request body size to buffer for logging (bytes). Requests larger than this return 413.
const LOG_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Builds the clients one request runs against.
pub trait ServiceFactory: Send + Sync {
    fn build(&self, config: &PhaseConfig) -> Result<Services, AgentError>;
}

/// Real model and search clients from the merged request config.
pub struct LiveServices;

impl ServiceFactory for LiveServices {
    fn build(&self, config: &PhaseConfig) -> Result<Services, AgentError> {
        Services::from_config(config)
    }
}

/// Shared state for all routes.
pub struct AppState {
    pub runner: Arc<PhaseRunner>,
    pub config: ServerConfig,
    pub services: Arc<dyn ServiceFactory>,
}

impl AppState {
    pub fn new(runner: PhaseRunner, config: ServerConfig, services: Arc<dyn ServiceFactory>) -> Self {
        Self {
            runner: Arc::new(runner),
            config,
            services,
        }
    }
}

/// Full router with request logging, tracing spans and permissive CORS.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/optimize/:phase", post(optimize))
        .layer(middleware::from_fn(log_request_body))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                info_span!("request", method = %req.method(), uri = %req.uri())
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Middleware that buffers the body, logs method, URI and size at debug, then forwards the request.
async fn log_request_body(request: Request<Body>, next: Next) -> Result<Response, Response> {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, LOG_BODY_LIMIT)
        .await
        .map_err(|e| ServerError::PayloadTooLarge(e.to_string()).into_response())?;
    tracing::debug!(method = %parts.method, uri = %parts.uri, bytes = bytes.len(), "request");
    let request = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(request).await)
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    phases: Vec<&'static str>,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        phases: Phase::ALL.iter().map(|p| p.as_str()).collect(),
    })
}

/// Starts `phase` from the posted state and streams its frames.
///
/// Everything that fails after the stream starts travels in-band as an `error`
/// frame; only an unknown phase, a non-object body or a malformed `config` map to
/// HTTP errors.
async fn optimize(
    State(state): State<Arc<AppState>>,
    Path(phase): Path<String>,
    body: Bytes,
) -> Result<Response, ServerError> {
    let phase: Phase = phase
        .parse()
        .map_err(|_| ServerError::NotFound(format!("unknown phase: {}", phase)))?;
    let seed: Value = serde_json::from_slice(&body)
        .map_err(|e| ServerError::BadRequest(format!("body is not JSON: {}", e)))?;
    if !seed.is_object() {
        return Err(ServerError::BadRequest("body must be a JSON object".into()));
    }

    let request_config = match seed.get("config") {
        None | Some(Value::Null) => PhaseConfig::default(),
        Some(v) => serde_json::from_value(v.clone())
            .map_err(|e| ServerError::BadRequest(format!("invalid config: {}", e)))?,
    };
    let config = state.config.overlay(request_config);
    let services = state
        .services
        .build(&config)
        .map_err(|e| ServerError::Unavailable(e.to_string()))?;

    tracing::debug!(phase = %phase, model = ?config.model, "phase stream");
    let frames = state.runner.stream(phase, seed, services)?;
    let stream = frames.map(|frame| Ok::<_, Infallible>(Bytes::from(encode_frame(&frame))));

    let mut res = Response::new(Body::from_stream(stream));
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/event-stream"),
    );
    res.headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    Ok(res)
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Run(#[from] RunError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ServerError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ServerError::PayloadTooLarge(m) => (StatusCode::PAYLOAD_TOO_LARGE, m.clone()),
            ServerError::Unavailable(m) => (StatusCode::SERVICE_UNAVAILABLE, m.clone()),
            ServerError::Run(RunError::Compilation(e)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            // Seed and config problems surface from the runner before any node runs.
            ServerError::Run(e) => (StatusCode::BAD_REQUEST, e.to_string()),
        };
        (status, Json(serde_json::json!({ "error": { "message": msg } }))).into_response()
    }
}
