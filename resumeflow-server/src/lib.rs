//! HTTP front end for the resume optimization phases.
//!
//! Each phase is one `POST /api/optimize/{research,analyze,rewrite}` carrying the
//! full workflow state as a JSON object; the response is a chunked
//! `text/event-stream` of `data: {json}\n\n` records, one per node invocation.
//! The server keeps no state between requests.

pub mod app;
pub mod config;
pub mod logging;

pub use app::{router, AppState, LiveServices, ServerError, ServiceFactory};
pub use config::ServerConfig;
