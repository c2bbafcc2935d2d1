//! API Module
//!
//! HTTP layer for the importer: the two import endpoints, a health check and
//! the static UI.

pub mod error;
pub mod health;
pub mod import;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use logdrop_client::LogSink;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::Config;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub sink: Arc<dyn LogSink>,
    /// Request body cap, echoed in 413 responses
    pub upload_limit: Option<usize>,
}

impl AppState {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            upload_limit: None,
        }
    }
}

/// Create the main router with all endpoints
///
/// Request bodies are unbounded unless `max_upload_bytes` is set.
pub fn create_router(mut state: AppState, config: &Config) -> Router {
    let index_path = config.static_dir.join("index.html");
    state.upload_limit = config.max_upload_bytes;

    let body_limit = match config.max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Import endpoints
        .route("/api/import-text", post(import::import_text))
        .route("/api/upload-files", post(import::upload_files))
        // UI
        .route_service("/", ServeFile::new(index_path))
        .nest_service("/static", ServeDir::new(&config.static_dir))
        // Add state and middleware
        .with_state(state)
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
}
