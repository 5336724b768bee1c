//! HTTP front end: the upload page and the rendered comparison.
//!
//! ```text
//! GET  /        sample PDF (or the upload prompt)
//! POST /        multipart upload, field `file`
//! GET  /health  JSON liveness probe
//! ```
//!
//! Handlers hand the blocking file work to `spawn_blocking`; each request
//! stages its upload under a fresh transient name, so concurrent requests
//! never share a file.

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::output::ViewOutcome;
use crate::page::render_page;
use crate::pipeline::input::sample_source;
use crate::view::display;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

/// Name of the multipart field carrying the PDF.
pub const UPLOAD_FIELD: &str = "file";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ViewerConfig>,
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Build the axum router
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/", get(index).post(upload))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Errors surfaced to the browser as an HTML error page.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Viewer(#[from] ViewerError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Multipart(e) => e.status(),
            ApiError::Viewer(ViewerError::InvalidInput { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Viewer(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error!("{}", self);

        // The detail stays in the log; the page only names the class of failure.
        let body = format!(
            "<!DOCTYPE html><html><body><h1>{}</h1><p><a href=\"/\">Back</a></p></body></html>",
            status.canonical_reason().unwrap_or("Error")
        );
        (status, Html(body)).into_response()
    }
}

/// Run orchestration and page rendering off the async workers.
async fn render_blocking(
    config: Arc<ViewerConfig>,
    upload: Option<Vec<u8>>,
) -> Result<Html<String>, ApiError> {
    let page = tokio::task::spawn_blocking(move || -> Result<String, ViewerError> {
        let outcome: ViewOutcome = display(upload.as_deref(), &config)?;
        render_page(&outcome, &config, true)
    })
    .await
    .map_err(|e| ViewerError::Internal(format!("render task failed: {e}")))??;
    Ok(Html(page))
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    render_blocking(state.config, None).await
}

/// Browsers submit the file part with an empty filename when nothing was
/// picked; only a named part is an upload, whatever its length.
fn is_picked_file(file_name: Option<&str>) -> bool {
    file_name.is_some_and(|name| !name.is_empty())
}

async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, ApiError> {
    let mut bytes = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let picked = is_picked_file(field.file_name());
        let data = field.bytes().await?;
        if picked {
            info!("Received upload of {} bytes", data.len());
            bytes = Some(data.to_vec());
        } else {
            debug!("Ignoring unnamed '{}' part ({} bytes)", UPLOAD_FIELD, data.len());
        }
    }
    render_blocking(state.config, bytes).await
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    sample_available: bool,
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        sample_available: sample_source(&state.config).is_some(),
    })
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> Result<SocketAddr, ViewerError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ViewerError::InvalidAddress(raw))
    }
}

/// Run the HTTP server until Ctrl-C.
pub async fn run(state: AppState, config: ServerConfig) -> Result<(), ViewerError> {
    let addr = config.addr()?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ViewerError::Bind { addr, source: e })?;

    info!("Serving PDF viewer test page on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ViewerError::Serve)?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
