//! HTTP API over the crawl engine
//!
//! Three endpoints trigger one invocation each:
//! - `POST /recursive-crawl` runs a depth-bounded crawl
//! - `POST /process-all-links` drains the content task queue
//! - `GET /realtime-stats` reports frontier, queue and corpus counts
//!
//! The engine sits behind an async mutex, so crawl and processing
//! invocations on one server run one at a time. Stats are read through a
//! separate store handle and answer while an invocation is in flight.

mod handlers;

pub use handlers::{parse_depth, CrawlBody};

use crate::crawler::{CrawlEngine, PageFetcher};
use crate::storage::Storage;
use crate::CrawlError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared state handed to every handler
pub struct AppState<S, F> {
    pub engine: Arc<Mutex<CrawlEngine<S, F>>>,
    /// Second handle on the engine's store, used only for stats
    pub stats_reader: Arc<Mutex<S>>,
    /// Depth budget used when a crawl request does not carry a usable one
    pub default_depth: u32,
}

impl<S, F> AppState<S, F> {
    /// `stats_reader` must see the same data as the engine's store, e.g. a
    /// second connection to the same WAL database file.
    pub fn new(engine: CrawlEngine<S, F>, stats_reader: S, default_depth: u32) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            stats_reader: Arc::new(Mutex::new(stats_reader)),
            default_depth,
        }
    }
}

impl<S, F> Clone for AppState<S, F> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            stats_reader: Arc::clone(&self.stats_reader),
            default_depth: self.default_depth,
        }
    }
}

/// Builds the router with all routes
pub fn router<S, F>(state: AppState<S, F>) -> Router
where
    S: Storage + Send + 'static,
    F: PageFetcher + 'static,
{
    Router::new()
        .route("/recursive-crawl", post(handlers::recursive_crawl::<S, F>))
        .route("/process-all-links", post(handlers::process_all_links::<S, F>))
        .route("/realtime-stats", get(handlers::realtime_stats::<S, F>))
        .with_state(state)
}

/// Runs the HTTP server until the process is interrupted
pub async fn serve<S, F>(state: AppState<S, F>, bind_address: SocketAddr) -> Result<(), CrawlError>
where
    S: Storage + Send + 'static,
    F: PageFetcher + 'static,
{
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    tracing::info!("Server listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Current time as an RFC 3339 timestamp
pub(crate) fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Error body returned for rejected or failed requests
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
    pub timestamp: String,
}

/// A failed invocation, rendered as 400 for validation errors and 500 otherwise
#[derive(Debug)]
pub struct ApiError(pub CrawlError);

impl From<CrawlError> for ApiError {
    fn from(error: CrawlError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_validation() {
            tracing::warn!("Rejected request: {}", self.0);
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!("Request failed: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = ErrorResponse {
            status: "error",
            message: self.0.to_string(),
            timestamp: timestamp(),
        };

        (status, Json(body)).into_response()
    }
}
