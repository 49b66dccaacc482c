//! Furia Storefront library.
//!
//! This crate provides the club site as a library, allowing the router to be
//! tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod schedule;
pub mod state;

use std::path::Path;

use axum::{Router, http::Uri, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::error::AppError;
use crate::state::AppState;

/// Static assets, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Build the application router.
///
/// Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    app_with_static(state, Path::new(STATIC_DIR))
}

/// Build the application router serving static files from `static_dir`.
pub fn app_with_static(state: AppState, static_dir: &Path) -> Router {
    let session_layer =
        middleware::create_session_layer(state.sessions().clone(), state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
