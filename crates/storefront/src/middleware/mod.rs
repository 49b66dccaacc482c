//! Middleware for the storefront.
//!
//! # Middleware Stack (applied in order)
//!
//! 1. Sentry hub and HTTP transaction (outermost, added by the binary)
//! 2. Request tracing (`tower_http::trace::TraceLayer`)
//! 3. Session management (`tower-sessions`, `SQLite` store)

pub mod session;

pub use session::{create_session_layer, create_session_store, spawn_expired_deletion};
