//! Cookie consent.

use axum::{http::StatusCode, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::models::session_keys;

/// Record cookie consent. Returns an empty body so HTMX removes the banner.
#[instrument(skip(session))]
pub async fn accept(session: Session) -> Result<impl IntoResponse> {
    session.insert(session_keys::COOKIES_ACCEPTED, true).await?;
    Ok(StatusCode::OK)
}
