//! CLI errors.

use furia_core::EmailError;
use furia_core::cart::CartError;
use furia_storefront::schedule::FetchError;
use thiserror::Error;

/// A failed command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("invalid recipient: {0}")]
    Recipient(#[from] EmailError),

    #[error("invalid schedule source: {0}")]
    Source(#[from] url::ParseError),

    #[error("failed to load schedule: {0}")]
    Schedule(#[from] FetchError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}
