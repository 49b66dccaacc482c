//! Fan shop page.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tower_sessions::Session;
use tracing::instrument;

use super::PageChrome;
use crate::catalog::{self, Product};
use crate::filters;

/// Shop page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop.html")]
pub struct ShopTemplate {
    pub chrome: PageChrome,
    pub products: Vec<Product>,
}

/// Display the fan shop.
#[instrument(skip(session))]
pub async fn index(session: Session) -> impl IntoResponse {
    ShopTemplate {
        chrome: PageChrome::load(&session).await,
        products: catalog::merchandise(),
    }
}
