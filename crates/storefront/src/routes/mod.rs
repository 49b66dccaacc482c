//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /games                  - Upcoming games fragment (HTMX, polled)
//! GET  /shop                   - Fan shop
//! GET  /health                 - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns count badge)
//! POST /cart/update            - Update quantity
//! POST /cart/remove            - Remove item
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Redirect to the order request email
//!
//! # Cookies
//! POST /cookies/accept         - Record cookie consent
//! ```
//!
//! Cart mutations answer with a fragment plus an `HX-Trigger` header carrying
//! `cart-updated` (new item count) and `show-toast` (notice text).

pub mod cart;
pub mod cookies;
pub mod home;
pub mod shop;

use axum::{
    Router,
    routing::{get, post},
};
use furia_core::cart::CartStore;
use tower_sessions::Session;

use crate::models::SessionSlot;
use crate::models::session::cookies_accepted;
use crate::state::AppState;

/// Data every full page needs for the shared layout.
#[derive(Debug, Clone, Copy)]
pub struct PageChrome {
    /// Items in the visitor's cart (nav badge).
    pub cart_count: u32,
    /// Whether to hide the cookie banner.
    pub cookies_accepted: bool,
}

impl PageChrome {
    /// Read the layout data from the session.
    pub async fn load(session: &Session) -> Self {
        let slot = SessionSlot::load(session).await;
        Self {
            cart_count: CartStore::new(slot.slot().clone()).totals().item_count,
            cookies_accepted: cookies_accepted(session).await,
        }
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all storefront routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/games", get(home::games))
        .route("/shop", get(shop::index))
        .route("/checkout", get(cart::checkout))
        .route("/cookies/accept", post(cookies::accept))
        .nest("/cart", cart_routes())
}
