//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart lives in the visitor's session; every handler runs one
//! [`CartStore`] operation over the session slot and writes it back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use furia_core::Cart;
use furia_core::cart::{
    AddOutcome, CartError, CartStore, MemorySlot, ProductCandidate, QuantityChange,
    RecordingObserver, parse_quantity,
};
use furia_core::view::{self, CartView};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use super::PageChrome;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::SessionSlot;
use crate::state::AppState;

/// HTMX response header for client-side events.
const HX_TRIGGER: &str = "HX-Trigger";

/// Where a cart form was submitted from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// Any page without a cart display; only the count badge is refreshed.
    #[default]
    Page,
    /// The cart page; the item list is re-rendered.
    Cart,
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    pub quantity: Option<String>,
    #[serde(default)]
    pub surface: Surface,
}

/// Update cart form data. The quantity is the raw input text.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub key: String,
    #[serde(default)]
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub key: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub chrome: PageChrome,
    pub cart: CartView,
    pub checkout_link: Option<String>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
    pub checkout_link: Option<String>,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Store Helpers
// =============================================================================

type SessionStore<'a> = CartStore<&'a mut MemorySlot, &'a mut RecordingObserver>;

/// Result of one store operation.
struct Applied<T> {
    result: T,
    cart: Cart,
    observer: RecordingObserver,
}

/// Run `op` against the visitor's cart and write the slot back to the
/// session.
async fn apply<T>(
    state: &AppState,
    session: &Session,
    mut observer: RecordingObserver,
    op: impl FnOnce(&mut SessionStore<'_>) -> T,
) -> Applied<T> {
    let mut slot = SessionSlot::load(session).await;
    let (result, cart) = {
        let mut store = CartStore::with_observer(slot.slot_mut(), &mut observer)
            .invalid_quantity_policy(state.config().invalid_quantity);
        let result = op(&mut store);
        (result, store.load())
    };
    slot.persist().await;

    Applied {
        result,
        cart,
        observer,
    }
}

/// Read the visitor's cart without changing it.
async fn load_cart(session: &Session) -> Cart {
    let slot = SessionSlot::load(session).await;
    CartStore::new(slot.slot().clone()).load()
}

// =============================================================================
// Response Helpers
// =============================================================================

/// `HX-Trigger` value announcing the new count and an optional toast.
fn hx_trigger(count: u32, toast: Option<&str>) -> String {
    let mut events = serde_json::Map::new();
    events.insert("cart-updated".to_string(), json!({ "count": count }));
    if let Some(message) = toast {
        events.insert("show-toast".to_string(), json!({ "message": message }));
    }
    ascii_json(&Value::Object(events).to_string())
}

/// Escape non-ASCII and control characters so the JSON survives as a header
/// value. serde_json leaves DEL unescaped.
fn ascii_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() && !c.is_ascii_control() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}

/// Fragment for `surface` plus the `HX-Trigger` header.
fn cart_response<T>(
    state: &AppState,
    applied: &Applied<T>,
    surface: Surface,
    toast: Option<String>,
) -> Response {
    let count = applied
        .observer
        .last_count()
        .unwrap_or_else(|| applied.cart.totals().item_count);
    let toast = toast.or_else(|| applied.observer.last_notice().map(ToString::to_string));
    let headers = AppendHeaders([(HX_TRIGGER, hx_trigger(count, toast.as_deref()))]);

    match surface {
        Surface::Cart => {
            let cart = applied
                .observer
                .last_render()
                .cloned()
                .unwrap_or_else(|| view::render(&applied.cart));
            let checkout_link = state.config().checkout.mailto_link(&applied.cart);
            (
                headers,
                CartItemsTemplate {
                    cart,
                    checkout_link,
                },
            )
                .into_response()
        }
        Surface::Page => (headers, CartCountTemplate { count }).into_response(),
    }
}

/// Parse the optional quantity of an add form; absent means one.
fn add_quantity(raw: Option<&str>) -> Result<u32> {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => Ok(1),
        Some(raw) => parse_quantity(raw)
            .filter(|&q| q >= 1)
            .map(|q| u32::try_from(q).unwrap_or(u32::MAX))
            .ok_or_else(|| {
                AppError::BadRequest("quantity must be a positive whole number".to_string())
            }),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;

    CartShowTemplate {
        chrome: PageChrome::load(&session).await,
        checkout_link: state.config().checkout.mailto_link(&cart),
        cart: view::render(&cart),
    }
}

/// Add item to cart (HTMX).
///
/// An item already in the cart only has its quantity increased.
#[instrument(skip(state, session), fields(key = %form.key))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let quantity = add_quantity(form.quantity.as_deref())?;
    let candidate = ProductCandidate::new(form.key, form.name, form.description, form.price);
    let observer = match form.surface {
        Surface::Cart => RecordingObserver::with_cart_surface(),
        Surface::Page => RecordingObserver::new(),
    };

    let applied = apply(&state, &session, observer, |store| {
        store.add_item_quantity(&candidate, quantity)
    })
    .await;

    match applied.result {
        Ok(outcome) => {
            let action = match outcome {
                AddOutcome::Added => "Added to cart",
                AddOutcome::Increased { .. } => "Increased cart quantity",
            };
            add_breadcrumb("cart", action, Some(&[("key", candidate.key.as_str())]));
            Ok(cart_response(&state, &applied, form.surface, None))
        }
        Err(CartError::InvalidProduct(reason)) => {
            tracing::debug!(reason, "add to cart rejected");
            let mut response = cart_response(&state, &applied, form.surface, None);
            *response.status_mut() = StatusCode::UNPROCESSABLE_ENTITY;
            Ok(response)
        }
        Err(e @ CartError::InvalidQuantity) => Err(AppError::BadRequest(e.to_string())),
    }
}

/// Update cart item quantity (HTMX).
#[instrument(skip(state, session), fields(key = %form.key))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let requested = parse_quantity(&form.quantity);
    let applied = apply(
        &state,
        &session,
        RecordingObserver::with_cart_surface(),
        |store| store.set_quantity(&form.key, requested),
    )
    .await;

    let toast = match applied.result {
        QuantityChange::Rejected { current } => {
            Some(format!("Quantity must be at least 1 (kept {current})."))
        }
        QuantityChange::NotInCart => {
            tracing::debug!("quantity update for item not in cart");
            None
        }
        QuantityChange::Updated { .. } | QuantityChange::Removed => None,
    };
    cart_response(&state, &applied, Surface::Cart, toast)
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, session), fields(key = %form.key))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let applied = apply(
        &state,
        &session,
        RecordingObserver::with_cart_surface(),
        |store| store.remove_item(&form.key),
    )
    .await;

    if !applied.result {
        tracing::debug!("removed item was not in cart");
    }
    cart_response(&state, &applied, Surface::Cart, None)
}

/// Empty the cart (HTMX). The page asks for confirmation before posting.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Response {
    let applied = apply(
        &state,
        &session,
        RecordingObserver::with_cart_surface(),
        |store| store.clear(),
    )
    .await;

    add_breadcrumb("cart", "Cleared cart", None);
    cart_response(&state, &applied, Surface::Cart, None)
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    CartCountTemplate {
        count: load_cart(&session).await.totals().item_count,
    }
}

/// Redirect to the pre-filled order request email.
///
/// An empty cart has nothing to order and goes back to the cart page.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Response {
    let cart = load_cart(&session).await;

    match state.config().checkout.mailto_link(&cart) {
        Some(link) => {
            let items = cart.totals().item_count.to_string();
            add_breadcrumb("checkout", "Opened order email", Some(&[("items", &items)]));
            Redirect::to(&link).into_response()
        }
        None => Redirect::to("/cart").into_response(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hx_trigger_count_only() {
        let value: Value = serde_json::from_str(&hx_trigger(3, None)).unwrap();
        assert_eq!(value["cart-updated"]["count"], 3);
        assert!(value.get("show-toast").is_none());
    }

    #[test]
    fn test_hx_trigger_is_ascii() {
        let raw = hx_trigger(1, Some("\"Trikot Köln\" was added to your cart."));
        assert!(raw.is_ascii());

        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value["show-toast"]["message"],
            "\"Trikot Köln\" was added to your cart."
        );
    }

    #[test]
    fn test_hx_trigger_escapes_control_characters() {
        let raw = hx_trigger(1, Some("\"Cap\u{7f}\" was added to your cart."));
        assert!(raw.contains("\\u007f"));
        assert!(axum::http::HeaderValue::from_str(&raw).is_ok());

        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value["show-toast"]["message"],
            "\"Cap\u{7f}\" was added to your cart."
        );
    }

    #[test]
    fn test_add_quantity() {
        assert_eq!(add_quantity(None).unwrap(), 1);
        assert_eq!(add_quantity(Some("")).unwrap(), 1);
        assert_eq!(add_quantity(Some(" 4 ")).unwrap(), 4);
        assert!(add_quantity(Some("0")).is_err());
        assert!(add_quantity(Some("two")).is_err());
    }
}
