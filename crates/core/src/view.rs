//! Display model for cart surfaces.
//!
//! [`render`] is a pure function of the cart; surfaces turn the resulting
//! [`CartView`] into HTML, terminal output or anything else.

use serde::Serialize;

use crate::types::{Cart, LineItem, format_amount};

/// One rendered cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineView {
    pub key: String,
    pub name: String,
    pub description: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

/// A rendered cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub lines: Vec<LineView>,
    pub item_count: u32,
    pub total: String,
    pub is_empty: bool,
}

impl CartView {
    /// The view of an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        render(&Cart::new())
    }
}

impl From<&LineItem> for LineView {
    fn from(item: &LineItem) -> Self {
        Self {
            key: item.key.to_string(),
            name: item.display_name.clone(),
            description: item.description.clone(),
            unit_price: item.unit_price.to_string(),
            quantity: item.quantity(),
            line_total: format_amount(item.line_total()),
        }
    }
}

/// Render a cart.
#[must_use]
pub fn render(cart: &Cart) -> CartView {
    let totals = cart.totals();
    CartView {
        lines: cart.items().iter().map(LineView::from).collect(),
        item_count: totals.item_count,
        total: format_amount(totals.amount),
        is_empty: cart.is_empty(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use core::num::NonZeroU32;

    use super::*;
    use crate::types::{Price, ProductKey};

    #[test]
    fn test_render_empty() {
        let view = CartView::empty();
        assert!(view.is_empty);
        assert!(view.lines.is_empty());
        assert_eq!(view.item_count, 0);
        assert_eq!(view.total, "0.00€");
    }

    #[test]
    fn test_render_lines() {
        let cart: Cart = [LineItem::new(
            ProductKey::parse("home-scarf").unwrap(),
            "Home Scarf",
            "Knitted, red and white",
            Price::from_cents(1250),
            NonZeroU32::new(3).unwrap(),
        )]
        .into_iter()
        .collect();

        let view = render(&cart);
        assert!(!view.is_empty);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.total, "37.50€");

        let line = view.lines.first().unwrap();
        assert_eq!(line.key, "home-scarf");
        assert_eq!(line.unit_price, "12.50€");
        assert_eq!(line.line_total, "37.50€");
    }
}
