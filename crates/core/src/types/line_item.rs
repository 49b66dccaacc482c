//! Line items, the cart sequence and its persisted JSON form.
//!
//! # Persisted schema
//!
//! The cart is stored as one JSON array:
//!
//! ```json
//! [{"key":"home-scarf","displayName":"Home Scarf","description":"Knitted",
//!   "unitPrice":"15.00","quantity":2}]
//! ```
//!
//! Older pages of the site wrote the product name (or an `id`) as the join
//! key and a numeric `price`, and some wrote no price at all. Those entries
//! are migrated on read; entries that cannot be migrated are skipped.

use core::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::key::ProductKey;
use super::price::Price;

/// Error reading persisted cart state.
#[derive(thiserror::Error, Debug)]
pub enum CartParseError {
    /// The state is not a JSON array.
    #[error("cart state is not a JSON array: {0}")]
    Json(#[from] serde_json::Error),
}

/// One product entry in the cart with a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Identity of the product.
    pub key: ProductKey,
    /// Name shown to the visitor.
    pub display_name: String,
    /// Short product description.
    pub description: String,
    /// Price per unit.
    pub unit_price: Price,
    quantity: u32,
}

impl LineItem {
    /// Create a line item.
    #[must_use]
    pub fn new(
        key: ProductKey,
        display_name: impl Into<String>,
        description: impl Into<String>,
        unit_price: Price,
        quantity: NonZeroU32,
    ) -> Self {
        Self {
            key,
            display_name: display_name.into(),
            description: description.into(),
            unit_price,
            quantity: quantity.get(),
        }
    }

    /// Number of units; always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `quantity × unit_price`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.times(self.quantity)
    }

    pub(crate) const fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity.get();
    }

    /// Increase the quantity, saturating at `u32::MAX`. Returns the new quantity.
    pub(crate) const fn increase(&mut self, by: NonZeroU32) -> u32 {
        self.quantity = self.quantity.saturating_add(by.get());
        self.quantity
    }
}

/// Derived cart figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Sum of all quantities.
    pub item_count: u32,
    /// Sum of `quantity × unit_price` over all items.
    pub amount: Decimal,
}

/// Ordered collection of line items, at most one per key.
///
/// New products are appended, so the order is the order in which products
/// were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line item by raw key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.key.matches(key))
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.key.matches(key))
    }

    /// Append `item`, or add its quantity to the existing entry with the same
    /// key. The existing entry keeps its name, description and price.
    pub(crate) fn insert_or_merge(&mut self, item: LineItem) -> u32 {
        if let Some(existing) = self.get_mut(item.key.as_str()) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
            existing.quantity
        } else {
            let quantity = item.quantity;
            self.items.push(item);
            quantity
        }
    }

    /// Remove the entry for `key`, keeping the order of the rest.
    pub(crate) fn remove(&mut self, key: &str) -> Option<LineItem> {
        let index = self.items.iter().position(|item| item.key.matches(key))?;
        Some(self.items.remove(index))
    }

    /// Item count and amount.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        self.items
            .iter()
            .fold(CartTotals::default(), |totals, item| CartTotals {
                item_count: totals.item_count.saturating_add(item.quantity),
                amount: totals
                    .amount
                    .checked_add(item.line_total())
                    .unwrap_or(Decimal::MAX),
            })
    }

    /// Serialize to the canonical persisted schema.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Read persisted state, migrating legacy entries.
    ///
    /// Entries that are not objects, lack a usable key, carry a negative price
    /// or a quantity below 1 are skipped. Duplicate keys are merged.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a JSON array.
    pub fn from_json(raw: &str) -> Result<Self, CartParseError> {
        let entries: Vec<serde_json::Value> = serde_json::from_str(raw)?;
        let total = entries.len();
        let mut cart = Self::new();
        let mut skipped = 0_usize;

        for entry in entries {
            match serde_json::from_value::<StoredLineItem>(entry)
                .ok()
                .and_then(StoredLineItem::into_line_item)
            {
                Some(item) => {
                    cart.insert_or_merge(item);
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::debug!(skipped, total, "skipped unusable cart entries");
        }
        Ok(cart)
    }
}

impl FromIterator<LineItem> for Cart {
    fn from_iter<T: IntoIterator<Item = LineItem>>(iter: T) -> Self {
        let mut cart = Self::new();
        for item in iter {
            cart.insert_or_merge(item);
        }
        cart
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = core::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Any entry shape ever written to the cart slot.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLineItem {
    key: Option<String>,
    id: Option<serde_json::Value>,
    name: Option<String>,
    display_name: Option<String>,
    description: Option<String>,
    unit_price: Option<Price>,
    price: Option<Price>,
    quantity: Option<serde_json::Value>,
}

impl StoredLineItem {
    fn into_line_item(self) -> Option<LineItem> {
        let raw_key = self
            .key
            .or_else(|| self.id.as_ref().and_then(json_to_key))
            .or_else(|| self.name.clone())?;
        let key = ProductKey::parse(&raw_key).ok()?;
        let quantity = self.quantity.as_ref().and_then(json_to_quantity)?;

        let display_name = self
            .display_name
            .or(self.name)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| key.to_string());

        Some(LineItem {
            key,
            display_name,
            description: self.description.unwrap_or_default(),
            unit_price: self.unit_price.or(self.price).unwrap_or(Price::ZERO),
            quantity: quantity.get(),
        })
    }
}

fn json_to_key(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_to_quantity(value: &serde_json::Value) -> Option<NonZeroU32> {
    let quantity = match value {
        serde_json::Value::Number(n) => match n.as_u64() {
            Some(q) => q,
            // Whole floats such as `2.0`
            None => {
                let f = n.as_f64()?;
                if f.fract() != 0.0 || f < 1.0 || f > f64::from(u32::MAX) {
                    return None;
                }
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let whole = f as u64;
                whole
            }
        },
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    NonZeroU32::new(u32::try_from(quantity).ok()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(key: &str, cents: u32, quantity: u32) -> LineItem {
        LineItem::new(
            ProductKey::parse(key).unwrap(),
            key.to_uppercase(),
            format!("{key} description"),
            Price::from_cents(cents),
            NonZeroU32::new(quantity).unwrap(),
        )
    }

    #[test]
    fn test_totals() {
        let cart: Cart = [item("a", 1000, 2), item("b", 500, 3)].into_iter().collect();
        let totals = cart.totals();
        assert_eq!(totals.item_count, 5);
        assert_eq!(totals.amount, Decimal::new(35, 0));
    }

    #[test]
    fn test_totals_empty() {
        assert_eq!(Cart::new().totals(), CartTotals::default());
    }

    #[test]
    fn test_from_iter_merges_duplicates() {
        let cart: Cart = [item("a", 1000, 1), item("b", 100, 1), item("a", 9999, 2)]
            .into_iter()
            .collect();
        assert_eq!(cart.len(), 2);
        let a = cart.get("a").unwrap();
        assert_eq!(a.quantity(), 3);
        assert_eq!(a.unit_price, Price::from_cents(1000));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut cart: Cart = [item("a", 1, 1), item("b", 1, 1), item("c", 1, 1)]
            .into_iter()
            .collect();
        assert!(cart.remove("b").is_some());
        let keys: Vec<&str> = cart.items().iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["a", "c"]);
        assert!(cart.remove("missing").is_none());
    }

    #[test]
    fn test_json_roundtrip() {
        let cart: Cart = [item("scarf", 1599, 2), item("cap", 0, 1)].into_iter().collect();
        let json = cart.to_json().unwrap();
        assert!(json.contains("\"displayName\":\"SCARF\""));
        assert!(json.contains("\"unitPrice\":\"15.99\""));
        assert_eq!(Cart::from_json(&json).unwrap(), cart);
    }

    #[test]
    fn test_from_json_rejects_non_array() {
        assert!(Cart::from_json("not json").is_err());
        assert!(Cart::from_json("{\"key\":\"a\"}").is_err());
        assert!(Cart::from_json("null").is_err());
    }

    #[test]
    fn test_from_json_migrates_name_keyed_entries() {
        let legacy = r#"[
            {"name":"Home Scarf","description":"Knitted","price":15,"image":"","quantity":2},
            {"id":7,"name":"Away Cap","description":"Black","quantity":1},
            {"name":"Home Scarf","description":"Other","price":99,"quantity":1}
        ]"#;
        let cart = Cart::from_json(legacy).unwrap();
        assert_eq!(cart.len(), 2);

        let scarf = cart.get("Home Scarf").unwrap();
        assert_eq!(scarf.display_name, "Home Scarf");
        assert_eq!(scarf.quantity(), 3);
        assert_eq!(scarf.unit_price, Price::from_cents(1500));
        assert_eq!(scarf.description, "Knitted");

        let cap = cart.get("7").unwrap();
        assert_eq!(cap.display_name, "Away Cap");
        assert_eq!(cap.unit_price, Price::ZERO);
    }

    #[test]
    fn test_from_json_skips_unusable_entries() {
        let raw = r#"[
            42,
            {"description":"no key","quantity":1},
            {"key":"zero","quantity":0},
            {"key":"half","quantity":1.5},
            {"key":"negative","unitPrice":-2,"quantity":1},
            {"key":"ok","quantity":"2"},
            {"key":"float","quantity":2.0}
        ]"#;
        let cart = Cart::from_json(raw).unwrap();
        let keys: Vec<&str> = cart.items().iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["ok", "float"]);
        assert_eq!(cart.get("ok").unwrap().quantity(), 2);
        assert_eq!(cart.get("float").unwrap().quantity(), 2);
    }
}
