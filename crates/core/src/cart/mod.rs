//! The cart store.
//!
//! [`CartStore`] owns the persisted slot and is the only thing that reads or
//! writes it. Every mutation is a full read-modify-write: load the whole cart,
//! change it, save the whole cart. Saving then reports the new item count to
//! the observer and, if a cart display is present, a re-rendered view.
//!
//! Persistence is fire-and-forget. Unreadable or malformed state loads as an
//! empty cart, and a failed write is logged and otherwise ignored; the
//! side effects still fire with the in-memory result.
//!
//! ```
//! use furia_core::cart::{CartStore, MemorySlot, ProductCandidate};
//!
//! let mut store = CartStore::new(MemorySlot::new());
//! let scarf = ProductCandidate::new("home-scarf", "Home Scarf", "Knitted", "15.00");
//! store.add_item(&scarf).unwrap();
//! store.add_item(&scarf).unwrap();
//!
//! let cart = store.load();
//! assert_eq!(cart.len(), 1);
//! assert_eq!(cart.totals().item_count, 2);
//! ```

mod observer;
mod settings;
mod slot;

use core::num::NonZeroU32;

use rust_decimal::Decimal;
use thiserror::Error;

pub use observer::{CartObserver, NoopObserver, Notice, RecordingObserver};
pub use settings::{InvalidQuantityPolicy, UnknownPolicy};
pub use slot::{CART_SLOT_KEY, CartSlot, MemorySlot, SlotError};

use crate::types::{Cart, CartTotals, LineItem, Price, ProductKey};
use crate::view;

/// Errors returned by cart mutations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The product data offered by a product surface is unusable.
    #[error("invalid product: {0}")]
    InvalidProduct(&'static str),
    /// The requested quantity is below 1.
    #[error("quantity must be at least 1")]
    InvalidQuantity,
}

/// Product data as offered by a product surface (the fields of an
/// add-to-cart button), not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCandidate {
    pub key: String,
    pub display_name: String,
    pub description: String,
    /// Raw price text; unparsable prices count as missing.
    pub unit_price: String,
}

impl ProductCandidate {
    /// Build a candidate from raw surface values.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        unit_price: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            description: description.into(),
            unit_price: unit_price.into(),
        }
    }

    /// Validate into a line item of `quantity` units.
    ///
    /// A product needs a key, a display name and a price above zero.
    fn to_line_item(&self, quantity: NonZeroU32) -> Result<LineItem, CartError> {
        let key = ProductKey::parse(&self.key)
            .map_err(|_| CartError::InvalidProduct("missing product key"))?;
        let display_name = self.display_name.trim();
        if display_name.is_empty() {
            return Err(CartError::InvalidProduct("missing product name"));
        }
        let unit_price = Price::parse(&self.unit_price)
            .ok()
            .filter(|price| !price.is_zero())
            .ok_or(CartError::InvalidProduct("price must be above zero"))?;

        Ok(LineItem::new(
            key,
            display_name,
            self.description.trim(),
            unit_price,
            quantity,
        ))
    }
}

/// Outcome of [`CartStore::add_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The product was appended.
    Added,
    /// The product was already in the cart; its quantity is now `quantity`.
    Increased { quantity: u32 },
}

/// Outcome of [`CartStore::set_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The quantity was set.
    Updated { quantity: u32 },
    /// The request was invalid and the item was removed.
    Removed,
    /// The request was invalid and ignored; the item still has `current` units.
    Rejected { current: u32 },
    /// No item with that key is in the cart.
    NotInCart,
}

/// Parse a quantity typed into a quantity control.
///
/// Returns `None` for anything that is not a base-10 integer.
#[must_use]
pub fn parse_quantity(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Item count and amount of a cart.
#[must_use]
pub fn totals(cart: &Cart) -> CartTotals {
    cart.totals()
}

/// Owned access point to the persisted cart.
pub struct CartStore<S, O = NoopObserver> {
    slot: S,
    observer: O,
    policy: InvalidQuantityPolicy,
}

impl<S: CartSlot> CartStore<S> {
    /// A store without side-effect consumers.
    pub fn new(slot: S) -> Self {
        Self::with_observer(slot, NoopObserver)
    }
}

impl<S: CartSlot, O: CartObserver> CartStore<S, O> {
    /// A store reporting side effects to `observer`.
    pub fn with_observer(slot: S, observer: O) -> Self {
        Self {
            slot,
            observer,
            policy: InvalidQuantityPolicy::default(),
        }
    }

    /// Set how invalid quantities are handled.
    #[must_use]
    pub fn invalid_quantity_policy(mut self, policy: InvalidQuantityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The underlying slot.
    pub const fn slot(&self) -> &S {
        &self.slot
    }

    /// The observer.
    pub const fn observer(&self) -> &O {
        &self.observer
    }

    /// Split the store into its slot and observer.
    pub fn into_parts(self) -> (S, O) {
        (self.slot, self.observer)
    }

    /// Read the persisted cart. Absent, unreadable or malformed state is an
    /// empty cart.
    pub fn load(&self) -> Cart {
        match self.slot.read() {
            Ok(Some(raw)) => Cart::from_json(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "discarding malformed cart state");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "cart state unreadable, starting empty");
                Cart::new()
            }
        }
    }

    /// Persist the whole cart and fire the count and render side effects.
    pub fn save(&mut self, cart: &Cart) {
        match cart.to_json() {
            Ok(json) => {
                if let Err(e) = self.slot.write(&json) {
                    tracing::error!(error = %e, items = cart.len(), "failed to save cart");
                }
            }
            Err(e) => tracing::error!(error = %e, "failed to serialize cart"),
        }

        self.observer.count_changed(cart.totals().item_count);
        if self.observer.has_cart_surface() {
            self.observer.cart_rendered(&view::render(cart));
        }
    }

    /// Add one unit of a product.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidProduct`] if the candidate is unusable; the
    /// cart is left untouched.
    pub fn add_item(&mut self, candidate: &ProductCandidate) -> Result<AddOutcome, CartError> {
        self.add_item_quantity(candidate, 1)
    }

    /// Add `quantity` units of a product.
    ///
    /// If the key is already in the cart only its quantity grows; the stored
    /// name, description and price are kept.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidProduct`] for unusable product data and
    /// [`CartError::InvalidQuantity`] for a zero quantity.
    pub fn add_item_quantity(
        &mut self,
        candidate: &ProductCandidate,
        quantity: u32,
    ) -> Result<AddOutcome, CartError> {
        let quantity = NonZeroU32::new(quantity).ok_or(CartError::InvalidQuantity)?;
        let item = match candidate.to_line_item(quantity) {
            Ok(item) => item,
            Err(e) => {
                tracing::debug!(key = %candidate.key, error = %e, "rejected product");
                self.observer.notify(&Notice::InvalidProduct);
                return Err(e);
            }
        };

        let mut cart = self.load();
        let (outcome, notice) = if let Some(existing) = cart.get_mut(item.key.as_str()) {
            let quantity = existing.increase(quantity);
            (
                AddOutcome::Increased { quantity },
                Notice::QuantityIncreased {
                    name: existing.display_name.clone(),
                    quantity,
                },
            )
        } else {
            let name = item.display_name.clone();
            cart.insert_or_merge(item);
            (AddOutcome::Added, Notice::Added { name })
        };

        self.save(&cart);
        self.observer.notify(&notice);
        Ok(outcome)
    }

    /// Set the quantity of the item with `key`.
    ///
    /// `requested` is `None` when the input was not an integer. Missing or
    /// below-1 requests are handled per the configured
    /// [`InvalidQuantityPolicy`]. An unknown key is a no-op.
    pub fn set_quantity(&mut self, key: &str, requested: Option<i64>) -> QuantityChange {
        let mut cart = self.load();
        let Some(item) = cart.get_mut(key) else {
            return QuantityChange::NotInCart;
        };

        let valid = requested
            .filter(|&q| q >= 1)
            .map(|q| u32::try_from(q).unwrap_or(u32::MAX))
            .and_then(NonZeroU32::new);

        match (valid, self.policy) {
            (Some(quantity), _) => {
                item.set_quantity(quantity);
                self.save(&cart);
                QuantityChange::Updated {
                    quantity: quantity.get(),
                }
            }
            (None, InvalidQuantityPolicy::Reject) => QuantityChange::Rejected {
                current: item.quantity(),
            },
            (None, InvalidQuantityPolicy::Remove) => {
                self.remove_item(key);
                QuantityChange::Removed
            }
        }
    }

    /// Remove the item with `key`. Removing an absent key is not an error.
    ///
    /// Returns whether an item was removed.
    pub fn remove_item(&mut self, key: &str) -> bool {
        let mut cart = self.load();
        let removed = cart.remove(key).is_some();
        self.save(&cart);
        self.observer.notify(&Notice::Removed {
            key: key.trim().to_owned(),
        });
        removed
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        if let Err(e) = self.slot.clear() {
            tracing::error!(error = %e, "failed to clear cart slot");
        }
        self.save(&Cart::new());
        self.observer.notify(&Notice::Cleared);
    }

    /// Totals of the persisted cart.
    pub fn totals(&self) -> CartTotals {
        self.load().totals()
    }

    /// Amount of the persisted cart.
    pub fn amount(&self) -> Decimal {
        self.totals().amount
    }
}
