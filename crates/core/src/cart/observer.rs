//! Side effects of cart mutations.
//!
//! After every save the store reports the new item count, and, when a cart
//! display is present, a freshly rendered [`CartView`]. Mutations also emit a
//! user-visible [`Notice`].

use core::fmt;

use crate::view::CartView;

/// A confirmation or error message for the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A product was appended to the cart.
    Added {
        /// Display name of the product.
        name: String,
    },
    /// A product already in the cart had its quantity increased.
    QuantityIncreased {
        /// Display name of the product.
        name: String,
        /// Quantity after the increase.
        quantity: u32,
    },
    /// A product was removed.
    Removed {
        /// Key of the removed product.
        key: String,
    },
    /// The cart was emptied.
    Cleared,
    /// A product surface submitted unusable product data.
    InvalidProduct,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { name } => write!(f, "\"{name}\" was added to your cart."),
            Self::QuantityIncreased { name, quantity } => {
                write!(f, "\"{name}\" quantity increased ({quantity}x).")
            }
            Self::Removed { key } => write!(f, "\"{key}\" removed."),
            Self::Cleared => f.write_str("Cart cleared."),
            Self::InvalidProduct => f.write_str("Error: invalid product data."),
        }
    }
}

/// Receiver of the store's side effects. Every method defaults to a no-op.
pub trait CartObserver {
    /// The item count changed (fired after every save).
    fn count_changed(&mut self, _item_count: u32) {}

    /// The cart display must be redrawn. Only fired while
    /// [`has_cart_surface`](Self::has_cart_surface) is true.
    fn cart_rendered(&mut self, _view: &CartView) {}

    /// Show a notice to the visitor.
    fn notify(&mut self, _notice: &Notice) {}

    /// Whether a cart display is currently present.
    fn has_cart_surface(&self) -> bool {
        false
    }
}

impl<O: CartObserver + ?Sized> CartObserver for &mut O {
    fn count_changed(&mut self, item_count: u32) {
        (**self).count_changed(item_count);
    }

    fn cart_rendered(&mut self, view: &CartView) {
        (**self).cart_rendered(view);
    }

    fn notify(&mut self, notice: &Notice) {
        (**self).notify(notice);
    }

    fn has_cart_surface(&self) -> bool {
        (**self).has_cart_surface()
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CartObserver for NoopObserver {}

/// Observer that records every side effect in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    cart_surface: bool,
    /// Counts reported after each save.
    pub counts: Vec<u32>,
    /// Views rendered after each save.
    pub renders: Vec<CartView>,
    /// Notices emitted.
    pub notices: Vec<Notice>,
}

impl RecordingObserver {
    /// Recorder for a page without a cart display.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder for a page showing the cart.
    #[must_use]
    pub fn with_cart_surface() -> Self {
        Self {
            cart_surface: true,
            ..Self::default()
        }
    }

    /// Most recent count, if any save happened.
    #[must_use]
    pub fn last_count(&self) -> Option<u32> {
        self.counts.last().copied()
    }

    /// Most recent rendered view.
    #[must_use]
    pub fn last_render(&self) -> Option<&CartView> {
        self.renders.last()
    }

    /// Most recent notice.
    #[must_use]
    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }
}

impl CartObserver for RecordingObserver {
    fn count_changed(&mut self, item_count: u32) {
        self.counts.push(item_count);
    }

    fn cart_rendered(&mut self, view: &CartView) {
        self.renders.push(view.clone());
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }

    fn has_cart_surface(&self) -> bool {
        self.cart_surface
    }
}
