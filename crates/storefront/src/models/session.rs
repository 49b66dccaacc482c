//! Session-related types.
//!
//! The visitor's session holds the cart slot and the cookie consent flag.

use furia_core::cart::MemorySlot;
use tower_sessions::Session;

/// Session keys.
pub mod keys {
    /// Key for the serialized cart.
    pub const CART: &str = furia_core::cart::CART_SLOT_KEY;

    /// Key for the cookie consent flag.
    pub const COOKIES_ACCEPTED: &str = "cookies_accepted";
}

/// Cart slot backed by the visitor's session.
///
/// The stored string is copied into a [`MemorySlot`] when the request starts;
/// [`persist`](Self::persist) writes it back if the store changed it.
pub struct SessionSlot {
    session: Session,
    slot: MemorySlot,
}

impl SessionSlot {
    /// Read the cart slot out of `session`. An unreadable session value is
    /// treated as absent.
    pub async fn load(session: &Session) -> Self {
        let contents = session
            .get::<String>(keys::CART)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "cart session value unreadable");
                None
            });

        Self {
            session: session.clone(),
            slot: MemorySlot::with_contents(contents),
        }
    }

    /// The slot for a `CartStore`.
    pub const fn slot_mut(&mut self) -> &mut MemorySlot {
        &mut self.slot
    }

    /// The slot, read-only.
    pub const fn slot(&self) -> &MemorySlot {
        &self.slot
    }

    /// Write the slot back to the session if it changed. Failures are logged
    /// and otherwise ignored.
    pub async fn persist(self) {
        if !self.slot.is_dirty() {
            return;
        }

        let result = match self.slot.into_contents() {
            Some(contents) => self.session.insert(keys::CART, contents).await,
            None => self
                .session
                .remove::<String>(keys::CART)
                .await
                .map(|_| ()),
        };
        if let Err(e) = result {
            tracing::error!(error = %e, "failed to write cart to session");
        }
    }
}

/// Whether the visitor accepted cookies.
pub async fn cookies_accepted(session: &Session) -> bool {
    session
        .get::<bool>(keys::COOKIES_ACCEPTED)
        .await
        .ok()
        .flatten()
        .unwrap_or(false)
}
