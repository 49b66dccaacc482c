//! The persisted key-value slot holding the cart.
//!
//! A slot is a single string value. Browsers keep it in local storage, the
//! storefront keeps it in the visitor's session and the CLI in a file; the
//! store only ever reads or replaces the whole value.

use thiserror::Error;

/// Name of the slot the cart is stored under.
pub const CART_SLOT_KEY: &str = "coloniaFuriaCart";

/// Failure reading or writing a slot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// The value does not fit into the storage quota.
    #[error("storage quota exceeded: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded {
        /// Quota in bytes.
        limit: usize,
        /// Size of the rejected value in bytes.
        needed: usize,
    },
    /// The backing storage cannot be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// Reading or writing the backing storage failed.
    #[error("storage I/O error: {0}")]
    Io(String),
}

/// A single string-valued persisted slot.
pub trait CartSlot {
    /// Read the current value; `Ok(None)` when nothing was stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn read(&self) -> Result<Option<String>, SlotError>;

    /// Replace the value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be stored.
    fn write(&mut self, value: &str) -> Result<(), SlotError>;

    /// Drop the value entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be modified.
    fn clear(&mut self) -> Result<(), SlotError>;
}

impl<S: CartSlot + ?Sized> CartSlot for &mut S {
    fn read(&self) -> Result<Option<String>, SlotError> {
        (**self).read()
    }

    fn write(&mut self, value: &str) -> Result<(), SlotError> {
        (**self).write(value)
    }

    fn clear(&mut self) -> Result<(), SlotError> {
        (**self).clear()
    }
}

/// In-memory slot.
///
/// Tracks whether it was modified so a caller holding the real storage (for
/// example a session) knows whether to write it back. An optional byte quota
/// makes writes fail the way a full browser storage does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySlot {
    contents: Option<String>,
    quota: Option<usize>,
    dirty: bool,
}

impl MemorySlot {
    /// An empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            contents: None,
            quota: None,
            dirty: false,
        }
    }

    /// A slot pre-filled with previously persisted contents.
    #[must_use]
    pub const fn with_contents(contents: Option<String>) -> Self {
        Self {
            contents,
            quota: None,
            dirty: false,
        }
    }

    /// Limit writes to `bytes`.
    #[must_use]
    pub const fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Current contents.
    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// Whether a write or clear succeeded since creation.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Consume the slot, returning its contents.
    #[must_use]
    pub fn into_contents(self) -> Option<String> {
        self.contents
    }
}

impl CartSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, SlotError> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, value: &str) -> Result<(), SlotError> {
        if let Some(limit) = self.quota.filter(|&limit| value.len() > limit) {
            return Err(SlotError::QuotaExceeded {
                limit,
                needed: value.len(),
            });
        }
        self.contents = Some(value.to_owned());
        self.dirty = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SlotError> {
        self.contents = None;
        self.dirty = true;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_slot_tracks_writes() {
        let mut slot = MemorySlot::with_contents(Some("[]".to_string()));
        assert!(!slot.is_dirty());
        assert_eq!(slot.read().unwrap().as_deref(), Some("[]"));

        slot.write("[1]").unwrap();
        assert!(slot.is_dirty());
        assert_eq!(slot.contents(), Some("[1]"));

        slot.clear().unwrap();
        assert_eq!(slot.read().unwrap(), None);
    }

    #[test]
    fn test_memory_slot_quota() {
        let mut slot = MemorySlot::new().with_quota(4);
        assert!(slot.write("[]").is_ok());
        assert_eq!(
            slot.write("[1,2,3]"),
            Err(SlotError::QuotaExceeded {
                limit: 4,
                needed: 7
            })
        );
        assert_eq!(slot.contents(), Some("[]"));
    }
}
