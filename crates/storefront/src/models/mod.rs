//! Session-stored data for the storefront.

pub mod session;

pub use session::{SessionSlot, keys as session_keys};
