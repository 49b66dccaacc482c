//! Core types for the club site.
//!
//! This module provides type-safe wrappers for the cart's domain concepts.

pub mod email;
pub mod key;
pub mod line_item;
pub mod price;

pub use email::{Email, EmailError};
pub use key::{ProductKey, ProductKeyError};
pub use line_item::{Cart, CartParseError, CartTotals, LineItem};
pub use price::{Price, PriceError, format_amount};
