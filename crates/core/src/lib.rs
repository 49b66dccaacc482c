//! Furia Core - cart store and shared types for the Colonia Furia site.
//!
//! This crate provides the logic shared by all surfaces of the club site:
//! - `storefront` - Server-rendered club site with the fan shop
//! - `cli` - Command-line access to a file-backed cart and the schedule feed
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure logic - no network,
//! no filesystem. Persistence goes through the [`cart::CartSlot`] trait and
//! side effects through [`cart::CartObserver`], which the surfaces implement.
//!
//! # Modules
//!
//! - [`types`] - Product keys, prices, line items, the cart and email addresses
//! - [`cart`] - The cart store: merge-by-key adds, quantity updates, removal
//! - [`view`] - Pure render of a cart into a display model
//! - [`checkout`] - Pre-filled order request emails
//! - [`schedule`] - Upcoming-games feed model

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod schedule;
pub mod types;
pub mod view;

pub use types::*;
