//! Cart commands over a JSON file.
//!
//! The file holds exactly what a browser keeps in local storage under
//! `coloniaFuriaCart`, so carts can be inspected and repaired offline.

#![allow(clippy::print_stdout)]

use std::io::ErrorKind;
use std::path::PathBuf;

use furia_core::Email;
use furia_core::cart::{
    CartObserver, CartSlot, CartStore, InvalidQuantityPolicy, Notice, ProductCandidate,
    QuantityChange, SlotError, parse_quantity,
};
use furia_core::checkout::CheckoutSettings;
use furia_core::view::{self, CartView};

use crate::error::CliError;

/// Cart slot stored in a file. A missing file is an absent slot.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CartSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, SlotError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SlotError::Io(e.to_string())),
        }
    }

    fn write(&mut self, value: &str) -> Result<(), SlotError> {
        std::fs::write(&self.path, value).map_err(|e| SlotError::Io(e.to_string()))
    }

    fn clear(&mut self) -> Result<(), SlotError> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(SlotError::Io(e.to_string())),
            _ => Ok(()),
        }
    }
}

/// Prints notices, and the cart after every save.
struct Terminal;

impl CartObserver for Terminal {
    fn cart_rendered(&mut self, view: &CartView) {
        print_view(view);
    }

    fn notify(&mut self, notice: &Notice) {
        println!("{notice}");
    }

    fn has_cart_surface(&self) -> bool {
        true
    }
}

fn print_view(view: &CartView) {
    if view.is_empty {
        println!("Cart is empty.");
        return;
    }
    for line in &view.lines {
        println!(
            "{:>4}x {:<30} {:>10} {:>10}  [{}]",
            line.quantity, line.name, line.unit_price, line.line_total, line.key
        );
    }
    println!("Items: {}  Total: {}", view.item_count, view.total);
}

pub fn show(slot: FileSlot) {
    print_view(&view::render(&CartStore::new(slot).load()));
}

pub fn add(
    slot: FileSlot,
    key: &str,
    name: &str,
    description: &str,
    price: &str,
    quantity: u32,
) -> Result<(), CliError> {
    let candidate = ProductCandidate::new(key, name, description, price);
    CartStore::with_observer(slot, Terminal).add_item_quantity(&candidate, quantity)?;
    Ok(())
}

pub fn set(slot: FileSlot, policy: InvalidQuantityPolicy, key: &str, raw_quantity: &str) {
    let mut store = CartStore::with_observer(slot, Terminal).invalid_quantity_policy(policy);
    match store.set_quantity(key, parse_quantity(raw_quantity)) {
        QuantityChange::Rejected { current } => {
            println!("Quantity must be at least 1; \"{key}\" keeps {current}.");
        }
        QuantityChange::NotInCart => println!("\"{key}\" is not in the cart."),
        QuantityChange::Updated { .. } | QuantityChange::Removed => {}
    }
}

pub fn remove(slot: FileSlot, key: &str) {
    CartStore::with_observer(slot, Terminal).remove_item(key);
}

pub fn clear(slot: FileSlot) {
    CartStore::with_observer(slot, Terminal).clear();
}

pub fn checkout(slot: &FileSlot, to: &str, subject: Option<&str>) -> Result<(), CliError> {
    let mut settings = CheckoutSettings::new(Email::parse(to)?);
    if let Some(subject) = subject {
        settings = settings.with_subject(subject);
    }

    let cart = CartStore::new(slot.clone()).load();
    match settings.mailto_link(&cart) {
        Some(link) => println!("{link}"),
        None => println!("Cart is empty, nothing to order."),
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn slot() -> (tempfile::TempDir, FileSlot) {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(dir.path().join("cart.json"));
        (dir, slot)
    }

    #[test]
    fn test_missing_file_is_absent() {
        let (_dir, slot) = slot();
        assert_eq!(slot.read().unwrap(), None);
        assert!(CartStore::new(slot).load().is_empty());
    }

    #[test]
    fn test_file_round_trip() {
        let (_dir, slot) = slot();
        add(slot.clone(), "scarf", "Fan Scarf", "", "15.00", 2).unwrap();
        add(slot.clone(), "scarf", "Fan Scarf", "", "15.00", 1).unwrap();

        let cart = CartStore::new(slot.clone()).load();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.totals().item_count, 3);
        assert!(slot.read().unwrap().unwrap().contains("\"key\":\"scarf\""));
    }

    #[test]
    fn test_set_with_reject_policy_keeps_quantity() {
        let (_dir, slot) = slot();
        add(slot.clone(), "cap", "Cap", "", "22.50", 2).unwrap();

        set(slot.clone(), InvalidQuantityPolicy::Reject, "cap", "0");
        assert_eq!(CartStore::new(slot.clone()).load().totals().item_count, 2);

        set(slot.clone(), InvalidQuantityPolicy::Remove, "cap", "abc");
        assert!(CartStore::new(slot).load().is_empty());
    }

    #[test]
    fn test_clear_leaves_empty_cart() {
        let (dir, slot) = slot();
        add(slot.clone(), "cap", "Cap", "", "22.50", 1).unwrap();
        clear(slot.clone());
        assert!(CartStore::new(slot).load().is_empty());
        assert!(dir.path().join("cart.json").exists());
    }

    #[test]
    fn test_invalid_product_is_an_error() {
        let (_dir, slot) = slot();
        let result = add(slot.clone(), "cap", "Cap", "", "0", 1);
        assert!(matches!(result, Err(CliError::Cart(_))));
        assert_eq!(slot.read().unwrap(), None);
    }

    #[test]
    fn test_checkout_rejects_bad_recipient() {
        let (_dir, slot) = slot();
        assert!(matches!(
            checkout(&slot, "nobody", None),
            Err(CliError::Recipient(_))
        ));
    }
}
