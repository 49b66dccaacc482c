//! Fan shop merchandise.

use furia_core::Price;

/// A product offered in the fan shop.
#[derive(Debug, Clone)]
pub struct Product {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub price: Price,
}

impl Product {
    /// Price as submitted by the add-to-cart form.
    #[must_use]
    pub fn price_value(&self) -> String {
        self.price.amount().to_string()
    }
}

/// All products, in display order.
#[must_use]
pub fn merchandise() -> Vec<Product> {
    vec![
        Product {
            key: "jersey-home",
            name: "Home Jersey",
            description: "Season jersey in club red",
            price: Price::from_cents(5990),
        },
        Product {
            key: "jersey-away",
            name: "Away Jersey",
            description: "Season jersey in white",
            price: Price::from_cents(5990),
        },
        Product {
            key: "scarf",
            name: "Fan Scarf",
            description: "Knitted, double-sided",
            price: Price::from_cents(1500),
        },
        Product {
            key: "cap",
            name: "Snapback Cap",
            description: "Embroidered logo",
            price: Price::from_cents(2250),
        },
        Product {
            key: "puck",
            name: "Souvenir Puck",
            description: "",
            price: Price::from_cents(800),
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use furia_core::cart::{CartStore, MemorySlot, ProductCandidate};

    use super::*;

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<_> = merchandise().iter().map(|p| p.key).collect();
        assert_eq!(keys.len(), merchandise().len());
    }

    #[test]
    fn test_every_product_is_addable() {
        let mut store = CartStore::new(MemorySlot::new());
        for product in merchandise() {
            let candidate = ProductCandidate::new(
                product.key,
                product.name,
                product.description,
                product.price_value(),
            );
            store.add_item(&candidate).unwrap();
        }
        assert_eq!(store.load().len(), merchandise().len());
    }
}
