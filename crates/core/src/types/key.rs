//! Product identity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductKey`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductKeyError {
    /// The key is empty after trimming.
    #[error("product key cannot be empty")]
    Empty,
    /// The key is longer than [`ProductKey::MAX_LENGTH`].
    #[error("product key must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// The identity of a product in the cart.
///
/// Two line items with equal keys are the same product; the cart holds at most
/// one line item per key. Keys are trimmed on parse so `" scarf "` and
/// `"scarf"` name the same product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductKey(String);

impl ProductKey {
    /// Maximum key length in characters.
    pub const MAX_LENGTH: usize = 200;

    /// Parse a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed key is empty or too long.
    pub fn parse(s: &str) -> Result<Self, ProductKeyError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ProductKeyError::Empty);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(ProductKeyError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key matches a raw key as received from a surface.
    #[must_use]
    pub fn matches(&self, raw: &str) -> bool {
        self.0 == raw.trim()
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ProductKey {
    type Error = ProductKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProductKey> for String {
    fn from(key: ProductKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ProductKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
