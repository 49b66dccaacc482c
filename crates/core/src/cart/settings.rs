//! Store behavior that differs between deployments.

use core::fmt;
use core::str::FromStr;

use thiserror::Error;

/// Unknown policy name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown invalid-quantity policy {0:?} (expected \"remove\" or \"reject\")")]
pub struct UnknownPolicy(pub String);

/// What to do when a quantity control submits a value below 1 or a value
/// that is not an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidQuantityPolicy {
    /// Remove the line item.
    #[default]
    Remove,
    /// Leave the cart unchanged; the surface reverts its input.
    Reject,
}

impl InvalidQuantityPolicy {
    /// Policy name as used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remove => "remove",
            Self::Reject => "reject",
        }
    }
}

impl FromStr for InvalidQuantityPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remove" => Ok(Self::Remove),
            "reject" => Ok(Self::Reject),
            _ => Err(UnknownPolicy(s.to_owned())),
        }
    }
}

impl fmt::Display for InvalidQuantityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy() {
        assert_eq!("remove".parse(), Ok(InvalidQuantityPolicy::Remove));
        assert_eq!(" Reject ".parse(), Ok(InvalidQuantityPolicy::Reject));
        assert!("revert".parse::<InvalidQuantityPolicy>().is_err());
        assert_eq!(InvalidQuantityPolicy::default(), InvalidQuantityPolicy::Remove);
    }
}
