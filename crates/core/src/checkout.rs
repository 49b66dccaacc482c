//! Checkout handoff.
//!
//! There is no payment processing: checking out composes a pre-filled email
//! listing the cart contents, which the visitor sends to the club shop from
//! their own mail program. Composing the draft only reads the cart.

use core::fmt::Write as _;

use crate::types::{Cart, Email, format_amount};

/// Default subject of the order request.
pub const DEFAULT_SUBJECT: &str = "Order request via website";

const GREETING: &str = "Hello Furia team,\n\nI would like to request the following items:\n\n";
const CLOSING: &str = "\nPlease let me know about availability, payment options and the total \
                       cost including shipping.\n\nThank you!";

/// Where order requests go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Recipient of the order request.
    pub recipient: Email,
    /// Subject line.
    pub subject: String,
}

impl CheckoutSettings {
    /// Settings with the default subject.
    #[must_use]
    pub fn new(recipient: Email) -> Self {
        Self {
            recipient,
            subject: DEFAULT_SUBJECT.to_string(),
        }
    }

    /// Set the subject line.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// A `mailto:` link opening the pre-filled order request, or `None` when
    /// the cart is empty.
    #[must_use]
    pub fn mailto_link(&self, cart: &Cart) -> Option<String> {
        if cart.is_empty() {
            return None;
        }
        Some(format!(
            "mailto:{}?subject={}&body={}",
            self.recipient,
            urlencoding::encode(&self.subject),
            urlencoding::encode(&compose_message(cart)),
        ))
    }
}

/// The body of the order request.
#[must_use]
pub fn compose_message(cart: &Cart) -> String {
    let mut body = String::from(GREETING);
    for item in cart {
        let _ = write!(body, "- {}x {}", item.quantity(), item.display_name);
        if !item.description.is_empty() {
            let _ = write!(body, " ({})", item.description);
        }
        body.push('\n');
    }

    let totals = cart.totals();
    let unit = if totals.item_count == 1 { "item" } else { "items" };
    let _ = write!(
        body,
        "\nTotal: {} {unit}, {}\n",
        totals.item_count,
        format_amount(totals.amount)
    );
    body.push_str(CLOSING);
    body
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use core::num::NonZeroU32;

    use super::*;
    use crate::types::{LineItem, Price, ProductKey};

    fn cart() -> Cart {
        [
            LineItem::new(
                ProductKey::parse("home-scarf").unwrap(),
                "Home Scarf",
                "Knitted",
                Price::from_cents(1500),
                NonZeroU32::new(2).unwrap(),
            ),
            LineItem::new(
                ProductKey::parse("sticker").unwrap(),
                "Sticker",
                "",
                Price::from_cents(150),
                NonZeroU32::new(1).unwrap(),
            ),
        ]
        .into_iter()
        .collect()
    }

    fn settings() -> CheckoutSettings {
        CheckoutSettings::new(Email::parse("shop@example.com").unwrap())
    }

    #[test]
    fn test_compose_message_lists_items_and_total() {
        let body = compose_message(&cart());
        assert!(body.starts_with("Hello Furia team,"));
        assert!(body.contains("- 2x Home Scarf (Knitted)\n"));
        assert!(body.contains("- 1x Sticker\n"));
        assert!(body.contains("Total: 3 items, 31.50€"));
        assert!(body.ends_with("Thank you!"));
    }

    #[test]
    fn test_mailto_link_encodes_subject_and_body() {
        let link = settings().mailto_link(&cart()).unwrap();
        assert!(link.starts_with("mailto:shop@example.com?subject=Order%20request%20via%20website&body="));
        assert!(link.contains("2x%20Home%20Scarf%20%28Knitted%29%0A"));
        assert!(!link.contains('\n'));
        assert!(!link.contains(' '));
    }

    #[test]
    fn test_mailto_link_empty_cart() {
        assert_eq!(settings().mailto_link(&Cart::new()), None);
    }

    #[test]
    fn test_custom_subject() {
        let link = settings()
            .with_subject("Fan shop & more")
            .mailto_link(&cart())
            .unwrap();
        assert!(link.contains("subject=Fan%20shop%20%26%20more&"));
    }
}
