//! Sourcing (fulfillment-plan) types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::order::CartItem;

/// Origin of a sourcing answer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SourcingSource {
    #[serde(rename = "OMSA-Sourcing")]
    Live,
    #[serde(rename = "OMSA-SourcingError")]
    Error,
    #[serde(rename = "OMSA-CartEmpty")]
    CartEmpty,
}

/// Outcome of the latest cart sourcing request.
///
/// At most one instance is considered current at a time; it is replaced
/// whenever cart contents change and cleared when the cart becomes empty.
/// `data` holds the backend response verbatim so order submission can attach
/// the shipment plan without re-interpreting it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourcingResult {
    pub success: bool,
    pub cart_empty: bool,
    pub data: Option<serde_json::Value>,
    /// The cart contents this result was computed for
    pub cart_snapshot: Vec<CartItem>,
    pub source: SourcingSource,
    pub last_updated: DateTime<Utc>,
    pub error: Option<String>,
}

impl SourcingResult {
    /// Result for an empty cart: nothing to source, previous cache cleared.
    pub fn cart_empty() -> Self {
        Self {
            success: true,
            cart_empty: true,
            data: None,
            cart_snapshot: Vec::new(),
            source: SourcingSource::CartEmpty,
            last_updated: Utc::now(),
            error: None,
        }
    }

    /// Structured failure value. Sourcing errors are returned, not thrown, so
    /// cart rendering keeps working.
    pub fn failure(cart_items: &[CartItem], error: impl Into<String>) -> Self {
        Self {
            success: false,
            cart_empty: false,
            data: None,
            cart_snapshot: cart_items.to_vec(),
            source: SourcingSource::Error,
            last_updated: Utc::now(),
            error: Some(error.into()),
        }
    }

    /// Whether this result was computed for exactly the given cart contents
    /// (same items, same quantities, same order-insensitive identity).
    pub fn matches_cart(&self, cart_items: &[CartItem]) -> bool {
        if self.cart_snapshot.len() != cart_items.len() {
            return false;
        }
        cart_items.iter().all(|item| {
            self.cart_snapshot
                .iter()
                .any(|snap| snap.product_id == item.product_id && snap.quantity == item.quantity)
        })
    }
}
