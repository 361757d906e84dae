//! Cart, checkout and canonical order types

use serde::{Deserialize, Serialize};

/// One cart line as captured by the UI layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub product_id: String,
    pub quantity: u32,
    pub unit: String,
    pub unit_price: f64,
    pub description: String,
}

/// Customer identity captured at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Single free-text address captured by the UI. Ship-to, bill-to and sold-to
/// entries are all derived from it at submission time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryAddress {
    /// Free-text street line, e.g. `"Hauptstraße 78a"`
    pub street_line: String,
    pub city: String,
    pub postal_code: String,
    /// Country name as displayed to the associate (mapped to ISO on submit)
    pub country: String,
}

/// Selected shipping option.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingOption {
    pub method: String,
    pub cost: f64,
}

/// Selected payment option (UI-facing method name).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentOption {
    pub method: String,
}

/// Immutable order snapshot handed to the order adapter at submission time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderDraft {
    pub customer: CustomerDetails,
    pub address: DeliveryAddress,
    pub items: Vec<CartItem>,
    pub shipping: ShippingOption,
    pub payment: PaymentOption,
}

/// Origin of an order answer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderSource {
    #[serde(rename = "OMF-Live")]
    Live,
    #[serde(rename = "fallback")]
    Fallback,
}

/// Monetary totals of a canonical order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub discount: f64,
    pub total: f64,
}

/// Item line inside a canonical order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalOrderItem {
    pub product_id: String,
    pub quantity: u32,
    pub unit: String,
    pub unit_price: f64,
}

/// Payment state inside a canonical order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentStatus {
    pub method: String,
    pub status: String,
}

/// Delivery state inside a canonical order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryStatus {
    pub method: String,
    pub status: String,
}

/// Fulfillment state of an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FulfillmentStatus {
    pub status: String,
    pub shipment_count: u32,
}

/// The normalized order shape returned to the UI regardless of which backend
/// produced it (or whether a fallback stand-in was used).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalOrder {
    pub order_id: String,
    pub order_number: String,
    pub status: String,
    pub items: Vec<CanonicalOrderItem>,
    pub totals: OrderTotals,
    pub payment: Option<PaymentStatus>,
    pub delivery: Option<DeliveryStatus>,
    pub fulfillment: Option<FulfillmentStatus>,
    pub external_number: Option<String>,
    pub source: OrderSource,
}

impl OrderDraft {
    /// Item subtotal (before shipping and tax), used for canonical totals.
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(|item| item.unit_price * f64::from(item.quantity)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtotal_sums_line_totals() {
        let draft = OrderDraft {
            customer: CustomerDetails {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: None,
            },
            address: DeliveryAddress {
                street_line: "Main Street 123".to_string(),
                city: "Berlin".to_string(),
                postal_code: "10115".to_string(),
                country: "Germany".to_string(),
            },
            items: vec![
                CartItem {
                    product_id: "29".to_string(),
                    quantity: 2,
                    unit: "PCE".to_string(),
                    unit_price: 10.0,
                    description: "Widget".to_string(),
                },
                CartItem {
                    product_id: "30".to_string(),
                    quantity: 1,
                    unit: "PCE".to_string(),
                    unit_price: 5.5,
                    description: "Gadget".to_string(),
                },
            ],
            shipping: ShippingOption { method: "standard".to_string(), cost: 4.99 },
            payment: PaymentOption { method: "card".to_string() },
        };

        assert!((draft.subtotal() - 25.5).abs() < f64::EPSILON);
    }
}
