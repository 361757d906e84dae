//! OMF wire types and canonical normalization

use serde::Deserialize;
use storebridge_domain::{
    CanonicalOrder, CanonicalOrderItem, DeliveryStatus, FulfillmentStatus, OrderDraft,
    OrderSource, OrderTotals, PaymentStatus,
};

/// Order response shape shared by the v1/v2 order endpoints. Every field is
/// optional; normalization fills the gaps.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OmfOrderResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub external_number: Option<String>,
    #[serde(default)]
    pub totals: Option<OmfTotals>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OmfTotals {
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub total: f64,
}

/// Fulfillment response: status plus the shipment list.
#[derive(Debug, Default, Deserialize)]
pub struct OmfFulfillmentResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub shipments: Vec<serde_json::Value>,
}

/// Payment response.
#[derive(Debug, Default, Deserialize)]
pub struct OmfPaymentResponse {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Order search answers either as a wrapped list or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OmfSearchEnvelope {
    Orders { orders: Vec<OmfOrderResponse> },
    Results { results: Vec<OmfOrderResponse> },
    Bare(Vec<OmfOrderResponse>),
}

impl OmfSearchEnvelope {
    pub fn into_orders(self) -> Vec<OmfOrderResponse> {
        match self {
            Self::Orders { orders } => orders,
            Self::Results { results } => results,
            Self::Bare(orders) => orders,
        }
    }
}

/// Error body of a rejected order submission, in either the wrapped or the
/// flat shape. Anything unparsable degrades to the raw body text.
pub fn parse_error_body(body: &str) -> (Option<String>, String) {
    #[derive(Deserialize)]
    struct ErrorFields {
        code: Option<String>,
        message: Option<String>,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ErrorEnvelope {
        Wrapped { error: ErrorFields },
        Flat(ErrorFields),
    }

    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope::Wrapped { error }) | Ok(ErrorEnvelope::Flat(error)) => {
            let message = error.message.unwrap_or_else(|| body.to_string());
            (error.code, message)
        }
        Err(_) => (None, body.to_string()),
    }
}

/// Normalize a creation/read response into the canonical order shape, using
/// the draft to fill items and totals the backend does not echo.
pub fn normalize_order(
    response: OmfOrderResponse,
    draft: Option<&OrderDraft>,
    external_number: Option<String>,
    shipment_count: Option<u32>,
) -> CanonicalOrder {
    let items = draft
        .map(|draft| {
            draft
                .items
                .iter()
                .map(|item| CanonicalOrderItem {
                    product_id: item.product_id.clone(),
                    quantity: item.quantity,
                    unit: item.unit.clone(),
                    unit_price: item.unit_price,
                })
                .collect()
        })
        .unwrap_or_default();

    let totals = match (&response.totals, draft) {
        (Some(totals), _) => OrderTotals {
            subtotal: totals.subtotal,
            tax: totals.tax,
            discount: totals.discount,
            total: totals.total,
        },
        (None, Some(draft)) => {
            let subtotal = draft.subtotal();
            OrderTotals { subtotal, tax: 0.0, discount: 0.0, total: subtotal + draft.shipping.cost }
        }
        (None, None) => OrderTotals::default(),
    };

    let payment = draft.map(|draft| PaymentStatus {
        method: super::payload::map_payment_method(&draft.payment.method),
        status: "PENDING".to_string(),
    });
    let delivery = draft.map(|draft| DeliveryStatus {
        method: draft.shipping.method.clone(),
        status: "PENDING".to_string(),
    });
    let fulfillment = shipment_count.map(|count| FulfillmentStatus {
        status: "PLANNED".to_string(),
        shipment_count: count,
    });

    let order_id = response.id.unwrap_or_default();
    let order_number = response.order_number.unwrap_or_else(|| order_id.clone());

    CanonicalOrder {
        order_id,
        order_number,
        status: response.status.unwrap_or_else(|| "CREATED".to_string()),
        items,
        totals,
        payment,
        delivery,
        fulfillment,
        external_number: response.external_number.or(external_number),
        source: OrderSource::Live,
    }
}

/// Static stand-in for failed order read operations.
pub fn fallback_order(order_id: &str, status: &str) -> CanonicalOrder {
    CanonicalOrder {
        order_id: order_id.to_string(),
        order_number: order_id.to_string(),
        status: status.to_string(),
        items: Vec::new(),
        totals: OrderTotals::default(),
        payment: None,
        delivery: None,
        fulfillment: None,
        external_number: None,
        source: OrderSource::Fallback,
    }
}
