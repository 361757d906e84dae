//! Order submission payload assembly
//!
//! Builds the nested `POST /api/v2/orders` body: customer, the three address
//! roles derived from the single UI address, order items with mapped units,
//! shipping fee, payment method and the sourcing block taken from the cached
//! sourcing response.

use once_cell::sync::Lazy;
use rand::distributions::Alphanumeric;
use rand::Rng;
use regex::Regex;
use serde::Serialize;
use storebridge_domain::constants::{
    DEFAULT_COUNTRY_CODE, DEFAULT_HOUSE_NUMBER, DEFAULT_PAYMENT_METHOD, EXTERNAL_NUMBER_PREFIX,
    EXTERNAL_NUMBER_SUFFIX_LEN,
};
use storebridge_domain::{OrderDraft, SourcingResult};
use uuid::Uuid;

/// Trailing house number with an optional letter suffix (`"78a"`).
static STREET_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\s+(\d+[A-Za-z]?)$").expect("street pattern must compile"));

/// Split a free-text street line into street name and house number.
///
/// `"Main Street 123"` → `("Main Street", "123")`, `"Hauptstraße 78a"` →
/// `("Hauptstraße", "78a")`. Lines without a trailing number keep the full
/// input as the street and default the house number to `"1"`.
pub fn split_street_line(line: &str) -> (String, String) {
    let trimmed = line.trim();
    match STREET_PATTERN.captures(trimmed) {
        Some(captures) => (
            captures.get(1).map_or("", |m| m.as_str()).trim_end_matches(',').trim().to_string(),
            captures.get(2).map_or(DEFAULT_HOUSE_NUMBER, |m| m.as_str()).to_string(),
        ),
        None => (trimmed.to_string(), DEFAULT_HOUSE_NUMBER.to_string()),
    }
}

/// Map a UI payment-method name onto the backend's method codes.
pub fn map_payment_method(method: &str) -> String {
    match method.trim().to_lowercase().as_str() {
        "cash" => "Cash".to_string(),
        "card" | "credit card" | "credit_card" | "debit card" | "debit_card" => "Card".to_string(),
        "invoice" => "Invoice".to_string(),
        "bank" | "bank transfer" | "bank_transfer" => "Bank".to_string(),
        _ => DEFAULT_PAYMENT_METHOD.to_string(),
    }
}

/// Map a UI unit-of-measure name onto the backend's ISO codes.
pub fn map_unit(unit: &str) -> String {
    match unit.trim().to_lowercase().as_str() {
        "piece" | "pieces" | "pc" | "pce" | "ea" | "each" => "PCE".to_string(),
        "kg" | "kilogram" => "KGM".to_string(),
        "g" | "gram" => "GRM".to_string(),
        "l" | "litre" | "liter" => "LTR".to_string(),
        "m" | "meter" | "metre" => "MTR".to_string(),
        _ => "PCE".to_string(),
    }
}

/// Map a country name onto its ISO 3166-1 alpha-2 code. Two-letter inputs
/// pass through; unknown names default to the store country.
pub fn map_country(country: &str) -> String {
    let trimmed = country.trim();
    if trimmed.len() == 2 {
        return trimmed.to_uppercase();
    }
    match trimmed.to_lowercase().as_str() {
        "germany" | "deutschland" => "DE".to_string(),
        "austria" | "österreich" => "AT".to_string(),
        "switzerland" | "schweiz" => "CH".to_string(),
        "france" => "FR".to_string(),
        "netherlands" => "NL".to_string(),
        "united kingdom" => "GB".to_string(),
        "united states" => "US".to_string(),
        _ => DEFAULT_COUNTRY_CODE.to_string(),
    }
}

/// Unique external tracking number: fixed prefix + 8 random alphanumerics.
pub fn generate_external_number() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(EXTERNAL_NUMBER_SUFFIX_LEN)
        .map(char::from)
        .collect::<String>()
        .to_uppercase();
    format!("{}{}", EXTERNAL_NUMBER_PREFIX, suffix)
}

/// Shipments carried in a raw sourcing response, wherever the trace put them.
pub fn extract_shipments(data: &serde_json::Value) -> Vec<serde_json::Value> {
    data.get("sourcingResult")
        .and_then(|result| result.get("shipments"))
        .or_else(|| data.get("shipments"))
        .and_then(serde_json::Value::as_array)
        .cloned()
        .unwrap_or_default()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub external_number: String,
    pub preceding_document: PrecedingDocument,
    pub customer: CustomerPayload,
    pub addresses: Vec<AddressPayload>,
    pub order_items: Vec<OrderItemPayload>,
    pub fees: Vec<FeePayload>,
    pub payment: PaymentPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourcing: Option<SourcingPayload>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecedingDocument {
    pub id: String,
    #[serde(rename = "type")]
    pub document_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    #[serde(rename = "type")]
    pub address_type: String,
    pub name: String,
    pub street: String,
    pub house_number: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub product_id: String,
    pub quantity: u32,
    pub unit: String,
    pub unit_price: f64,
    pub description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeePayload {
    #[serde(rename = "type")]
    pub fee_type: String,
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct PaymentPayload {
    pub method: String,
}

#[derive(Debug, Serialize)]
pub struct SourcingPayload {
    pub shipments: Vec<serde_json::Value>,
}

/// The three address roles derived from the single captured address.
const ADDRESS_ROLES: [&str; 3] = ["SHIP_TO", "BILL_TO", "SOLD_TO"];

/// Assemble the full submission payload from the draft and the latest cached
/// sourcing result.
pub fn build_order_payload(draft: &OrderDraft, sourcing: Option<&SourcingResult>) -> OrderPayload {
    let customer_name = format!("{} {}", draft.customer.first_name, draft.customer.last_name);
    let country = map_country(&draft.address.country);

    let addresses = ADDRESS_ROLES
        .iter()
        .map(|role| {
            // Each entry derives street and house number independently.
            let (street, house_number) = split_street_line(&draft.address.street_line);
            AddressPayload {
                address_type: (*role).to_string(),
                name: customer_name.clone(),
                street,
                house_number,
                city: draft.address.city.clone(),
                postal_code: draft.address.postal_code.clone(),
                country: country.clone(),
            }
        })
        .collect();

    let order_items = draft
        .items
        .iter()
        .map(|item| OrderItemPayload {
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            unit: map_unit(&item.unit),
            unit_price: item.unit_price,
            description: item.description.clone(),
        })
        .collect();

    let sourcing = sourcing.and_then(|result| result.data.as_ref()).map(|data| SourcingPayload {
        shipments: extract_shipments(data),
    });

    OrderPayload {
        external_number: generate_external_number(),
        preceding_document: PrecedingDocument {
            id: Uuid::new_v4().to_string(),
            document_type: "SALES_ORDER".to_string(),
        },
        customer: CustomerPayload {
            first_name: draft.customer.first_name.clone(),
            last_name: draft.customer.last_name.clone(),
            email: draft.customer.email.clone(),
            phone: draft.customer.phone.clone(),
        },
        addresses,
        order_items,
        fees: vec![FeePayload {
            fee_type: "SHIPPING".to_string(),
            amount: draft.shipping.cost,
            currency: storebridge_domain::constants::DEFAULT_CURRENCY.to_string(),
        }],
        payment: PaymentPayload { method: map_payment_method(&draft.payment.method) },
        sourcing,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use storebridge_domain::{
        CartItem, CustomerDetails, DeliveryAddress, PaymentOption, ShippingOption, SourcingSource,
    };

    use super::*;

    #[test]
    fn splits_trailing_house_number() {
        assert_eq!(
            split_street_line("Main Street 123"),
            ("Main Street".to_string(), "123".to_string())
        );
    }

    #[test]
    fn splits_house_number_with_letter_suffix() {
        assert_eq!(
            split_street_line("Hauptstraße 78a"),
            ("Hauptstraße".to_string(), "78a".to_string())
        );
    }

    #[test]
    fn address_without_digits_defaults_house_number() {
        assert_eq!(split_street_line("Marktplatz"), ("Marktplatz".to_string(), "1".to_string()));
    }

    #[test]
    fn unknown_payment_method_defaults_to_bank() {
        assert_eq!(map_payment_method("cash"), "Cash");
        assert_eq!(map_payment_method("Credit Card"), "Card");
        assert_eq!(map_payment_method("voucher"), "Bank");
    }

    #[test]
    fn unknown_unit_defaults_to_pce() {
        assert_eq!(map_unit("piece"), "PCE");
        assert_eq!(map_unit("kilogram"), "KGM");
        assert_eq!(map_unit("carton"), "PCE");
    }

    #[test]
    fn unknown_country_defaults_to_de() {
        assert_eq!(map_country("Germany"), "DE");
        assert_eq!(map_country("Austria"), "AT");
        assert_eq!(map_country("Atlantis"), "DE");
        assert_eq!(map_country("fr"), "FR");
    }

    #[test]
    fn external_number_has_prefix_and_length() {
        let number = generate_external_number();
        assert!(number.starts_with(EXTERNAL_NUMBER_PREFIX));
        assert_eq!(number.len(), EXTERNAL_NUMBER_PREFIX.len() + EXTERNAL_NUMBER_SUFFIX_LEN);
        assert!(number.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn external_numbers_are_unique() {
        let first = generate_external_number();
        let second = generate_external_number();
        assert_ne!(first, second);
    }

    fn sample_draft() -> OrderDraft {
        OrderDraft {
            customer: CustomerDetails {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: Some("+49 30 123456".to_string()),
            },
            address: DeliveryAddress {
                street_line: "Hauptstraße 78a".to_string(),
                city: "Berlin".to_string(),
                postal_code: "10115".to_string(),
                country: "Germany".to_string(),
            },
            items: vec![
                CartItem {
                    product_id: "29".to_string(),
                    quantity: 2,
                    unit: "piece".to_string(),
                    unit_price: 89.99,
                    description: "Wireless Barcode Scanner".to_string(),
                },
                CartItem {
                    product_id: "30".to_string(),
                    quantity: 1,
                    unit: "piece".to_string(),
                    unit_price: 149.0,
                    description: "Receipt Printer 80mm".to_string(),
                },
            ],
            shipping: ShippingOption { method: "standard".to_string(), cost: 4.99 },
            payment: PaymentOption { method: "card".to_string() },
        }
    }

    fn sourcing_with_one_shipment() -> SourcingResult {
        SourcingResult {
            success: true,
            cart_empty: false,
            data: Some(serde_json::json!({
                "sourcingResult": {
                    "shipments": [{ "site": { "id": "1010" }, "items": [{ "product": { "id": "29" } }] }]
                }
            })),
            cart_snapshot: Vec::new(),
            source: SourcingSource::Live,
            last_updated: Utc::now(),
            error: None,
        }
    }

    #[test]
    fn payload_mirrors_cart_and_sourcing_counts() {
        let draft = sample_draft();
        let payload = build_order_payload(&draft, Some(&sourcing_with_one_shipment()));

        assert_eq!(payload.order_items.len(), draft.items.len());
        assert_eq!(payload.sourcing.as_ref().map(|s| s.shipments.len()), Some(1));
    }

    #[test]
    fn payload_builds_three_address_roles_from_one_address() {
        let payload = build_order_payload(&sample_draft(), None);

        let roles: Vec<&str> =
            payload.addresses.iter().map(|address| address.address_type.as_str()).collect();
        assert_eq!(roles, vec!["SHIP_TO", "BILL_TO", "SOLD_TO"]);

        for address in &payload.addresses {
            assert_eq!(address.street, "Hauptstraße");
            assert_eq!(address.house_number, "78a");
            assert_eq!(address.country, "DE");
        }
    }

    #[test]
    fn payload_maps_payment_and_units() {
        let payload = build_order_payload(&sample_draft(), None);

        assert_eq!(payload.payment.method, "Card");
        assert!(payload.order_items.iter().all(|item| item.unit == "PCE"));
        assert!(payload.sourcing.is_none());
    }

    #[test]
    fn preceding_document_id_is_uuid_shaped() {
        let payload = build_order_payload(&sample_draft(), None);
        assert_eq!(payload.preceding_document.id.len(), 36);
        assert_eq!(payload.preceding_document.id.matches('-').count(), 4);
    }
}
