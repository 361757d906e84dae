//! S/4HANA wire types

use serde::{Deserialize, Deserializer};
use storebridge_domain::constants::DEFAULT_UNIT;
use storebridge_domain::Product;

/// Accept numbers and OData decimal strings, tolerating absence.
fn de_opt_flexible_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        String(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(value)) => Ok(Some(value)),
        Some(Raw::String(value)) => {
            value.trim().parse().map(Some).map_err(serde::de::Error::custom)
        }
        None => Ok(None),
    }
}

/// One product master row. The ERP emits either the plain API field names or
/// the OData entity names, depending on the service version behind the proxy.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRow {
    #[serde(rename = "id", alias = "Product")]
    pub id: String,
    #[serde(rename = "description", alias = "ProductDescription", default)]
    pub description: Option<String>,
    #[serde(rename = "standardId", alias = "StandardID", default)]
    pub standard_id: Option<String>,
    #[serde(rename = "baseUnit", alias = "BaseUnit", default)]
    pub base_unit: Option<String>,
    #[serde(
        rename = "netPriceAmount",
        alias = "NetPriceAmount",
        default,
        deserialize_with = "de_opt_flexible_f64"
    )]
    pub net_price_amount: Option<f64>,
}

/// Product listing envelope: OData-nested, bare results or flat value array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProductListEnvelope {
    Nested { d: ProductResults },
    Results { results: Vec<ProductRow> },
    Flat { value: Vec<ProductRow> },
}

#[derive(Debug, Deserialize)]
pub struct ProductResults {
    pub results: Vec<ProductRow>,
}

impl ProductListEnvelope {
    pub fn into_rows(self) -> Vec<ProductRow> {
        match self {
            Self::Nested { d } => d.results,
            Self::Results { results } => results,
            Self::Flat { value } => value,
        }
    }
}

/// Single-product envelope, with or without the OData `d` wrapper.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProductEnvelope {
    Nested { d: Box<ProductRow> },
    Bare(Box<ProductRow>),
}

impl ProductEnvelope {
    pub fn into_row(self) -> ProductRow {
        match self {
            Self::Nested { d } => *d,
            Self::Bare(row) => *row,
        }
    }
}

/// Map a product master row into the canonical product shape. Stock fields
/// stay zero until availability enrichment runs.
pub fn to_product(row: ProductRow) -> Product {
    let description = row.description.unwrap_or_else(|| row.id.clone());
    Product {
        ean: row.standard_id,
        description,
        list_price: row.net_price_amount.unwrap_or(0.0),
        unit: row.base_unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
        image: None,
        in_store_stock: 0.0,
        online_stock: 0.0,
        is_available: false,
        id: row.id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_api_field_names() {
        let row: ProductRow = serde_json::from_value(serde_json::json!({
            "id": "29",
            "description": "Wireless Barcode Scanner",
            "standardId": "4006381333931",
            "baseUnit": "PCE",
            "netPriceAmount": "89.99"
        }))
        .unwrap();

        let product = to_product(row);
        assert_eq!(product.id, "29");
        assert_eq!(product.ean.as_deref(), Some("4006381333931"));
        assert!((product.list_price - 89.99).abs() < f64::EPSILON);
    }

    #[test]
    fn decodes_odata_entity_names() {
        let row: ProductRow = serde_json::from_value(serde_json::json!({
            "Product": "30",
            "ProductDescription": "Receipt Printer 80mm",
            "StandardID": "4006381333948",
            "BaseUnit": "PCE",
            "NetPriceAmount": 149.0
        }))
        .unwrap();

        let product = to_product(row);
        assert_eq!(product.id, "30");
        assert_eq!(product.description, "Receipt Printer 80mm");
    }

    #[test]
    fn missing_optionals_get_defaults() {
        let row: ProductRow = serde_json::from_value(serde_json::json!({ "id": "31" })).unwrap();

        let product = to_product(row);
        assert_eq!(product.description, "31");
        assert_eq!(product.unit, DEFAULT_UNIT);
        assert!((product.list_price - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn list_envelope_accepts_nested_and_flat_shapes() {
        let nested: ProductListEnvelope = serde_json::from_value(serde_json::json!({
            "d": { "results": [{ "id": "29" }] }
        }))
        .unwrap();
        assert_eq!(nested.into_rows().len(), 1);

        let flat: ProductListEnvelope = serde_json::from_value(serde_json::json!({
            "value": [{ "id": "29" }, { "id": "30" }]
        }))
        .unwrap();
        assert_eq!(flat.into_rows().len(), 2);
    }
}
