//! OPPS wire types and row transformation

use chrono::Utc;
use serde::{Deserialize, Deserializer};
use storebridge_domain::{item_id_to_product_id, PriceMetadataEntry, PriceRecord, PriceSource};

/// Accept both JSON numbers and OData decimal strings (`"12.50"`).
fn de_flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::String(value) => value.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// OData entity metadata carried on each price row.
#[derive(Debug, Clone, Deserialize)]
pub struct RowMetadata {
    pub uri: String,
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
}

/// One row of the `BasePrices` response.
#[derive(Debug, Clone, Deserialize)]
pub struct BasePriceRow {
    #[serde(rename = "itemID")]
    pub item_id: String,
    #[serde(rename = "priceAmt", deserialize_with = "de_flexible_f64")]
    pub price_amt: f64,
    #[serde(rename = "currencyCode")]
    pub currency_code: String,
    #[serde(rename = "unitOfMeasureCode")]
    pub unit_of_measure_code: Option<String>,
    #[serde(rename = "priceClassification")]
    pub price_classification: Option<String>,
    #[serde(rename = "businessUnitID")]
    pub business_unit_id: Option<String>,
    #[serde(rename = "businessUnitType")]
    pub business_unit_type: Option<String>,
    #[serde(rename = "effectiveDate")]
    pub effective_date: Option<String>,
    #[serde(rename = "expiryDate")]
    pub expiry_date: Option<String>,
    #[serde(rename = "lastCalcRelevantChange")]
    pub last_calc_relevant_change: Option<String>,
    pub tenant: Option<String>,
    #[serde(rename = "logicalSystem")]
    pub logical_system: Option<String>,
    #[serde(rename = "__metadata")]
    pub metadata: Option<RowMetadata>,
}

/// The bulk endpoint answers in one of two shapes: OData-nested
/// (`{"d":{"results":[...]}}`, sometimes without the `d` wrapper) or a flat
/// `value` array. Decoded as an explicit variant step.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BasePriceEnvelope {
    Nested { d: ResultsBody },
    Results { results: Vec<BasePriceRow> },
    Flat { value: Vec<BasePriceRow> },
}

#[derive(Debug, Deserialize)]
pub struct ResultsBody {
    pub results: Vec<BasePriceRow>,
}

impl BasePriceEnvelope {
    pub fn into_rows(self) -> Vec<BasePriceRow> {
        match self {
            Self::Nested { d } => d.results,
            Self::Results { results } => results,
            Self::Flat { value } => value,
        }
    }
}

/// A single-entity real-time response, with or without the OData `d` wrapper.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SingleItemEnvelope {
    Nested { d: Box<BasePriceRow> },
    Bare(Box<BasePriceRow>),
}

impl SingleItemEnvelope {
    pub fn into_row(self) -> BasePriceRow {
        match self {
            Self::Nested { d } => *d,
            Self::Bare(row) => *row,
        }
    }
}

/// Transform one wire row into a price record plus, when the row carries a
/// callable per-item URI, a metadata entry enabling a later real-time lookup.
pub fn transform_row(
    row: BasePriceRow,
    source: PriceSource,
) -> (PriceRecord, Option<PriceMetadataEntry>) {
    let product_id = item_id_to_product_id(&row.item_id);

    let metadata = row.metadata.filter(|meta| !meta.uri.trim().is_empty()).map(|meta| {
        PriceMetadataEntry {
            uri: meta.uri,
            id: meta.id.unwrap_or_default(),
            entry_type: meta.entry_type.unwrap_or_default(),
            product_id: product_id.clone(),
            business_unit_id: row.business_unit_id.clone(),
            business_unit_type: row.business_unit_type.clone(),
        }
    });

    let record = PriceRecord {
        product_id,
        original_item_id: row.item_id,
        list_price: row.price_amt,
        sale_price: row.price_amt,
        currency: row.currency_code,
        unit_of_measure: row
            .unit_of_measure_code
            .unwrap_or_else(|| storebridge_domain::constants::DEFAULT_UNIT.to_string()),
        price_classification: row.price_classification,
        business_unit_id: row.business_unit_id,
        business_unit_type: row.business_unit_type,
        effective_date: row.effective_date,
        expiry_date: row.expiry_date,
        last_updated: Utc::now(),
        source,
    };

    (record, metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row_json() -> serde_json::Value {
        serde_json::json!({
            "itemID": "000000000000000029",
            "priceAmt": "89.99",
            "currencyCode": "EUR",
            "unitOfMeasureCode": "PCE",
            "priceClassification": "STANDARD",
            "businessUnitID": "1010",
            "businessUnitType": "STORE",
            "effectiveDate": "2026-01-01",
            "expiryDate": "9999-12-31",
            "lastCalcRelevantChange": "2026-06-01T10:00:00Z",
            "tenant": "T1",
            "logicalSystem": "OPPS",
            "__metadata": {
                "uri": "https://opps.example.com/BasePrices('29-1010')",
                "id": "BasePrices('29-1010')",
                "type": "opps.BasePrice"
            }
        })
    }

    #[test]
    fn decodes_nested_odata_shape() {
        let body = serde_json::json!({ "d": { "results": [sample_row_json()] } });
        let envelope: BasePriceEnvelope = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.into_rows().len(), 1);
    }

    #[test]
    fn decodes_flat_value_shape() {
        let body = serde_json::json!({ "value": [sample_row_json(), sample_row_json()] });
        let envelope: BasePriceEnvelope = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.into_rows().len(), 2);
    }

    #[test]
    fn price_amount_accepts_numbers_and_strings() {
        let mut as_number = sample_row_json();
        as_number["priceAmt"] = serde_json::json!(12.5);
        let row: BasePriceRow = serde_json::from_value(as_number).unwrap();
        assert!((row.price_amt - 12.5).abs() < f64::EPSILON);

        let row: BasePriceRow = serde_json::from_value(sample_row_json()).unwrap();
        assert!((row.price_amt - 89.99).abs() < f64::EPSILON);
    }

    #[test]
    fn transform_derives_product_id_and_metadata() {
        let row: BasePriceRow = serde_json::from_value(sample_row_json()).unwrap();
        let (record, metadata) = transform_row(row, PriceSource::BulkCache);

        assert_eq!(record.product_id, "29");
        assert_eq!(record.original_item_id, "000000000000000029");
        assert_eq!(record.source, PriceSource::BulkCache);

        let metadata = metadata.expect("metadata entry");
        assert_eq!(metadata.product_id, "29");
        assert_eq!(metadata.business_unit_id.as_deref(), Some("1010"));
        assert!(metadata.uri.contains("BasePrices"));
    }

    #[test]
    fn rows_without_metadata_produce_no_entry() {
        let mut json = sample_row_json();
        json.as_object_mut().unwrap().remove("__metadata");
        let row: BasePriceRow = serde_json::from_value(json).unwrap();

        let (_, metadata) = transform_row(row, PriceSource::BulkCache);
        assert!(metadata.is_none());
    }
}
