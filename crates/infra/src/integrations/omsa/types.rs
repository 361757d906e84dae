//! OMSA wire types and stock aggregation

use chrono::Utc;
use serde::{Deserialize, Serialize};
use storebridge_domain::constants::{
    ONLINE_SITE_ID, SOURCING_RESERVATION_STATUS, SOURCING_STRATEGY_ID, STORE_SITE_IDS,
};
use storebridge_domain::{
    AvailabilityResult, AvailabilitySource, CartItem, SiteStock, SiteType,
};

/// Site category for a site id. Unknown ids count as store sites.
pub fn site_type(site_id: &str) -> SiteType {
    if site_id == ONLINE_SITE_ID {
        SiteType::Online
    } else {
        SiteType::Store
    }
}

/// All site ids queried for availability, stores first.
pub fn all_site_ids() -> Vec<String> {
    STORE_SITE_IDS
        .iter()
        .map(|id| (*id).to_string())
        .chain(std::iter::once(ONLINE_SITE_ID.to_string()))
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteRef {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitOfMeasureRef {
    pub sales_unit_code: String,
}

/// `POST /v1/inventory/availableToSellBySite` request body.
#[derive(Debug, Serialize)]
pub struct AvailabilityRequest {
    pub items: Vec<AvailabilityRequestItem>,
    pub sites: Vec<SiteRef>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequestItem {
    pub product: ProductRef,
    pub unit_of_measure: UnitOfMeasureRef,
}

impl AvailabilityRequest {
    /// Availability request for one product across the full site topology.
    pub fn for_product(product_id: &str, unit: &str) -> Self {
        Self {
            items: vec![AvailabilityRequestItem {
                product: ProductRef { id: product_id.to_string() },
                unit_of_measure: UnitOfMeasureRef { sales_unit_code: unit.to_string() },
            }],
            sites: all_site_ids().into_iter().map(|id| SiteRef { id }).collect(),
        }
    }
}

/// `availableToSellBySite` response.
#[derive(Debug, Deserialize)]
pub struct AvailabilityResponse {
    #[serde(default)]
    pub items: Vec<AvailabilityResponseItem>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityResponseItem {
    pub product: Option<ProductRef>,
    #[serde(default)]
    pub sites: Vec<SiteQuantity>,
}

#[derive(Debug, Deserialize)]
pub struct SiteQuantity {
    pub site: SiteRef,
    #[serde(default)]
    pub quantity: f64,
}

/// Aggregate per-site quantities into the in-store/online split.
pub fn aggregate_availability(
    product_id: &str,
    response: AvailabilityResponse,
) -> AvailabilityResult {
    let mut sites = Vec::new();
    let mut in_store = 0.0;
    let mut online = 0.0;

    for item in response.items {
        if let Some(product) = &item.product {
            if product.id != product_id {
                continue;
            }
        }
        for site_quantity in item.sites {
            let kind = site_type(&site_quantity.site.id);
            match kind {
                SiteType::Store => in_store += site_quantity.quantity,
                SiteType::Online => online += site_quantity.quantity,
            }
            sites.push(SiteStock {
                site_id: site_quantity.site.id,
                site_type: kind,
                quantity: site_quantity.quantity,
            });
        }
    }

    let total = in_store + online;
    AvailabilityResult {
        product_id: product_id.to_string(),
        in_store_stock: in_store,
        online_stock: online,
        total_stock: total,
        is_available: total > 0.0,
        sites,
        source: AvailabilitySource::Live,
        last_updated: Utc::now(),
        has_data: true,
    }
}

/// `POST /v1/sourcing` request body.
#[derive(Debug, Serialize)]
pub struct SourcingRequest {
    pub strategy: StrategyRef,
    pub items: Vec<SourcingRequestItem>,
    pub destination: Destination,
    pub reservation: Reservation,
    pub trace: TraceFlags,
}

#[derive(Debug, Serialize)]
pub struct StrategyRef {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct SourcingRequestItem {
    pub product: ProductRef,
    pub quantity: Quantity,
}

#[derive(Debug, Serialize)]
pub struct Quantity {
    pub value: u32,
    pub unit: String,
}

#[derive(Debug, Serialize)]
pub struct Destination {
    #[serde(rename = "isoCode3166-1")]
    pub iso_code: String,
}

#[derive(Debug, Serialize)]
pub struct Reservation {
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceFlags {
    pub sourcing_result: bool,
    pub site_details: bool,
}

impl SourcingRequest {
    /// Sourcing request for the given cart, destination fixed to the store
    /// country.
    pub fn for_cart(cart_items: &[CartItem], destination_iso: &str) -> Self {
        Self {
            strategy: StrategyRef { id: SOURCING_STRATEGY_ID.to_string() },
            items: cart_items
                .iter()
                .map(|item| SourcingRequestItem {
                    product: ProductRef { id: item.product_id.clone() },
                    quantity: Quantity { value: item.quantity, unit: item.unit.clone() },
                })
                .collect(),
            destination: Destination { iso_code: destination_iso.to_string() },
            reservation: Reservation { status: SOURCING_RESERVATION_STATUS.to_string() },
            trace: TraceFlags { sourcing_result: true, site_details: true },
        }
    }
}
