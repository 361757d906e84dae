//! Domain types and models

pub mod availability;
pub mod order;
pub mod product;
pub mod sourcing;
pub mod system;

pub use availability::{AvailabilityResult, AvailabilitySource, SiteStock, SiteType};
pub use order::{
    CanonicalOrder, CanonicalOrderItem, CartItem, CustomerDetails, DeliveryAddress,
    DeliveryStatus, FulfillmentStatus, OrderDraft, OrderSource, OrderTotals, PaymentOption,
    PaymentStatus, ShippingOption,
};
pub use product::{
    CatalogSource, PriceMetadataEntry, PriceRecord, PriceSource, PricingOptions, Product,
    ProductPage,
};
pub use sourcing::{SourcingResult, SourcingSource};
pub use system::{BackendSystem, SystemCredentials};
