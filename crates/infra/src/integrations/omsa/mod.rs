//! OMSA sourcing/availability adapter
//!
//! Translates cart contents into fulfillment-site sourcing requests and
//! products into availability queries, with the fixed store/online site
//! topology applied to aggregate stock counts.

pub mod client;
pub mod types;

pub use client::{OmsaCacheConfig, OmsaClient};
