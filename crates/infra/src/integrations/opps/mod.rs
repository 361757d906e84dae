//! OPPS pricing adapter
//!
//! Maintains an in-memory price table refreshed from the bulk `BasePrices`
//! endpoint with a session-aware expiry policy, plus an optional real-time
//! per-product override through the per-item metadata URI.

pub mod cache;
pub mod client;
pub mod types;

pub use cache::{OppsCacheConfig, PriceCache};
pub use client::OppsClient;
