//! OMF order adapter
//!
//! Assembles the canonical order-submission payload from UI-captured order
//! data plus the latest cached sourcing result, submits it, and normalizes
//! backend responses. Order creation never falls back; the read/status
//! operations degrade to tagged stand-ins.

pub mod client;
pub mod payload;
pub mod types;

pub use client::OmfClient;
