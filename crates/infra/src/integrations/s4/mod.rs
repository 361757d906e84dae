//! S/4HANA product master adapter
//!
//! Query-parameterized product listing/detail against the ERP OData API,
//! reached through the corporate connectivity proxy. Unlike the OAuth-backed
//! systems, access is configured with a base URL plus an optional proxy
//! authorization header.

pub mod client;
pub mod types;

pub use client::{S4Client, S4Config};
