//! # StoreBridge API
//!
//! Process wiring for the orchestration layer: configuration load, tracing
//! setup and construction of the service graph consumed by the UI layer.

pub mod context;

pub use context::AppContext;
