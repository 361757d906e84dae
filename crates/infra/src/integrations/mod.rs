//! External backend integrations
//!
//! One adapter per backend system:
//! - **OPPS**: bulk price cache with real-time per-item override
//! - **OMSA**: cart sourcing and per-product availability
//! - **OMF**: order submission and order read/status operations
//! - **S/4HANA**: product master behind the connectivity proxy

pub mod omf;
pub mod omsa;
pub mod opps;
pub mod s4;

pub use omf::OmfClient;
pub use omsa::OmsaClient;
pub use opps::OppsClient;
pub use s4::S4Client;
