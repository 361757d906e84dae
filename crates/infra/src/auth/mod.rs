//! OAuth2 client-credentials authentication

pub mod gateway;

pub use gateway::{AuthGateway, CachedToken};
