//! Configuration and credential resolution

pub mod credentials;

pub use credentials::CredentialResolver;
