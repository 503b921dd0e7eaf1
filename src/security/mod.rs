//! TLS credential resolution
//!
//! Turns the `ssl.keystore` / `ssl.truststore` declarations of a channel into
//! [`IdentityMaterial`] and [`TrustMaterial`], or a
//! [`ConfigurationError`](crate::error::ConfigurationError) when a declared
//! store cannot be used as configured.

pub mod material;
pub mod resolver;

pub use material::{IdentityMaterial, Password, StoreType, TrustMaterial};
pub use resolver::{
    resolve_identity, resolve_trust, KEYSTORE_PASSWORD_ATTRIBUTE, TRUSTSTORE_PASSWORD_ATTRIBUTE,
};
