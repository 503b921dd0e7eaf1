//! Keystore/truststore resolution
//!
//! Pure functions of the channel configuration. Resolution only happens when
//! SSL is enabled and the store location is configured; anything else means
//! "no credential" and the transport falls back to its defaults.
//!
//! A declared JKS or PKCS12 store without a password is a hard error. So is a
//! PEM keystore without a password, because PEM keystores carry the private
//! key path in the password attribute. PEM truststores need no password.

use super::material::{IdentityMaterial, Password, StoreType, TrustMaterial};
use crate::config::ChannelConfig;
use crate::error::ConfigurationError;
use std::path::PathBuf;
use tracing::debug;

pub const KEYSTORE_PASSWORD_ATTRIBUTE: &str = "ssl.keystore.password";
pub const TRUSTSTORE_PASSWORD_ATTRIBUTE: &str = "ssl.truststore.password";

/// Resolve the client identity declared by `ssl.keystore`
pub fn resolve_identity(
    config: &ChannelConfig,
) -> Result<Option<IdentityMaterial>, ConfigurationError> {
    let keystore = &config.ssl.keystore;
    let location = match (&keystore.location, config.ssl.enabled) {
        (Some(location), true) => location,
        _ => return Ok(None),
    };

    let store_type = StoreType::parse(&keystore.store_type);
    let password = keystore.password.as_ref().ok_or_else(|| {
        ConfigurationError::missing_attribute(
            &config.name,
            KEYSTORE_PASSWORD_ATTRIBUTE,
            &keystore.store_type,
        )
    })?;

    let identity = match store_type {
        StoreType::Jks => IdentityMaterial::Jks {
            path: PathBuf::from(location),
            password: Password::new(password.as_str()),
        },
        // The password attribute holds the private key path for PEM keystores
        StoreType::Pem => IdentityMaterial::Pem {
            cert_path: PathBuf::from(location),
            key_path: PathBuf::from(password),
        },
        StoreType::Pkcs12 => IdentityMaterial::Pkcs12 {
            path: PathBuf::from(location),
            password: Password::new(password.as_str()),
        },
    };

    debug!(
        channel = %config.name,
        store_type = %store_type,
        location = %location,
        "Resolved client identity"
    );
    Ok(Some(identity))
}

/// Resolve the trusted authorities declared by `ssl.truststore`
pub fn resolve_trust(config: &ChannelConfig) -> Result<Option<TrustMaterial>, ConfigurationError> {
    let truststore = &config.ssl.truststore;
    let location = match (&truststore.location, config.ssl.enabled) {
        (Some(location), true) => location,
        _ => return Ok(None),
    };

    let store_type = StoreType::parse(&truststore.store_type);
    let trust = if store_type == StoreType::Pem {
        TrustMaterial::Pem {
            cert_path: PathBuf::from(location),
        }
    } else {
        let password = truststore.password.as_ref().ok_or_else(|| {
            ConfigurationError::missing_attribute(
                &config.name,
                TRUSTSTORE_PASSWORD_ATTRIBUTE,
                &truststore.store_type,
            )
        })?;
        match store_type {
            StoreType::Jks => TrustMaterial::Jks {
                path: PathBuf::from(location),
                password: Password::new(password.as_str()),
            },
            _ => TrustMaterial::Pkcs12 {
                path: PathBuf::from(location),
                password: Password::new(password.as_str()),
            },
        }
    };

    debug!(
        channel = %config.name,
        store_type = %store_type,
        location = %location,
        "Resolved trust material"
    );
    Ok(Some(trust))
}
