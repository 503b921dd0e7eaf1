//! Resolved credential material
//!
//! These values only describe where the material lives. Loading and parsing
//! the files is left to the transport that opens the TLS connection.

use std::fmt;
use std::path::PathBuf;

/// Declared keystore/truststore encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreType {
    Jks,
    Pem,
    /// Used for any value other than `jks` or `pem`
    #[default]
    Pkcs12,
}

impl StoreType {
    /// Parse a declared store type, case-insensitively
    ///
    /// Surrounding whitespace is not ignored: `" jks "` is PKCS#12.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "jks" => StoreType::Jks,
            "pem" => StoreType::Pem,
            _ => StoreType::Pkcs12,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreType::Jks => "jks",
            StoreType::Pem => "pem",
            StoreType::Pkcs12 => "pkcs12",
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store password, redacted in `Debug` output
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new<S: Into<String>>(password: S) -> Self {
        Self(password.into())
    }

    /// Clear-text password, for handing to the TLS backend
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Client identity (private key and certificate chain)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityMaterial {
    Jks { path: PathBuf, password: Password },
    Pem { cert_path: PathBuf, key_path: PathBuf },
    Pkcs12 { path: PathBuf, password: Password },
}

impl IdentityMaterial {
    pub fn store_type(&self) -> StoreType {
        match self {
            IdentityMaterial::Jks { .. } => StoreType::Jks,
            IdentityMaterial::Pem { .. } => StoreType::Pem,
            IdentityMaterial::Pkcs12 { .. } => StoreType::Pkcs12,
        }
    }
}

/// Trusted certificate authorities
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustMaterial {
    Jks { path: PathBuf, password: Password },
    Pem { cert_path: PathBuf },
    Pkcs12 { path: PathBuf, password: Password },
}

impl TrustMaterial {
    pub fn store_type(&self) -> StoreType {
        match self {
            TrustMaterial::Jks { .. } => StoreType::Jks,
            TrustMaterial::Pem { .. } => StoreType::Pem,
            TrustMaterial::Pkcs12 { .. } => StoreType::Pkcs12,
        }
    }
}
