//! Error types for session configuration
//!
//! `ConfigurationError` is raised while turning a channel's configuration into
//! [`SessionOptions`](crate::session::SessionOptions), always before any
//! network attempt. `SessionError` is the crate-level error that also covers
//! configuration loading and the transport adapter.

use thiserror::Error;

/// Misconfiguration detected while building session options
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error(
        "The attribute `{attribute}` on channel '{channel}' must be set for store type `{store_type}`"
    )]
    MissingAttribute {
        channel: String,
        attribute: &'static str,
        store_type: String,
    },

    #[error("Invalid port {port} on channel '{channel}': must be between 1 and 65535")]
    InvalidPort { channel: String, port: i64 },

    #[error("Invalid value for `{attribute}` on channel '{channel}': {reason}")]
    InvalidAttribute {
        channel: String,
        attribute: &'static str,
        reason: String,
    },
}

impl ConfigurationError {
    /// Create missing attribute error
    pub fn missing_attribute<C: Into<String>, T: Into<String>>(
        channel: C,
        attribute: &'static str,
        store_type: T,
    ) -> Self {
        Self::MissingAttribute {
            channel: channel.into(),
            attribute,
            store_type: store_type.into(),
        }
    }

    /// Create invalid attribute error
    pub fn invalid_attribute<C: Into<String>, R: Into<String>>(
        channel: C,
        attribute: &'static str,
        reason: R,
    ) -> Self {
        Self::InvalidAttribute {
            channel: channel.into(),
            attribute,
            reason: reason.into(),
        }
    }

    /// Channel the error was raised for
    pub fn channel(&self) -> &str {
        match self {
            Self::MissingAttribute { channel, .. }
            | Self::InvalidPort { channel, .. }
            | Self::InvalidAttribute { channel, .. } => channel,
        }
    }

    /// Name of the offending configuration attribute
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::MissingAttribute { attribute, .. } | Self::InvalidAttribute { attribute, .. } => {
                attribute
            }
            Self::InvalidPort { .. } => "port",
        }
    }
}

/// Main error type for session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
