//! MQTT Session - client session configuration for MQTT channels
//!
//! Turns per-channel connector configuration into validated, transport-ready
//! session options for a single MQTT client connection.
//!
//! # Overview
//!
//! - Channel configuration loaded from TOML
//! - TLS credential resolution (JKS, PEM, PKCS#12 keystores and truststores)
//! - Pluggable reconnect delay strategies (constant, exponential with jitter)
//! - The `SessionOptions` aggregate with copy semantics for reuse as a template
//! - A rumqttc transport adapter with a retrying connect loop
//!
//! # Quick Start
//!
//! ```rust
//! use mqtt_session::config::ConnectorConfig;
//! use mqtt_session::session::SessionOptions;
//!
//! let config = ConnectorConfig::from_toml_str(
//!     r#"
//!     [channels.telemetry]
//!     host = "broker.local"
//!     reconnect_attempts = 3
//!
//!     [channels.telemetry.reconnect_delay]
//!     strategy = "exponential"
//!     initial_delay_ms = 100
//!     max_delay_ms = 5000
//!     "#,
//! )
//! .unwrap();
//!
//! let channel = config.channel("telemetry").unwrap();
//! let mut options = SessionOptions::from_config(channel).unwrap();
//! assert_eq!(options.port(), 1883);
//!
//! // A copy starts with its own reconnect state
//! let template = options.clone();
//! assert!(options.next_reconnect(false).should_proceed());
//! assert_eq!(template.reconnect_attempt(), 0);
//! ```

pub mod config;
pub mod error;
pub mod observability;
pub mod reconnect;
pub mod security;
pub mod session;
pub mod transport;

pub use config::{ChannelConfig, ConnectorConfig};
pub use error::{ConfigurationError, SessionError, SessionResult};
pub use reconnect::{ConstantDelay, ExponentialDelay, ReconnectDelay, ReconnectionDecision};
pub use security::{resolve_identity, resolve_trust, IdentityMaterial, TrustMaterial};
pub use session::{SessionOptions, SessionOptionsBuilder};
pub use transport::{connect_with_retry, MqttTransport, SessionTransport, TransportError};
