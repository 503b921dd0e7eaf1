//! Declarative channel configuration
//!
//! A configuration file holds one `[channels.<name>]` table per MQTT channel.
//! Parsing only maps keys onto typed fields; every semantic check happens when
//! the channel is turned into [`SessionOptions`](crate::session::SessionOptions).

use crate::error::{ConfigurationError, SessionError, SessionResult};
use crate::reconnect::{ConstantDelay, ExponentialDelay, ReconnectDelay};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Top-level configuration document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConnectorConfig {
    #[serde(default)]
    pub channels: BTreeMap<String, ChannelConfig>,
}

/// Configuration of a single MQTT channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelConfig {
    /// Channel name, taken from the table key
    #[serde(skip)]
    pub name: String,
    /// Broker host used for the socket connection
    pub host: String,
    /// Broker port (defaults to 1883, or 8883 with SSL)
    pub port: Option<i64>,
    /// Host name checked against the broker certificate, if different from `host`
    pub server_name: Option<String>,
    pub client_id: Option<String>,
    pub auto_generated_client_id: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub auto_clean_session: bool,
    pub auto_keep_alive: bool,
    pub keep_alive_seconds: u64,
    pub connect_timeout_seconds: u64,
    pub max_inflight_queue: u16,
    /// Maximum MQTT packet size in bytes (transport default when unset)
    pub max_message_size: Option<usize>,
    /// Maximum reconnect attempts, `-1` for unlimited
    pub reconnect_attempts: i64,
    /// Delay of the default constant reconnect strategy
    pub reconnect_interval_seconds: u64,
    pub reconnect_delay: Option<ReconnectDelaySection>,
    pub unsubscribe_on_disconnect: bool,
    pub will_flag: bool,
    pub will_qos: u8,
    pub will_retain: bool,
    pub will_topic: Option<String>,
    pub will_message: Option<String>,
    pub ssl: SslSection,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            host: "localhost".to_string(),
            port: None,
            server_name: None,
            client_id: None,
            auto_generated_client_id: true,
            username: None,
            password: None,
            auto_clean_session: true,
            auto_keep_alive: true,
            keep_alive_seconds: 30,
            connect_timeout_seconds: 60,
            max_inflight_queue: 10,
            max_message_size: None,
            reconnect_attempts: 5,
            reconnect_interval_seconds: 1,
            reconnect_delay: None,
            unsubscribe_on_disconnect: false,
            will_flag: false,
            will_qos: 0,
            will_retain: false,
            will_topic: None,
            will_message: None,
            ssl: SslSection::default(),
        }
    }
}

impl ChannelConfig {
    /// Default configuration for the named channel
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// `[channels.<name>.ssl]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SslSection {
    pub enabled: bool,
    pub trust_all: bool,
    pub keystore: StoreSection,
    pub truststore: StoreSection,
}

/// Keystore or truststore declaration
///
/// For PEM keystores `location` is the certificate path and `password` is the
/// private key path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub store_type: String,
    pub password: Option<String>,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            location: None,
            store_type: "pkcs12".to_string(),
            password: None,
        }
    }
}

/// `[channels.<name>.reconnect_delay]` table, tagged by `strategy`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum ReconnectDelaySection {
    Constant {
        delay_ms: u64,
    },
    Exponential {
        initial_delay_ms: u64,
        max_delay_ms: u64,
        #[serde(default = "default_multiplier")]
        multiplier: f64,
        #[serde(default)]
        jitter: f64,
        #[serde(default)]
        seed: Option<u64>,
    },
}

fn default_multiplier() -> f64 {
    2.0
}

impl ReconnectDelaySection {
    /// Validate strategy parameters for the given channel
    pub fn validate(&self, channel: &str) -> Result<(), ConfigurationError> {
        if let ReconnectDelaySection::Exponential {
            initial_delay_ms,
            max_delay_ms,
            multiplier,
            jitter,
            ..
        } = self
        {
            if !multiplier.is_finite() || *multiplier < 1.0 {
                return Err(ConfigurationError::invalid_attribute(
                    channel,
                    "reconnect_delay.multiplier",
                    format!("{multiplier} must be a finite value >= 1.0"),
                ));
            }
            if !(0.0..=1.0).contains(jitter) {
                return Err(ConfigurationError::invalid_attribute(
                    channel,
                    "reconnect_delay.jitter",
                    format!("{jitter} must be between 0.0 and 1.0"),
                ));
            }
            if max_delay_ms < initial_delay_ms {
                return Err(ConfigurationError::invalid_attribute(
                    channel,
                    "reconnect_delay.max_delay_ms",
                    format!("{max_delay_ms} is lower than initial_delay_ms {initial_delay_ms}"),
                ));
            }
        }
        Ok(())
    }

    /// Build the configured strategy
    pub fn build(&self) -> Box<dyn ReconnectDelay> {
        match self {
            ReconnectDelaySection::Constant { delay_ms } => {
                Box::new(ConstantDelay::new(Duration::from_millis(*delay_ms)))
            }
            ReconnectDelaySection::Exponential {
                initial_delay_ms,
                max_delay_ms,
                multiplier,
                jitter,
                seed,
            } => {
                let mut delay = ExponentialDelay::new(
                    Duration::from_millis(*initial_delay_ms),
                    Duration::from_millis(*max_delay_ms),
                    *multiplier,
                )
                .with_jitter(*jitter);
                if let Some(seed) = seed {
                    delay = delay.with_seed(*seed);
                }
                Box::new(delay)
            }
        }
    }
}

impl ConnectorConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> SessionResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text and name each channel after its table key
    pub fn from_toml_str(content: &str) -> SessionResult<Self> {
        let mut config: ConnectorConfig = toml::from_str(content)?;
        for (name, channel) in config.channels.iter_mut() {
            channel.name = name.clone();
        }
        Ok(config)
    }

    /// Look up a channel by name
    pub fn channel(&self, name: &str) -> SessionResult<&ChannelConfig> {
        self.channels
            .get(name)
            .ok_or_else(|| SessionError::UnknownChannel(name.to_string()))
    }

    /// Create a test configuration for unit testing
    #[cfg(test)]
    pub fn test_config() -> Self {
        let toml_content = r#"
[channels.telemetry]
host = "broker.local"

[channels.secure]
host = "10.0.0.5"
server_name = "broker.example.com"

[channels.secure.ssl]
enabled = true

[channels.secure.ssl.truststore]
location = "/certs/ca.crt"
type = "pem"
"#;
        Self::from_toml_str(toml_content).expect("Test config should parse")
    }
}
