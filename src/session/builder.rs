//! Builder for [`SessionOptions`]
//!
//! Setters only record values; every check runs in [`SessionOptionsBuilder::build`].

use super::will::{Qos, WillOptions};
use super::SessionOptions;
use crate::error::ConfigurationError;
use crate::reconnect::{default_strategy, ReconnectDelay};
use crate::security::{IdentityMaterial, Password, TrustMaterial};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 1883;
pub const DEFAULT_TLS_PORT: u16 = 8883;
/// Keep-alive is a 16-bit count of seconds on the wire
pub const MAX_KEEP_ALIVE: Duration = Duration::from_secs(u16::MAX as u64);

#[derive(Debug)]
pub struct SessionOptionsBuilder {
    channel: String,
    hostname: String,
    port: Option<i64>,
    server_name: Option<String>,
    client_id: Option<String>,
    auto_generated_client_id: bool,
    username: Option<String>,
    password: Option<Password>,
    clean_session: bool,
    auto_keep_alive: bool,
    keep_alive: Duration,
    connect_timeout: Duration,
    max_inflight_queue: u16,
    max_message_size: Option<usize>,
    will_flag: bool,
    will_topic: Option<String>,
    will_message: Vec<u8>,
    will_qos: u8,
    will_retain: bool,
    ssl: bool,
    trust_all: bool,
    identity: Option<IdentityMaterial>,
    trust: Option<TrustMaterial>,
    max_reconnect_attempts: Option<u32>,
    reconnect_delay: Box<dyn ReconnectDelay>,
    unsubscribe_on_disconnect: bool,
}

impl SessionOptionsBuilder {
    pub(super) fn new(channel: String) -> Self {
        Self {
            channel,
            hostname: DEFAULT_HOST.to_string(),
            port: None,
            server_name: None,
            client_id: None,
            auto_generated_client_id: true,
            username: None,
            password: None,
            clean_session: true,
            auto_keep_alive: true,
            keep_alive: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(60),
            max_inflight_queue: 10,
            max_message_size: None,
            will_flag: false,
            will_topic: None,
            will_message: Vec::new(),
            will_qos: 0,
            will_retain: false,
            ssl: false,
            trust_all: false,
            identity: None,
            trust: None,
            max_reconnect_attempts: Some(5),
            reconnect_delay: default_strategy(),
            unsubscribe_on_disconnect: false,
        }
    }

    /// Host used for the socket connection
    pub fn hostname<S: Into<String>>(mut self, hostname: S) -> Self {
        self.hostname = hostname.into();
        self
    }

    /// Broker port, validated by `build()`
    pub fn port(mut self, port: i64) -> Self {
        self.port = Some(port);
        self
    }

    /// Host name verified against the broker certificate instead of `hostname`
    pub fn server_name<S: Into<String>>(mut self, server_name: S) -> Self {
        self.server_name = Some(server_name.into());
        self
    }

    pub fn client_id<S: Into<String>>(mut self, client_id: S) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn auto_generated_client_id(mut self, enabled: bool) -> Self {
        self.auto_generated_client_id = enabled;
        self
    }

    pub fn username<S: Into<String>>(mut self, username: S) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password<S: Into<String>>(mut self, password: S) -> Self {
        self.password = Some(Password::new(password));
        self
    }

    pub fn clean_session(mut self, clean_session: bool) -> Self {
        self.clean_session = clean_session;
        self
    }

    pub fn auto_keep_alive(mut self, enabled: bool) -> Self {
        self.auto_keep_alive = enabled;
        self
    }

    pub fn keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn max_inflight_queue(mut self, max: u16) -> Self {
        self.max_inflight_queue = max;
        self
    }

    pub fn max_message_size(mut self, max: usize) -> Self {
        self.max_message_size = Some(max);
        self
    }

    pub fn will_flag(mut self, flag: bool) -> Self {
        self.will_flag = flag;
        self
    }

    pub fn will_topic<S: Into<String>>(mut self, topic: S) -> Self {
        self.will_topic = Some(topic.into());
        self
    }

    pub fn will_message<B: Into<Vec<u8>>>(mut self, message: B) -> Self {
        self.will_message = message.into();
        self
    }

    /// Will QoS level, validated by `build()`
    pub fn will_qos(mut self, qos: u8) -> Self {
        self.will_qos = qos;
        self
    }

    pub fn will_retain(mut self, retain: bool) -> Self {
        self.will_retain = retain;
        self
    }

    pub fn ssl(mut self, enabled: bool) -> Self {
        self.ssl = enabled;
        self
    }

    pub fn trust_all(mut self, trust_all: bool) -> Self {
        self.trust_all = trust_all;
        self
    }

    pub fn identity(mut self, identity: Option<IdentityMaterial>) -> Self {
        self.identity = identity;
        self
    }

    pub fn trust(mut self, trust: Option<TrustMaterial>) -> Self {
        self.trust = trust;
        self
    }

    /// Reconnect attempts allowed after a dropped connection, `None` for unlimited
    pub fn max_reconnect_attempts(mut self, max: Option<u32>) -> Self {
        self.max_reconnect_attempts = max;
        self
    }

    pub fn reconnect_delay(mut self, strategy: Box<dyn ReconnectDelay>) -> Self {
        self.reconnect_delay = strategy;
        self
    }

    pub fn unsubscribe_on_disconnect(mut self, enabled: bool) -> Self {
        self.unsubscribe_on_disconnect = enabled;
        self
    }

    /// Validate and produce the session options
    pub fn build(self) -> Result<SessionOptions, ConfigurationError> {
        let port = match self.port {
            None if self.ssl => DEFAULT_TLS_PORT,
            None => DEFAULT_PORT,
            Some(port) => u16::try_from(port)
                .ok()
                .filter(|port| *port != 0)
                .ok_or_else(|| ConfigurationError::InvalidPort {
                    channel: self.channel.clone(),
                    port,
                })?,
        };

        let will_qos = Qos::try_from(self.will_qos).map_err(|qos| {
            ConfigurationError::invalid_attribute(
                &self.channel,
                "will_qos",
                format!("{qos} must be 0, 1 or 2"),
            )
        })?;

        if self.keep_alive > MAX_KEEP_ALIVE {
            return Err(ConfigurationError::invalid_attribute(
                &self.channel,
                "keep_alive_seconds",
                format!(
                    "{}s exceeds the MQTT maximum of {}s",
                    self.keep_alive.as_secs(),
                    MAX_KEEP_ALIVE.as_secs()
                ),
            ));
        }

        if self.hostname.trim().is_empty() {
            return Err(ConfigurationError::invalid_attribute(
                &self.channel,
                "host",
                "must not be empty",
            ));
        }

        Ok(SessionOptions {
            channel: self.channel,
            hostname: self.hostname,
            port,
            server_name: self.server_name,
            client_id: self.client_id,
            auto_generated_client_id: self.auto_generated_client_id,
            username: self.username,
            password: self.password,
            clean_session: self.clean_session,
            auto_keep_alive: self.auto_keep_alive,
            keep_alive: self.keep_alive,
            connect_timeout: self.connect_timeout,
            max_inflight_queue: self.max_inflight_queue,
            max_message_size: self.max_message_size,
            will: WillOptions {
                flag: self.will_flag,
                topic: self.will_topic,
                message: self.will_message,
                qos: will_qos,
                retain: self.will_retain,
            },
            ssl: self.ssl,
            trust_all: self.trust_all,
            identity: self.identity.map(Arc::new),
            trust: self.trust.map(Arc::new),
            max_reconnect_attempts: self.max_reconnect_attempts,
            reconnect_delay: self.reconnect_delay,
            reconnect_attempt: 0,
            unsubscribe_on_disconnect: self.unsubscribe_on_disconnect,
        })
    }
}
