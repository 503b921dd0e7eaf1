//! Session options aggregate
//!
//! [`SessionOptions`] is the validated value handed to the transport to open a
//! connection: the broker endpoint, client identity, keep-alive and will
//! parameters, the resolved TLS material and the reconnect delay strategy.
//!
//! Cloning a `SessionOptions` is the copy constructor used when deriving a new
//! session from a template: scalar fields are copied, resolved TLS material is
//! shared, and the reconnect strategy is copied through
//! [`ReconnectDelay::copy`] with the attempt counter starting over at zero.

pub mod builder;
pub mod will;

pub use builder::{
    SessionOptionsBuilder, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TLS_PORT, MAX_KEEP_ALIVE,
};
pub use will::{Qos, WillOptions};

use crate::config::ChannelConfig;
use crate::error::ConfigurationError;
use crate::reconnect::{ConstantDelay, ReconnectDelay, ReconnectionDecision};
use crate::security::{resolve_identity, resolve_trust, IdentityMaterial, Password, TrustMaterial};
use crate::session_span;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug)]
pub struct SessionOptions {
    channel: String,
    hostname: String,
    port: u16,
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
    will: WillOptions,
    ssl: bool,
    trust_all: bool,
    identity: Option<Arc<IdentityMaterial>>,
    trust: Option<Arc<TrustMaterial>>,
    max_reconnect_attempts: Option<u32>,
    reconnect_delay: Box<dyn ReconnectDelay>,
    /// Reconnect attempts made since the last successful connect
    reconnect_attempt: u32,
    unsubscribe_on_disconnect: bool,
}

impl SessionOptions {
    /// Start building options for the named channel
    pub fn builder<S: Into<String>>(channel: S) -> SessionOptionsBuilder {
        SessionOptionsBuilder::new(channel.into())
    }

    /// Build options from a channel configuration.
    ///
    /// Resolves the keystore and truststore first, so a misdeclared store
    /// fails here rather than at connect time.
    pub fn from_config(config: &ChannelConfig) -> Result<Self, ConfigurationError> {
        let _span = session_span!(channel = %config.name).entered();

        let identity = resolve_identity(config)?;
        let trust = resolve_trust(config)?;

        let max_reconnect_attempts = match config.reconnect_attempts {
            -1 => None,
            n if n >= 0 => Some(u32::try_from(n).unwrap_or(u32::MAX)),
            n => {
                return Err(ConfigurationError::invalid_attribute(
                    &config.name,
                    "reconnect_attempts",
                    format!("{n} must be -1 (unlimited) or a non-negative count"),
                ))
            }
        };

        let reconnect_delay = match &config.reconnect_delay {
            Some(section) => {
                section.validate(&config.name)?;
                section.build()
            }
            None => Box::new(ConstantDelay::new(Duration::from_secs(
                config.reconnect_interval_seconds,
            ))),
        };

        let mut builder = SessionOptions::builder(config.name.as_str())
            .hostname(config.host.as_str())
            .auto_generated_client_id(config.auto_generated_client_id)
            .clean_session(config.auto_clean_session)
            .auto_keep_alive(config.auto_keep_alive)
            .keep_alive(Duration::from_secs(config.keep_alive_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .max_inflight_queue(config.max_inflight_queue)
            .will_flag(config.will_flag)
            .will_qos(config.will_qos)
            .will_retain(config.will_retain)
            .ssl(config.ssl.enabled)
            .trust_all(config.ssl.trust_all)
            .identity(identity)
            .trust(trust)
            .max_reconnect_attempts(max_reconnect_attempts)
            .reconnect_delay(reconnect_delay)
            .unsubscribe_on_disconnect(config.unsubscribe_on_disconnect);

        if let Some(port) = config.port {
            builder = builder.port(port);
        }
        if let Some(server_name) = &config.server_name {
            builder = builder.server_name(server_name.as_str());
        }
        if let Some(client_id) = &config.client_id {
            builder = builder.client_id(client_id.as_str());
        }
        if let Some(username) = &config.username {
            builder = builder.username(username.as_str());
        }
        if let Some(password) = &config.password {
            builder = builder.password(password.as_str());
        }
        if let Some(max) = config.max_message_size {
            builder = builder.max_message_size(max);
        }
        if let Some(topic) = &config.will_topic {
            builder = builder.will_topic(topic.as_str());
        }
        if let Some(message) = &config.will_message {
            builder = builder.will_message(message.as_bytes());
        }

        let options = builder.build()?;
        info!(
            host = %options.hostname,
            port = options.port,
            ssl = options.ssl,
            client_auth = options.identity.is_some(),
            "Session options ready"
        );
        Ok(options)
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Address used for the socket connection
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Explicit TLS server name override, if any
    pub fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }

    /// Name the broker certificate is verified against
    pub fn tls_server_name(&self) -> &str {
        self.server_name.as_deref().unwrap_or(&self.hostname)
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn auto_generated_client_id(&self) -> bool {
        self.auto_generated_client_id
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&Password> {
        self.password.as_ref()
    }

    pub fn clean_session(&self) -> bool {
        self.clean_session
    }

    pub fn auto_keep_alive(&self) -> bool {
        self.auto_keep_alive
    }

    pub fn keep_alive(&self) -> Duration {
        self.keep_alive
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn max_inflight_queue(&self) -> u16 {
        self.max_inflight_queue
    }

    pub fn max_message_size(&self) -> Option<usize> {
        self.max_message_size
    }

    pub fn will(&self) -> &WillOptions {
        &self.will
    }

    pub fn ssl(&self) -> bool {
        self.ssl
    }

    pub fn trust_all(&self) -> bool {
        self.trust_all
    }

    pub fn identity(&self) -> Option<&Arc<IdentityMaterial>> {
        self.identity.as_ref()
    }

    pub fn trust(&self) -> Option<&Arc<TrustMaterial>> {
        self.trust.as_ref()
    }

    pub fn max_reconnect_attempts(&self) -> Option<u32> {
        self.max_reconnect_attempts
    }

    pub fn reconnect_delay(&self) -> &dyn ReconnectDelay {
        self.reconnect_delay.as_ref()
    }

    pub fn unsubscribe_on_disconnect(&self) -> bool {
        self.unsubscribe_on_disconnect
    }

    /// Reconnect attempts made since the last successful connect
    pub fn reconnect_attempt(&self) -> u32 {
        self.reconnect_attempt
    }

    /// Decide whether and when to attempt the next reconnect.
    ///
    /// A `Proceed` decision consumes one attempt; its `attempt` field is
    /// 1-based while the strategy is asked for the 0-based attempt index.
    pub fn next_reconnect(&mut self, shutdown_requested: bool) -> ReconnectionDecision {
        if shutdown_requested {
            return ReconnectionDecision::AbortShutdownRequested;
        }

        if let Some(max_attempts) = self.max_reconnect_attempts {
            if self.reconnect_attempt >= max_attempts {
                return ReconnectionDecision::AbortMaxAttemptsExceeded;
            }
        }

        let index = self.reconnect_attempt;
        let delay = self.reconnect_delay.delay(index);
        self.reconnect_attempt = index.saturating_add(1);
        debug!(
            channel = %self.channel,
            attempt = self.reconnect_attempt,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "Scheduling reconnect"
        );
        ReconnectionDecision::Proceed {
            attempt: self.reconnect_attempt,
            delay,
        }
    }

    /// Start counting from zero again after a successful connect
    pub fn reset_reconnect(&mut self) {
        self.reconnect_attempt = 0;
        self.reconnect_delay.reset();
    }

    /// JSON view of the options without secrets
    pub fn summary(&self) -> serde_json::Value {
        json!({
            "channel": self.channel,
            "hostname": self.hostname,
            "port": self.port,
            "tls_server_name": self.tls_server_name(),
            "client_id": self.client_id,
            "auto_generated_client_id": self.auto_generated_client_id,
            "username": self.username,
            "password_set": self.password.is_some(),
            "clean_session": self.clean_session,
            "auto_keep_alive": self.auto_keep_alive,
            "keep_alive_seconds": self.keep_alive.as_secs(),
            "connect_timeout_seconds": self.connect_timeout.as_secs(),
            "max_inflight_queue": self.max_inflight_queue,
            "max_message_size": self.max_message_size,
            "will": {
                "flag": self.will.flag,
                "topic": self.will.topic,
                "qos": u8::from(self.will.qos),
                "retain": self.will.retain,
            },
            "ssl": self.ssl,
            "trust_all": self.trust_all,
            "keystore_type": self.identity.as_ref().map(|m| m.store_type().as_str()),
            "truststore_type": self.trust.as_ref().map(|m| m.store_type().as_str()),
            "max_reconnect_attempts": self.max_reconnect_attempts,
            "reconnect_delay": format!("{:?}", self.reconnect_delay),
            "unsubscribe_on_disconnect": self.unsubscribe_on_disconnect,
        })
    }
}

impl Clone for SessionOptions {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
            hostname: self.hostname.clone(),
            port: self.port,
            server_name: self.server_name.clone(),
            client_id: self.client_id.clone(),
            auto_generated_client_id: self.auto_generated_client_id,
            username: self.username.clone(),
            password: self.password.clone(),
            clean_session: self.clean_session,
            auto_keep_alive: self.auto_keep_alive,
            keep_alive: self.keep_alive,
            connect_timeout: self.connect_timeout,
            max_inflight_queue: self.max_inflight_queue,
            max_message_size: self.max_message_size,
            will: self.will.clone(),
            ssl: self.ssl,
            trust_all: self.trust_all,
            identity: self.identity.clone(),
            trust: self.trust.clone(),
            max_reconnect_attempts: self.max_reconnect_attempts,
            reconnect_delay: self.reconnect_delay.copy(),
            reconnect_attempt: 0,
            unsubscribe_on_disconnect: self.unsubscribe_on_disconnect,
        }
    }
}
