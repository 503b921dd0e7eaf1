//! Transport collaborator
//!
//! The session core never opens sockets. This module is the seam where a
//! transport consumes [`SessionOptions`]: the [`SessionTransport`] trait makes
//! one connection attempt, and [`connect_with_retry`] drives the reconnect
//! loop using the session's own delay strategy and attempt counter.

pub mod mqtt;

pub use mqtt::{configure_mqtt_options, MqttTransport};

use crate::connect_span;
use crate::reconnect::ReconnectionDecision;
use crate::session::SessionOptions;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{error, info, warn, Instrument};

/// Transport errors
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Unsupported by this transport: {0}")]
    Unsupported(String),

    #[error("Failed to read TLS material from {}: {source}", path.display())]
    MaterialRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Connection rejected: {0}")]
    Rejected(String),

    #[error("ConnAck timeout after {0:?}")]
    Timeout(Duration),

    #[error("Gave up after {attempts} reconnect attempts, last error: {last_error}")]
    AttemptsExhausted { attempts: u32, last_error: String },

    #[error("Shutdown requested")]
    Shutdown,
}

impl TransportError {
    /// Whether another connection attempt could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportError::ConnectionFailed(_) | TransportError::Timeout(_)
        )
    }
}

/// One connection attempt against a broker
#[async_trait::async_trait]
pub trait SessionTransport: Send {
    /// Open a connection and wait until the broker accepts it
    async fn connect_once(&mut self, options: &SessionOptions) -> Result<(), TransportError>;
}

/// Connect, retrying retryable failures as the session's reconnect policy allows.
///
/// The attempt counter in `options` is reset once a connection succeeds.
/// Setting `shutdown` to `true` interrupts a pending delay.
pub async fn connect_with_retry<T>(
    transport: &mut T,
    options: &mut SessionOptions,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), TransportError>
where
    T: SessionTransport + ?Sized,
{
    let span = connect_span!(
        channel = %options.channel(),
        host = %options.hostname(),
        port = options.port()
    );

    async move {
        loop {
            let error = match transport.connect_once(options).await {
                Ok(()) => {
                    info!(
                        reconnect_attempts = options.reconnect_attempt(),
                        "Connected to broker"
                    );
                    options.reset_reconnect();
                    return Ok(());
                }
                Err(e) if !e.is_retryable() => {
                    error!("Connection attempt failed permanently: {}", e);
                    return Err(e);
                }
                Err(e) => e,
            };

            warn!("Connection attempt failed: {}", error);
            let shutdown_requested = *shutdown.borrow();
            match options.next_reconnect(shutdown_requested) {
                ReconnectionDecision::Proceed { attempt, delay } => {
                    info!(
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Waiting before reconnect"
                    );
                    if wait_or_shutdown(delay, &mut shutdown).await {
                        return Err(TransportError::Shutdown);
                    }
                }
                ReconnectionDecision::AbortShutdownRequested => {
                    return Err(TransportError::Shutdown);
                }
                ReconnectionDecision::AbortMaxAttemptsExceeded => {
                    error!(
                        attempts = options.reconnect_attempt(),
                        "Reconnect attempts exhausted"
                    );
                    return Err(TransportError::AttemptsExhausted {
                        attempts: options.reconnect_attempt(),
                        last_error: error.to_string(),
                    });
                }
            }
        }
    }
    .instrument(span)
    .await
}

/// Sleep for `delay`; returns true if shutdown was requested meanwhile
async fn wait_or_shutdown(delay: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return false,
            changed = shutdown.changed() => match changed {
                Ok(()) if *shutdown.borrow() => return true,
                Ok(()) => continue,
                // Sender gone: nobody can request shutdown any more
                Err(_) => {
                    (&mut sleep).await;
                    return false;
                }
            },
        }
    }
}
