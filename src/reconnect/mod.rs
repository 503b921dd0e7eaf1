//! Reconnect delay strategies
//!
//! The transport owns the reconnect loop; strategies only answer "how long
//! should I wait before attempt `n`?". Strategies may be stateful (a jitter
//! generator, for example), so every session owns its own instance and
//! copies are made through [`ReconnectDelay::copy`], which never shares
//! runtime state with the original.

pub mod constant;
pub mod exponential;

pub use constant::ConstantDelay;
pub use exponential::ExponentialDelay;

use std::fmt;
use std::time::Duration;

/// Delay policy consulted between reconnect attempts
pub trait ReconnectDelay: fmt::Debug + Send + Sync {
    /// Wait before the reconnect attempt numbered `attempt` (starting at 0)
    fn delay(&mut self, attempt: u32) -> Duration;

    /// New strategy with the same parameters and fresh runtime state
    fn copy(&self) -> Box<dyn ReconnectDelay>;

    /// Return runtime state to its initial value after a successful connect
    fn reset(&mut self) {}
}

/// Strategy used when none is configured
pub fn default_strategy() -> Box<dyn ReconnectDelay> {
    Box::new(ConstantDelay::default())
}

/// Decision result for reconnection attempts
#[derive(Debug, Clone, PartialEq)]
pub enum ReconnectionDecision {
    /// Proceed with reconnection attempt after `delay`
    Proceed { attempt: u32, delay: Duration },
    /// Abort reconnection - shutdown requested
    AbortShutdownRequested,
    /// Abort reconnection - max attempts exceeded
    AbortMaxAttemptsExceeded,
}

impl ReconnectionDecision {
    pub fn should_proceed(&self) -> bool {
        matches!(self, ReconnectionDecision::Proceed { .. })
    }
}
