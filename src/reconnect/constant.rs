use super::ReconnectDelay;
use std::time::Duration;

/// Same delay before every reconnect attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantDelay {
    interval: Duration,
}

impl ConstantDelay {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for ConstantDelay {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl ReconnectDelay for ConstantDelay {
    fn delay(&mut self, _attempt: u32) -> Duration {
        self.interval
    }

    fn copy(&self) -> Box<dyn ReconnectDelay> {
        Box::new(*self)
    }
}
