//! Retry pacing: decides how long to wait after a failed fetch.

use std::time::Duration;

/// Soft-landing rate governor for the remote service.
///
/// Additive increase on every failure (no cap), linear decrease on every
/// success, floored at one second. The remote's instantaneous tolerance is
/// unknown, so the policy backs off steadily after a burst of errors and
/// recovers quickly once calls start landing again.
#[derive(Debug, Clone)]
pub struct RetryPacing {
    delay_secs: u64,
}

impl RetryPacing {
    pub fn new() -> Self {
        Self { delay_secs: 1 }
    }

    /// Grow the delay and return how long to sleep before the retry.
    pub fn after_failure(&mut self) -> Duration {
        self.delay_secs += 1;
        Duration::from_secs(self.delay_secs)
    }

    /// Shrink the delay toward the floor after a successful call.
    pub fn after_success(&mut self) {
        self.delay_secs = self.delay_secs.saturating_sub(1).max(1);
    }

    pub fn current_delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

impl Default for RetryPacing {
    fn default() -> Self {
        Self::new()
    }
}
