//! Time budget guard: when to stop and checkpoint instead of fetching.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::ports::clock::Clock;

/// Default ceiling: a safety margin under the executing environment's hard
/// wall-clock limit, leaving room to flush results and progress.
pub const DEFAULT_BUDGET: Duration = Duration::from_secs(750);

/// Tracks elapsed wall-clock time against a fixed ceiling.
///
/// Checked before every remote attempt, including retries of the same task,
/// since retries and their sleeps consume budget too. Expiry is not an
/// error; it is how an invocation hands off to the next one.
pub struct TimeBudgetGuard {
    clock: Arc<dyn Clock>,
    started_at: Instant,
    ceiling: Duration,
}

impl TimeBudgetGuard {
    pub fn new(clock: Arc<dyn Clock>, ceiling: Duration) -> Self {
        let started_at = clock.now();
        Self {
            clock,
            started_at,
            ceiling,
        }
    }

    pub fn expired(&self) -> bool {
        self.clock.now().duration_since(self.started_at) >= self.ceiling
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.now().duration_since(self.started_at)
    }
}
