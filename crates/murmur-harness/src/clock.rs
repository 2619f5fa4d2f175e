//! Test clocks: frozen, or moved forward by hand.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use murmur_app::Clock;

/// 2024-05-01T18:03:11Z as seconds since the epoch.
const DEFAULT_EPOCH_SECS: i64 = 1_714_586_591;

/// Clock that always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<FixedOffset>);

impl FixedClock {
    /// Freeze time at `at`.
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self(at)
    }

    /// The frozen instant.
    pub fn at(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

impl Default for FixedClock {
    /// 2024-05-01T18:03:11Z, which logs as `20240501T18:03:11Z`.
    fn default() -> Self {
        let at = DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(DEFAULT_EPOCH_SECS);
        Self(at.fixed_offset())
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Arc<Mutex<FixedClock>>);

impl ManualClock {
    /// Start at `at`.
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self(Arc::new(Mutex::new(FixedClock::new(at))))
    }

    /// Move time forward by `by`.
    pub fn advance(&self, by: TimeDelta) {
        let mut clock = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        *clock = FixedClock::new(clock.at() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).at()
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
