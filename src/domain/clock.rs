//! Injected time source.
//!
//! The ledger never reads the wall clock directly; it asks a [`Clock`] for
//! a nanosecond timestamp so hosts and tests control time.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Monotonically non-decreasing nanosecond clock.
pub trait Clock: fmt::Debug + Send + Sync {
    /// Returns the current time in nanoseconds since the Unix epoch.
    /// Successive calls never go backwards.
    fn now_nanos(&self) -> u64;
}

/// Wall clock backed by [`chrono::Utc::now`].
///
/// Readings are clamped to the largest value already returned, so a
/// wall-clock step backwards never produces a decreasing timestamp.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: AtomicU64,
}

impl SystemClock {
    /// Creates a system clock.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }
}

impl Clock for SystemClock {
    fn now_nanos(&self) -> u64 {
        let wall = Utc::now()
            .timestamp_nanos_opt()
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(0);
        let previous = self.last.fetch_max(wall, Ordering::AcqRel);
        previous.max(wall)
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Creates a clock frozen at `start` nanoseconds.
    #[must_use]
    pub const fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    /// Moves the clock forward by `nanos`, saturating at `u64::MAX`.
    pub fn advance(&self, nanos: u64) {
        let _ = self
            .now
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                Some(n.saturating_add(nanos))
            });
    }

    /// Sets the clock to `nanos`. Earlier values are ignored so the clock
    /// stays non-decreasing.
    pub fn set(&self, nanos: u64) {
        self.now.fetch_max(nanos, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now_nanos(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}
