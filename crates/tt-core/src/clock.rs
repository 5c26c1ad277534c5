//! Source of "now" for session bookkeeping.

use std::cell::Cell;

use chrono::Duration;

use crate::time::Timestamp;

/// Provides the current time. Swapping the clock is how callers and tests
/// control what "now" means.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Local wall-clock time, truncated to whole seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<Timestamp>,
}

impl ManualClock {
    pub const fn new(now: Timestamp) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }

    /// Moves the clock forward by `duration`.
    ///
    /// # Panics
    ///
    /// Panics if the result is outside the representable range.
    pub fn advance(&self, duration: Duration) {
        let next = self
            .now
            .get()
            .checked_add(duration)
            .expect("manual clock overflowed");
        self.now.set(next);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
