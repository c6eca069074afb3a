//! Current-time sources for resolving relative dates.

use chrono::{DateTime, FixedOffset, Local, Utc};

/// Supplies "now" to the evaluator.
///
/// The returned offset decides where day boundaries fall for `today`,
/// `this-week` and plain `YYYY-MM-DD` dates.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }
}

/// The system clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock stopped at one instant, for tests and reproducible runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<FixedOffset>);

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        FixedClock(now)
    }

    pub fn utc(now: DateTime<Utc>) -> Self {
        FixedClock(now.fixed_offset())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
