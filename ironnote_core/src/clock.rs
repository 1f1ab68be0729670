//! Wall-clock access for the catalog and workout store.
//!
//! Day boundaries and timestamp-derived identifiers both come from "now", so
//! the stores take a [`Clock`] instead of calling `Local::now()` directly.

use chrono::{DateTime, Duration, Local};
use std::cell::Cell;

pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// The real local clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A manually driven clock for simulating days in tests and scripts
#[derive(Clone, Debug)]
pub struct FixedClock {
    now: Cell<DateTime<Local>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Local>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_advances() {
        let start = Local.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        let clock = FixedClock::new(start);
        clock.advance(Duration::milliseconds(1500));
        assert_eq!(clock.now_millis(), start.timestamp_millis() + 1500);
    }
}
