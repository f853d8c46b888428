//! Time sources for the store.

use chrono::{DateTime, Duration, Utc};
use domains::Clock;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

/// Wall clock that never hands out the same instant twice.
///
/// Stamps are strictly increasing at microsecond resolution, so a post edited
/// right after creation still gets `updated_at > created_at`.
#[derive(Debug, Default)]
pub struct SystemClock {
    last_micros: AtomicI64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now().timestamp_micros();
        let prev = self
            .last_micros
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |prev| {
                Some(wall.max(prev + 1))
            })
            .unwrap_or_else(|prev| prev);
        let next = wall.max(prev + 1);
        DateTime::from_timestamp_micros(next).unwrap_or_else(Utc::now)
    }
}

/// Deterministic clock: every call returns the current instant and then
/// advances it by `step`.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self::with_step(start, Duration::seconds(1))
    }

    pub fn with_step(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            current: Mutex::new(start),
            step,
        }
    }

    /// Moves the clock forward without consuming a tick.
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += by;
    }

    /// The instant the next call to `now` will return.
    pub fn peek(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        let now = *current;
        *current += self.step;
        now
    }
}
