//! Wall-clock sources for cadence decisions.

use std::cell::Cell;
use std::time::Instant;

/// Seconds on some monotonic timeline.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Monotonic seconds since the session started.
#[derive(Clone, Copy, Debug)]
pub struct SessionClock {
    start: Instant,
}

impl SessionClock {
    pub fn start() -> Self {
        SessionClock { start: Instant::now() }
    }
}

impl Default for SessionClock {
    fn default() -> Self { SessionClock::start() }
}

impl Clock for SessionClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn at(now: f64) -> Self {
        ManualClock { now: Cell::new(now) }
    }

    pub fn set(&self, now: f64) { self.now.set(now); }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 { self.now.get() }
}
