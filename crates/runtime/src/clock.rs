use std::time::{Duration, Instant};

/// Monotonic time source for the frame loop.
pub trait Clock {
    /// Time since some fixed origin. Must not decrease.
    fn now(&mut self) -> Duration;
}

/// Wall-clock time via [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for tests and headless runs.
///
/// With a non-zero step, every `now()` call first advances time by that step,
/// which makes each frame exactly `step` long.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: Duration,
    step: Duration,
}

impl ManualClock {
    /// A clock that only moves when told to.
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock that advances by `step` each time it is read.
    pub fn stepping(step: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            step,
        }
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Advance by `secs`; negative or non-finite values are ignored.
    pub fn advance_secs(&mut self, secs: f32) {
        if secs.is_finite() && secs > 0.0 {
            self.advance(Duration::from_secs_f32(secs));
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.now
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> Duration {
        self.now += self.step;
        self.now
    }
}
