#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Wall-clock timer feeding real elapsed time into a [`Ticker`](super::Ticker).
pub struct Timer {
    last_update: Instant,
    /// Time since last tick
    pub delta: Duration,
    /// Ticks since creation or the last reset
    pub frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Creates a new timer starting from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_update: Instant::now(),
            delta: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Samples the clock and returns the time since the previous tick.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        self.delta = now - self.last_update;
        self.last_update = now;
        self.frame_count += 1;
        self.delta
    }

    /// Restarts timing so the next tick does not include a pause.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
