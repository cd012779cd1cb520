//! Frame Tick Scheduling
//!
//! [`Scheduler`] is the capability a sprite registers with while it plays.
//! [`Ticker`] is the stock implementation: the host drives it once per frame,
//! either with a ready-made delta ([`Ticker::tick`]), a wall-clock duration
//! ([`Ticker::tick_elapsed`]) or its internal [`Timer`] ([`Ticker::update`]).
//!
//! # Delta units
//!
//! Deltas are expressed in frames of the configured target rate: at 60 FPS a
//! 16.6ms frame yields a delta of `1.0`, scaled by the ticker speed.
//!
//! # Re-entrancy
//!
//! Listeners are dispatched from a snapshot taken without holding the
//! listener lock, so a listener may add or remove registrations (including
//! its own) from inside `tick`.

#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Duration;

use std::sync::Weak;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::errors::Result;
use crate::utils::time::Timer;

new_key_type! {
    /// Registration handle returned by [`Scheduler::add`].
    pub struct ListenerKey;
}

/// Receiver of per-frame ticks.
pub trait TickListener: Send + Sync {
    /// Called once per scheduler tick with the elapsed delta in frames.
    fn tick(&self, delta: f32);
}

/// Tick source a listener registers with while active.
///
/// Only weak references are held, so a registration never keeps its listener
/// alive.
pub trait Scheduler: Send + Sync {
    fn add(&self, listener: Weak<dyn TickListener>) -> ListenerKey;

    /// Returns `false` if the key was not registered.
    fn remove(&self, key: ListenerKey) -> bool;
}

/// Ticker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Frame rate a delta of `1.0` corresponds to.
    pub target_fps: f32,
    /// Lowest frame rate honored; longer frames are clamped to `1 / min_fps`.
    pub min_fps: f32,
    /// Multiplier applied to every delta.
    pub speed: f32,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            target_fps: 60.0,
            min_fps: 10.0,
            speed: 1.0,
        }
    }
}

impl TickerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Converts wall-clock time into a frame delta.
    #[must_use]
    pub fn frame_delta(&self, elapsed: Duration) -> f32 {
        let mut elapsed_ms = elapsed.as_secs_f32() * 1000.0;
        if self.min_fps > 0.0 {
            elapsed_ms = elapsed_ms.min(1000.0 / self.min_fps);
        }
        let target_ms = 1000.0 / self.target_fps.max(f32::EPSILON);
        elapsed_ms * self.speed / target_ms
    }
}

/// Shared frame tick dispatcher.
pub struct Ticker {
    config: RwLock<TickerConfig>,
    listeners: RwLock<SlotMap<ListenerKey, Weak<dyn TickListener>>>,
    timer: Mutex<Timer>,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(TickerConfig::default())
    }
}

impl Ticker {
    #[must_use]
    pub fn new(config: TickerConfig) -> Self {
        Self {
            config: RwLock::new(config),
            listeners: RwLock::new(SlotMap::with_key()),
            timer: Mutex::new(Timer::new()),
        }
    }

    #[must_use]
    pub fn config(&self) -> TickerConfig {
        self.config.read().clone()
    }

    #[must_use]
    pub fn speed(&self) -> f32 {
        self.config.read().speed
    }

    pub fn set_speed(&self, speed: f32) {
        self.config.write().speed = speed;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: ListenerKey) -> bool {
        self.listeners.read().contains_key(key)
    }

    /// Dispatches `delta` to every registered listener.
    pub fn tick(&self, delta: f32) {
        let snapshot: SmallVec<[Weak<dyn TickListener>; 8]> =
            self.listeners.read().values().cloned().collect();

        log::trace!("Ticker: dispatching delta {delta} to {} listeners", snapshot.len());

        let mut dead = 0;
        for listener in &snapshot {
            match listener.upgrade() {
                Some(listener) => listener.tick(delta),
                None => dead += 1,
            }
        }

        if dead > 0 {
            self.listeners.write().retain(|_, l| l.strong_count() > 0);
            log::warn!("Ticker: purged {dead} dropped listener(s) that were never removed");
        }
    }

    /// Converts `elapsed` into a frame delta and dispatches it.
    pub fn tick_elapsed(&self, elapsed: Duration) {
        let delta = self.config.read().frame_delta(elapsed);
        self.tick(delta);
    }

    /// Samples the internal timer and dispatches the elapsed time.
    pub fn update(&self) {
        let elapsed = self.timer.lock().tick();
        self.tick_elapsed(elapsed);
    }

    /// Restarts the internal timer, e.g. after the host was suspended.
    pub fn reset_timer(&self) {
        self.timer.lock().reset();
    }
}

impl Scheduler for Ticker {
    fn add(&self, listener: Weak<dyn TickListener>) -> ListenerKey {
        self.listeners.write().insert(listener)
    }

    fn remove(&self, key: ListenerKey) -> bool {
        self.listeners.write().remove(key).is_some()
    }
}
