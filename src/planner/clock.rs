//! Time source for deadline-bounded search
//!
//! Backtracking reads the clock at every recursion level. Tests swap in a
//! [`ManualClock`] so deadline behavior does not depend on machine speed.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait Clock: Debug + Send + Sync {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone)]
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
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock
///
/// Clones share the same time, so a test can keep a handle while the
/// generator owns another. With a non-zero tick every read advances time,
/// which simulates a slow search without sleeping.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    micros: Arc<AtomicU64>,
    tick_micros: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock that advances by `tick` on every read
    pub fn ticking(tick: Duration) -> Self {
        let clock = Self::new();
        clock.set_tick(tick);
        clock
    }

    pub fn advance(&self, by: Duration) {
        self.micros
            .fetch_add(by.as_micros() as u64, Ordering::SeqCst);
    }

    pub fn set_tick(&self, tick: Duration) {
        self.tick_micros
            .store(tick.as_micros() as u64, Ordering::SeqCst);
    }

    /// Current time without triggering a tick
    pub fn peek(&self) -> Duration {
        Duration::from_micros(self.micros.load(Ordering::SeqCst))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        let tick = self.tick_micros.load(Ordering::SeqCst);
        let before = self.micros.fetch_add(tick, Ordering::SeqCst);
        Duration::from_micros(before)
    }
}
