//! Clocks and one-shot timers.
//!
//! Playback and autosave never sleep or spawn timers. They record a single
//! deadline in a [`OneShotTimer`] and are driven by `poll(now)` calls against
//! an injectable [`Clock`], so tests can advance time deterministically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Source of monotonic time in milliseconds.
pub trait Clock {
    /// Milliseconds elapsed since the clock's origin.
    fn now_ms(&self) -> u64;
}

/// Wall clock backed by [`Instant`].
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
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Manually advanced clock for tests and offline rendering.
///
/// Clones share the same time source.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    /// Sets the absolute time.
    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// A single outstanding deadline.
///
/// Scheduling replaces any previous deadline, so there is never more than one
/// pending wake per owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneShotTimer {
    due_at: Option<u64>,
}

impl OneShotTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer to fire `delay_ms` after `now`, replacing any pending deadline.
    pub fn schedule(&mut self, now: u64, delay_ms: u64) {
        self.due_at = Some(now.saturating_add(delay_ms));
    }

    /// Disarms the timer.
    pub fn cancel(&mut self) {
        self.due_at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due_at.is_some()
    }

    /// The pending deadline, if any.
    pub fn due_at(&self) -> Option<u64> {
        self.due_at
    }

    /// Returns true and disarms if the deadline has passed.
    pub fn fire_if_due(&mut self, now: u64) -> bool {
        match self.due_at {
            Some(due) if now >= due => {
                self.due_at = None;
                true
            }
            _ => false,
        }
    }
}
