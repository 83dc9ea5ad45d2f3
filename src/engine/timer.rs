//! Poll timers and cancellation.
//!
//! The scheduler's loop is "wake, then wait one poll interval". Waiting is
//! behind [`PollTimer`] so tests can replace the sleep with a manual clock
//! step, including late or jittery wake-ups.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::io::clock::ManualClock;

pub trait PollTimer {
    /// Block (or pretend to) for roughly `interval`.
    fn wait(&mut self, interval: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepTimer;

impl PollTimer for SleepTimer {
    fn wait(&mut self, interval: Duration) {
        std::thread::sleep(interval);
    }
}

/// Advances a [`ManualClock`] instead of sleeping.
///
/// Each wait adds `interval` plus the next entry of the lateness pattern,
/// cycling. An empty pattern means every wake is on time.
#[derive(Debug, Clone)]
pub struct ManualTimer {
    clock: ManualClock,
    lateness: Vec<Duration>,
    next: usize,
    waits: usize,
}

impl ManualTimer {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            lateness: Vec::new(),
            next: 0,
            waits: 0,
        }
    }

    pub fn with_lateness(mut self, lateness: Vec<Duration>) -> Self {
        self.lateness = lateness;
        self
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn waits(&self) -> usize {
        self.waits
    }
}

impl PollTimer for ManualTimer {
    fn wait(&mut self, interval: Duration) {
        let mut step = interval;
        if !self.lateness.is_empty() {
            step += self.lateness[self.next % self.lateness.len()];
            self.next += 1;
        }
        self.waits += 1;
        self.clock.advance(step.as_secs_f64());
    }
}

/// Shared stop flag for one playback.
///
/// Clones share the flag. Once cancelled it stays cancelled; the scheduler
/// issues a fresh handle on every `play()`.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
