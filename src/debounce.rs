//! Trailing-edge debouncing over an injectable clock.
//!
//! A [`Debouncer`] holds at most one pending call. Scheduling replaces the
//! pending arguments and restarts the wait; [`Debouncer::poll`] releases the
//! arguments once the wait has elapsed without a newer schedule.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source.
pub trait Clock {
    /// Time elapsed since an arbitrary fixed epoch.
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Create a clock whose epoch is now.
    #[must_use]
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Hand-advanced clock; clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Create a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Collapses bursts of calls into one call with the last arguments.
#[derive(Debug)]
pub struct Debouncer<T, C: Clock> {
    wait: Duration,
    clock: C,
    pending: Option<(T, Duration)>,
}

impl<T, C: Clock> Debouncer<T, C> {
    /// Create a debouncer with the given quiet period.
    #[must_use]
    pub fn new(wait: Duration, clock: C) -> Self {
        Self { wait, clock, pending: None }
    }

    /// Quiet period.
    #[must_use]
    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Replace any pending call and restart the timer.
    pub fn schedule(&mut self, args: T) {
        let deadline = self.clock.now() + self.wait;
        self.pending = Some((args, deadline));
    }

    /// Returns true if a call is waiting to fire.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Arguments of the pending call, if any.
    #[must_use]
    pub fn last_args(&self) -> Option<&T> {
        self.pending.as_ref().map(|(args, _)| args)
    }

    /// Drop the pending call without firing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(args, _)| args)
    }

    /// Fire the pending call if its deadline has passed.
    pub fn poll(&mut self) -> Option<T> {
        let now = self.clock.now();
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.cancel(),
            _ => None,
        }
    }
}
