//! Monotonic time source
//!
//! The scheduling core only ever compares and subtracts time values, so
//! a `Clock` hands out plain milliseconds as `f64` rather than anything
//! richer. Keeping this behind a trait — rather than calling
//! `Instant::now()` directly from `Scheduler` — is what makes the six
//! documented scenarios (FIFO ordering, priority inversion, delay
//! promotion, continuations, yield-under-budget, cancellation)
//! reproducible: tests drive a `ManualClock` instead of real wall time.

use std::cell::Cell;
use std::time::Instant;

/// Monotonic time source, in milliseconds.
pub trait Clock {
    /// Current time, in milliseconds, relative to an arbitrary epoch
    /// fixed at the clock's creation. Only differences between two
    /// calls are meaningful.
    fn now_ms(&self) -> f64;
}

/// Production clock backed by `std::time::Instant`.
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// Test double that only advances when told to. Used by the scheduler's
/// own test suite and by integration tests to reproduce the documented
/// scenarios deterministically.
pub struct ManualClock {
    now_ms: Cell<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock { now_ms: Cell::new(0.0) }
    }

    pub fn set(&self, ms: f64) {
        self.now_ms.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }
}
