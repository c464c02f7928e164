//! Profiling event recorder
//!
//! `ProfilingSink` is the abstract contract; `BufferProfiler` is the
//! concrete growable-`i32`-buffer implementation. Event tags and field
//! layouts are a fixed external contract (downstream trace viewers
//! parse this exact format), not something this crate is free to
//! redesign.

use priosched_core::{serr, swarn, SchedError, SchedResult};
use std::sync::atomic::{AtomicU64, Ordering};

/// Event tag values, fixed by the external trace format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum EventTag {
    TaskStart = 1,
    TaskComplete = 2,
    TaskError = 3,
    TaskCancel = 4,
    TaskRun = 5,
    TaskYield = 6,
    SchedulerSuspend = 7,
    SchedulerResume = 8,
}

/// Process-wide monotonic counters. Multiple `Scheduler` instances in
/// one process must not collide on `run_id`/`main_thread_id` even
/// though each scheduler itself is single-threaded.
static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_MAIN_THREAD_ID: AtomicU64 = AtomicU64::new(1);

pub fn next_run_id() -> u64 {
    NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed)
}

pub fn next_main_thread_id() -> u64 {
    NEXT_MAIN_THREAD_ID.fetch_add(1, Ordering::Relaxed)
}

/// Abstract profiling event recorder.
///
/// All timestamps passed in are milliseconds; implementations convert
/// to microseconds (`ms * 1000`) before recording, per the external
/// event format.
pub trait ProfilingSink {
    fn task_start(&mut self, time_ms: f64, task_id: u64, priority_level: u8);
    fn task_complete(&mut self, time_ms: f64, task_id: u64);
    fn task_error(&mut self, time_ms: f64, task_id: u64);
    fn task_cancel(&mut self, time_ms: f64, task_id: u64);
    fn task_run(&mut self, time_ms: f64, task_id: u64, run_id: u64);
    fn task_yield(&mut self, time_ms: f64, task_id: u64, run_id: u64);
    fn scheduler_suspend(&mut self, time_ms: f64, main_thread_id: u64);
    fn scheduler_resume(&mut self, time_ms: f64, main_thread_id: u64);

    /// (Re)initialize the event buffer. A no-op for sinks with nothing
    /// to (re)initialize, such as [`NullProfiler`].
    fn start_logging(&mut self) {}

    /// Return everything recorded since the last `start_logging`/
    /// `stop_logging` and reset for the next session. `None` if nothing
    /// was recorded, or for sinks that don't buffer (e.g. [`NullProfiler`]).
    fn stop_logging(&mut self) -> Option<Vec<i32>> {
        None
    }

    /// Surface (and clear) a buffer-exhaustion condition hit since the
    /// last call. `Ok(())` for sinks that can't overflow.
    fn take_exhausted(&mut self) -> SchedResult<()> {
        Ok(())
    }
}

/// A `ProfilingSink` that does nothing. Used when profiling is
/// disabled so the scheduler's instrumentation call sites don't need
/// an `if profiling` check at every site.
#[derive(Default)]
pub struct NullProfiler;

impl ProfilingSink for NullProfiler {
    fn task_start(&mut self, _: f64, _: u64, _: u8) {}
    fn task_complete(&mut self, _: f64, _: u64) {}
    fn task_error(&mut self, _: f64, _: u64) {}
    fn task_cancel(&mut self, _: f64, _: u64) {}
    fn task_run(&mut self, _: f64, _: u64, _: u64) {}
    fn task_yield(&mut self, _: f64, _: u64, _: u64) {}
    fn scheduler_suspend(&mut self, _: f64, _: u64) {}
    fn scheduler_resume(&mut self, _: f64, _: u64) {}
}

/// Growable `i32` event buffer.
///
/// Starts at `initial_capacity` slots, doubles on demand up to
/// `max_capacity`; once the cap is hit, recording stops and a warning
/// is logged exactly once. `stop_logging` returns the buffer contents
/// and resets state for the next recording session.
pub struct BufferProfiler {
    buf: Vec<i32>,
    initial_capacity: usize,
    max_capacity: usize,
    exhausted: bool,
}

impl BufferProfiler {
    pub fn new(initial_capacity: usize, max_capacity: usize) -> Self {
        BufferProfiler {
            buf: Vec::with_capacity(initial_capacity),
            initial_capacity,
            max_capacity,
            exhausted: false,
        }
    }

    fn record(&mut self, fields: &[i32]) {
        if self.exhausted {
            return;
        }
        if self.buf.len() + fields.len() > self.max_capacity {
            self.exhausted = true;
            serr!("profiling buffer reached its maximum size and stopped recording");
            return;
        }
        self.buf.extend_from_slice(fields);
    }
}

#[inline]
fn micros(time_ms: f64) -> i32 {
    (time_ms * 1000.0) as i32
}

impl ProfilingSink for BufferProfiler {
    fn task_start(&mut self, time_ms: f64, task_id: u64, priority_level: u8) {
        self.record(&[
            EventTag::TaskStart as i32,
            micros(time_ms),
            task_id as i32,
            priority_level as i32,
        ]);
    }

    fn task_complete(&mut self, time_ms: f64, task_id: u64) {
        self.record(&[EventTag::TaskComplete as i32, micros(time_ms), task_id as i32]);
    }

    fn task_error(&mut self, time_ms: f64, task_id: u64) {
        self.record(&[EventTag::TaskError as i32, micros(time_ms), task_id as i32]);
    }

    fn task_cancel(&mut self, time_ms: f64, task_id: u64) {
        self.record(&[EventTag::TaskCancel as i32, micros(time_ms), task_id as i32]);
    }

    fn task_run(&mut self, time_ms: f64, task_id: u64, run_id: u64) {
        self.record(&[EventTag::TaskRun as i32, micros(time_ms), task_id as i32, run_id as i32]);
    }

    fn task_yield(&mut self, time_ms: f64, task_id: u64, run_id: u64) {
        self.record(&[EventTag::TaskYield as i32, micros(time_ms), task_id as i32, run_id as i32]);
    }

    fn scheduler_suspend(&mut self, time_ms: f64, main_thread_id: u64) {
        self.record(&[EventTag::SchedulerSuspend as i32, micros(time_ms), main_thread_id as i32]);
    }

    fn scheduler_resume(&mut self, time_ms: f64, main_thread_id: u64) {
        self.record(&[EventTag::SchedulerResume as i32, micros(time_ms), main_thread_id as i32]);
    }

    /// Reset to a fresh buffer at the configured initial capacity.
    fn start_logging(&mut self) {
        self.buf = Vec::with_capacity(self.initial_capacity);
        self.exhausted = false;
    }

    fn stop_logging(&mut self) -> Option<Vec<i32>> {
        if self.buf.is_empty() {
            return None;
        }
        self.exhausted = false;
        Some(std::mem::replace(&mut self.buf, Vec::with_capacity(self.initial_capacity)))
    }

    /// Whether the buffer has ever hit its cap during this session.
    /// Consumed once by `Scheduler` to surface `SchedError::ProfilingBufferExhausted`.
    fn take_exhausted(&mut self) -> SchedResult<()> {
        if self.exhausted {
            swarn!("profiling disabled for remainder of session after buffer exhaustion");
            self.exhausted = false;
            return Err(SchedError::ProfilingBufferExhausted);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_task_start_fields_in_order() {
        let mut profiler = BufferProfiler::new(64, 64);
        profiler.task_start(1.5, 7, 3);
        let buf = profiler.stop_logging().unwrap();
        assert_eq!(buf, vec![EventTag::TaskStart as i32, 1500, 7, 3]);
    }

    #[test]
    fn stops_recording_once_capacity_exhausted() {
        let mut profiler = BufferProfiler::new(4, 4);
        profiler.task_complete(0.0, 1); // 3 slots, fits
        profiler.task_complete(0.0, 2); // would need 3 more, exceeds cap of 4
        assert!(profiler.take_exhausted().is_err());
        let buf = profiler.stop_logging().unwrap();
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn stop_logging_resets_session() {
        let mut profiler = BufferProfiler::new(64, 64);
        profiler.task_complete(0.0, 1);
        assert!(profiler.stop_logging().is_some());
        assert!(profiler.stop_logging().is_none());
    }

    #[test]
    fn run_ids_are_monotonic() {
        let a = next_run_id();
        let b = next_run_id();
        assert!(b > a);
    }
}
