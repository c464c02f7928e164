//! # priosched - Cooperative Priority Scheduler
//!
//! A single-threaded, priority-ordered work scheduler for driving
//! fine-grained, interruptible callbacks on one logical execution thread
//! (the "host"): an editor's input loop, a renderer's frame loop, or any
//! other event loop that cannot afford to block on a long task.
//!
//! Callbacks are submitted with a [`PriorityLevel`] and an optional
//! delay. The scheduler derives an expiration deadline from the two,
//! runs the most urgent ready callback first, and yields back to the
//! host once a short time budget elapses — unless the next callback is
//! already overdue, in which case it runs anyway rather than starving
//! further.
//!
//! ## Quick Start
//!
//! ```ignore
//! use priosched::{PriorityLevel, Scheduler, SchedulerConfig, SystemClock, ThreadHostBridge};
//!
//! let scheduler = Scheduler::new(SchedulerConfig::default(), SystemClock::new(), ThreadHostBridge::new());
//!
//! scheduler.schedule_callback(
//!     PriorityLevel::UserBlocking,
//!     Box::new(|_did_timeout| {
//!         println!("ran under user-blocking priority");
//!         priosched::Continuation::Done
//!     }),
//!     0.0,
//! );
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Caller / Host                        │
//! │         schedule_callback(), cancel_callback(), next()      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Scheduler                            │
//! │     task_queue (ready, by expiration)   timer_queue (delay)  │
//! │                    work_loop / should_yield                  │
//! └─────────────────────────────────────────────────────────────┘
//!                  │                              │
//!                  ▼                              ▼
//!          ┌───────────────┐              ┌───────────────┐
//!          │   HostBridge   │              │ ProfilingSink │
//!          │  (run-me-soon) │              │ (trace events)│
//!          └───────────────┘              └───────────────┘
//! ```
//!
//! `priosched-core` holds the platform-agnostic data model (task ids,
//! priority timeouts, the min-heap); `priosched-runtime` holds the
//! scheduler, clock, host bridges, and profiler. This crate re-exports
//! the surface most consumers need from both.

// Re-export core types
pub use priosched_core::{
    ByExpirationTime, ByStartTime, Callback, Continuation, HeapKey, MinHeap, PriorityLevel,
    SchedError, SchedResult, TaskHandle, TaskId, MAX_31BIT_MS,
};

// Re-export logging macros for embedders that want the same
// kernel-style, context-aware debug output the scheduler itself uses.
pub use priosched_core::{serr, sdebug, sinfo, strace, swarn};
pub use priosched_core::log::{self, init as init_logging, set_log_level, set_flush_enabled, set_time_enabled, LogLevel};

// Re-export env utilities
pub use priosched_core::env::{env_get, env_get_bool, env_get_opt, env_get_str, env_is_set};

// Re-export runtime types
pub use priosched_runtime::{
    BufferProfiler, Clock, EventTag, HostBridge, ManualClock, ManualHostBridge, NullProfiler,
    ProfilingSink, Scheduler, SchedulerConfig, SystemClock, ThreadHostBridge, Wake,
    DEFAULT_FRAME_INTERVAL_MS, MAX_FORCEABLE_FPS,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facade_reexports_are_usable_end_to_end() {
        let clock = SystemClock::new();
        let host = ManualHostBridge::new();
        let scheduler = Scheduler::new(SchedulerConfig::default(), clock, host);

        let ran = std::rc::Rc::new(std::cell::Cell::new(false));
        let ran_for_cb = ran.clone();

        scheduler.schedule_callback(
            PriorityLevel::Normal,
            Box::new(move |_did_timeout| {
                ran_for_cb.set(true);
                Continuation::Done
            }),
            0.0,
        );

        scheduler.perform_work_until_deadline();
        assert!(ran.get());
    }
}
