//! Abstract host-callback / host-timeout adapter
//!
//! The scheduler core never decides *how* "run me again soon" is
//! arranged — that's the embedding host's job (a message-port post, an
//! immediate-callback primitive, or a plain timer in the browser this
//! design is modeled on). `HostBridge` is the narrow capability set the
//! core actually needs. Note `should_yield_to_host` is deliberately
//! NOT part of this trait: the yield budget is policy the scheduler
//! core owns outright (see `Scheduler::should_yield`), not something a
//! host adapter could vary without breaking the documented yield-budget
//! test scenario.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// Capability set a host must provide so the scheduler can arrange its
/// own future invocation.
pub trait HostBridge {
    /// Arrange one future call into `Scheduler::perform_work_until_deadline`,
    /// as soon as the host can make one, ideally before any further
    /// host-level work.
    fn request_host_callback(&self);

    /// Cancel a previously requested host-callback, if the mechanism
    /// supports it. Most real adapters (a posted message, an immediate
    /// handle) can't truly un-post; implementations are free to no-op.
    fn cancel_host_callback(&self);

    /// Arrange a single call into `Scheduler::handle_timeout` after at
    /// least `delay_ms`. Only one timeout is ever armed at a time — the
    /// core cancels any outstanding one before arming a new one.
    fn request_host_timeout(&self, delay_ms: f64);

    /// Cancel any armed timeout.
    fn cancel_host_timeout(&self);
}

/// Reference `HostBridge`: records requests in plain fields that the
/// embedder (or a test) polls and drains explicitly. This is what every
/// scheduler test in this crate drives, and the pattern to copy when
/// integrating the scheduler into an existing event loop that already
/// owns its own pump.
#[derive(Default)]
pub struct ManualHostBridge {
    callback_requested: std::cell::Cell<bool>,
    timeout_requested_ms: std::cell::Cell<Option<f64>>,
}

impl ManualHostBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Has a host-callback been requested since the last drain? Clears
    /// the flag.
    pub fn take_callback_request(&self) -> bool {
        self.callback_requested.replace(false)
    }

    /// Peek whether a host-callback is currently outstanding, without
    /// clearing it.
    pub fn callback_pending(&self) -> bool {
        self.callback_requested.get()
    }

    /// Has a host-timeout been armed since the last drain? Returns the
    /// requested delay in milliseconds and clears the flag.
    pub fn take_timeout_request(&self) -> Option<f64> {
        self.timeout_requested_ms.take()
    }

    pub fn timeout_pending(&self) -> bool {
        self.timeout_requested_ms.get().is_some()
    }
}

impl HostBridge for ManualHostBridge {
    fn request_host_callback(&self) {
        self.callback_requested.set(true);
    }

    fn cancel_host_callback(&self) {
        self.callback_requested.set(false);
    }

    fn request_host_timeout(&self, delay_ms: f64) {
        self.timeout_requested_ms.set(Some(delay_ms));
    }

    fn cancel_host_timeout(&self) {
        self.timeout_requested_ms.set(None);
    }
}

/// What woke `ThreadHostBridge::block_until_due`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// A host-callback was requested — call `perform_work_until_deadline`.
    Callback,
    /// The armed timeout elapsed — call `handle_timeout`.
    Timeout,
}

struct Shared {
    due: Mutex<Option<Wake>>,
    deadline: Mutex<Option<Instant>>,
    shutdown: Mutex<bool>,
    condvar: Condvar,
}

/// Minimal standalone bridge for running the scheduler with no
/// surrounding host event loop at all.
///
/// Spawns one background OS thread that sleeps (via
/// `Condvar::wait_timeout`) until either told to invoke the work-loop
/// or until an armed timeout elapses, then marks a shared "due" slot
/// and wakes the owning thread. The scheduler itself never crosses
/// threads — `Scheduler` stays `!Send` — this bridge only arranges
/// *when* the thread that owns the scheduler should call back into it.
/// The owner drives this by calling `block_until_due()` in a loop and
/// invoking the matching scheduler method itself.
pub struct ThreadHostBridge {
    shared: Arc<Shared>,
    timer_thread: Option<std::thread::JoinHandle<()>>,
}

impl ThreadHostBridge {
    pub fn new() -> Self {
        let shared = Arc::new(Shared {
            due: Mutex::new(None),
            deadline: Mutex::new(None),
            shutdown: Mutex::new(false),
            condvar: Condvar::new(),
        });

        let bg_shared = Arc::clone(&shared);
        let timer_thread = std::thread::spawn(move || loop {
            let due = bg_shared.due.lock().unwrap();

            if *bg_shared.shutdown.lock().unwrap() {
                return;
            }

            // Already due and undrained: just wait for the owner to
            // take it (or for shutdown), nothing new to compute.
            if due.is_some() {
                let _ = bg_shared.condvar.wait(due).unwrap();
                continue;
            }
            drop(due);

            let wait_for = bg_shared
                .deadline
                .lock()
                .unwrap()
                .map(|d| d.saturating_duration_since(Instant::now()));

            let due = bg_shared.due.lock().unwrap();
            match wait_for {
                Some(d) => {
                    let (mut due, _timed_out) = bg_shared.condvar.wait_timeout(due, d).unwrap();
                    if *bg_shared.shutdown.lock().unwrap() {
                        return;
                    }
                    if due.is_none() {
                        let mut deadline = bg_shared.deadline.lock().unwrap();
                        if let Some(d) = *deadline {
                            if Instant::now() >= d {
                                *due = Some(Wake::Timeout);
                                *deadline = None;
                                bg_shared.condvar.notify_all();
                            }
                        }
                    }
                }
                None => {
                    let _ = bg_shared.condvar.wait(due).unwrap();
                }
            }
        });

        ThreadHostBridge { shared, timer_thread: Some(timer_thread) }
    }

    /// Block the calling (scheduler-owning) thread until a host
    /// callback or an armed timeout is due, then return which.
    pub fn block_until_due(&self) -> Wake {
        let mut due = self.shared.due.lock().unwrap();
        loop {
            if let Some(wake) = due.take() {
                return wake;
            }
            due = self.shared.condvar.wait(due).unwrap();
        }
    }
}

impl Default for ThreadHostBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl HostBridge for ThreadHostBridge {
    fn request_host_callback(&self) {
        let mut due = self.shared.due.lock().unwrap();
        *due = Some(Wake::Callback);
        self.shared.condvar.notify_all();
    }

    fn cancel_host_callback(&self) {
        let mut due = self.shared.due.lock().unwrap();
        if *due == Some(Wake::Callback) {
            *due = None;
        }
    }

    fn request_host_timeout(&self, delay_ms: f64) {
        let mut deadline = self.shared.deadline.lock().unwrap();
        *deadline = Some(Instant::now() + Duration::from_secs_f64(delay_ms.max(0.0) / 1000.0));
        self.shared.condvar.notify_all();
    }

    fn cancel_host_timeout(&self) {
        let mut deadline = self.shared.deadline.lock().unwrap();
        *deadline = None;
    }
}

impl Drop for ThreadHostBridge {
    fn drop(&mut self) {
        *self.shared.shutdown.lock().unwrap() = true;
        self.shared.condvar.notify_all();
        if let Some(t) = self.timer_thread.take() {
            let _ = t.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_bridge_records_callback_request() {
        let bridge = ManualHostBridge::new();
        assert!(!bridge.callback_pending());
        bridge.request_host_callback();
        assert!(bridge.callback_pending());
        assert!(bridge.take_callback_request());
        assert!(!bridge.callback_pending());
    }

    #[test]
    fn manual_bridge_records_timeout_request() {
        let bridge = ManualHostBridge::new();
        bridge.request_host_timeout(42.0);
        assert!(bridge.timeout_pending());
        assert_eq!(bridge.take_timeout_request(), Some(42.0));
        assert!(!bridge.timeout_pending());
    }

    #[test]
    fn manual_bridge_cancel_clears_flags() {
        let bridge = ManualHostBridge::new();
        bridge.request_host_callback();
        bridge.request_host_timeout(10.0);
        bridge.cancel_host_callback();
        bridge.cancel_host_timeout();
        assert!(!bridge.callback_pending());
        assert!(!bridge.timeout_pending());
    }
}
