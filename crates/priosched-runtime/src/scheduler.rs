//! Core scheduler: the two-queue data structure and the work-loop.

use crate::clock::Clock;
use crate::config::{SchedulerConfig, DEFAULT_FRAME_INTERVAL_MS, MAX_FORCEABLE_FPS};
use crate::host::HostBridge;
use crate::profiling::{next_main_thread_id, next_run_id, BufferProfiler, NullProfiler, ProfilingSink};

use priosched_core::task::{ByExpirationTime, ByStartTime};
use priosched_core::{serr, Callback, Continuation, MinHeap, PriorityLevel, SchedError, SchedResult, TaskHandle, TaskId};

use std::cell::RefCell;
use std::rc::Rc;

struct Inner<C: Clock, H: HostBridge> {
    clock: C,
    host: H,
    profiler: Box<dyn ProfilingSink>,

    task_queue: MinHeap<ByExpirationTime>,
    timer_queue: MinHeap<ByStartTime>,

    current_priority_level: PriorityLevel,
    current_task: Option<TaskHandle>,

    is_host_callback_scheduled: bool,
    is_host_timeout_scheduled: bool,
    is_performing_work: bool,
    /// Re-armed alongside `is_host_callback_scheduled` at every site that
    /// asks the host for a callback, so `perform_work_until_deadline`
    /// doesn't stay a permanent no-op after the queue drains once and
    /// later work arrives.
    is_message_loop_running: bool,
    is_scheduler_paused: bool,

    /// Anchor set at the top of each `perform_work_until_deadline`
    /// entry; `should_yield` measures elapsed time against this.
    start_time_ms: f64,
    frame_interval_ms: f64,

    main_thread_id: u64,
}

/// The scheduling core.
///
/// Cloning a `Scheduler` is cheap (it's a reference-counted handle to
/// shared state) and is how user callbacks re-enter the scheduler:
/// capture a clone in the closure passed to `schedule_callback`, and
/// call `schedule_callback`/`cancel_callback` on it from inside a
/// running callback exactly as the re-entrancy rules in the resource
/// model require. `Scheduler` is deliberately `!Send`/`!Sync` — `Rc`
/// and `RefCell` both forbid crossing threads, which is the
/// compile-time expression of "owned exclusively by one executor".
pub struct Scheduler<C: Clock, H: HostBridge> {
    inner: Rc<RefCell<Inner<C, H>>>,
}

impl<C: Clock, H: HostBridge> Clone for Scheduler<C, H> {
    fn clone(&self) -> Self {
        Scheduler { inner: Rc::clone(&self.inner) }
    }
}

impl<C: Clock, H: HostBridge> Scheduler<C, H> {
    pub fn new(config: SchedulerConfig, clock: C, host: H) -> Self {
        config.validate().expect("invalid scheduler configuration");

        let frame_interval_ms = config.frame_interval.as_secs_f64() * 1000.0;
        let profiler: Box<dyn ProfilingSink> = if config.profiling {
            Box::new(BufferProfiler::new(config.profiling_initial_capacity, config.profiling_max_capacity))
        } else {
            Box::new(NullProfiler)
        };

        Scheduler {
            inner: Rc::new(RefCell::new(Inner {
                clock,
                host,
                profiler,
                task_queue: MinHeap::new(),
                timer_queue: MinHeap::new(),
                current_priority_level: PriorityLevel::Normal,
                current_task: None,
                is_host_callback_scheduled: false,
                is_host_timeout_scheduled: false,
                is_performing_work: false,
                is_message_loop_running: true,
                is_scheduler_paused: false,
                start_time_ms: 0.0,
                frame_interval_ms,
                main_thread_id: next_main_thread_id(),
            })),
        }
    }

    /// Current time, in milliseconds, as reported by the configured clock.
    pub fn now(&self) -> f64 {
        self.inner.borrow().clock.now_ms()
    }

    /// Schedule a callback at the given priority, optionally delayed.
    /// An out-of-range or `NoPriority` priority is silently coerced to
    /// `Normal`. `delay_ms` below zero is clamped to zero.
    pub fn schedule_callback(&self, priority: PriorityLevel, callback: Callback, delay_ms: f64) -> TaskHandle {
        let priority = priority.coerced();
        let now = self.now();
        let start_time = now + delay_ms.max(0.0);
        let expiration_time = start_time + priority.timeout_ms() as f64;

        let task = TaskHandle::new(TaskId::next(), priority, callback, start_time, expiration_time);

        let mut inner = self.inner.borrow_mut();

        if start_time > now {
            inner.timer_queue.push(ByStartTime(task.clone()));

            let is_earliest_timer = matches!(
                inner.timer_queue.peek(),
                Some(entry) if entry.0.id() == task.id()
            );
            if inner.task_queue.is_empty() && is_earliest_timer {
                if inner.is_host_timeout_scheduled {
                    inner.host.cancel_host_timeout();
                }
                inner.is_host_timeout_scheduled = true;
                inner.host.request_host_timeout(start_time - now);
            }
        } else {
            task.set_queued(true);
            inner.task_queue.push(ByExpirationTime(task.clone()));
            inner.profiler.task_start(now, task.id().raw(), priority as u8);

            if !inner.is_host_callback_scheduled && !inner.is_performing_work {
                inner.is_host_callback_scheduled = true;
                inner.is_message_loop_running = true;
                inner.host.request_host_callback();
            }
        }

        task
    }

    /// Tombstone a scheduled task. A no-op if the task is unknown to
    /// this scheduler or has already completed/been cancelled; never
    /// removes the entry from its heap (see `priosched_core::heap`).
    pub fn cancel_callback(&self, task: &TaskHandle) {
        let mut inner = self.inner.borrow_mut();
        if task.is_queued() {
            let now = inner.clock.now_ms();
            inner.profiler.task_cancel(now, task.id().raw());
            task.set_queued(false);
        }
        drop(inner);
        task.cancel();
    }

    /// The highest-priority ready task, without dequeuing it.
    pub fn first_callback_node(&self) -> Option<TaskHandle> {
        self.inner.borrow().task_queue.peek().map(|entry| entry.0.clone())
    }

    /// The priority the scheduler is currently executing under.
    /// `Normal` outside of any callback.
    pub fn current_priority_level(&self) -> PriorityLevel {
        self.inner.borrow().current_priority_level
    }

    /// Run `f` with `priority` as the current priority level, restoring
    /// the previous level when `f` returns — or panics, via an RAII
    /// guard, which is this crate's idiom for the "restore on all exit
    /// paths" requirement a `try`/`finally` expresses elsewhere.
    pub fn run_with_priority<F, R>(&self, priority: PriorityLevel, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let priority = priority.coerced();
        let previous = self.current_priority_level();
        self.inner.borrow_mut().current_priority_level = priority;

        struct RestorePriority<'a, C: Clock, H: HostBridge> {
            scheduler: &'a Scheduler<C, H>,
            previous: PriorityLevel,
        }
        impl<'a, C: Clock, H: HostBridge> Drop for RestorePriority<'a, C, H> {
            fn drop(&mut self) {
                self.scheduler.inner.borrow_mut().current_priority_level = self.previous;
            }
        }
        let _guard = RestorePriority { scheduler: self, previous };

        f()
    }

    /// Run `f` at "no higher than normal": drops Immediate/UserBlocking
    /// down to Normal, but preserves Low/Idle so a low-priority chain
    /// doesn't get artificially promoted.
    pub fn next<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let target = match self.current_priority_level() {
            PriorityLevel::Immediate | PriorityLevel::UserBlocking | PriorityLevel::Normal => {
                PriorityLevel::Normal
            }
            other => other,
        };
        self.run_with_priority(target, f)
    }

    /// Capture the current priority now; every future call of the
    /// returned closure runs `f` under that captured priority, not
    /// whatever priority happens to be current when it's eventually
    /// invoked.
    pub fn wrap_callback<F, R>(&self, f: F) -> Box<dyn Fn() -> R>
    where
        F: Fn() -> R + 'static,
        C: 'static,
        H: 'static,
    {
        let captured_priority = self.current_priority_level();
        let scheduler = self.clone();
        Box::new(move || scheduler.run_with_priority(captured_priority, &f))
    }

    #[cfg(feature = "debug-pause")]
    pub fn pause_execution(&self) {
        self.inner.borrow_mut().is_scheduler_paused = true;
    }

    #[cfg(not(feature = "debug-pause"))]
    pub fn pause_execution(&self) {}

    #[cfg(feature = "debug-pause")]
    pub fn continue_execution(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.is_scheduler_paused = false;
        if !inner.is_host_callback_scheduled && !inner.is_performing_work {
            inner.is_host_callback_scheduled = true;
            inner.is_message_loop_running = true;
            inner.host.request_host_callback();
        }
    }

    #[cfg(not(feature = "debug-pause"))]
    pub fn continue_execution(&self) {}

    /// Reserved; the core makes no paint-scheduling decisions of its
    /// own, but keeps the call site so embedders have somewhere to
    /// hang a future "flush before paint" hook without an API break.
    pub fn request_paint(&self) {}

    /// Start (or restart) profiling-event capture. A no-op if
    /// `SchedulerConfig::profiling` was left off, since the configured
    /// sink is a [`crate::profiling::NullProfiler`] in that case.
    pub fn start_logging_profiling_events(&self) {
        self.inner.borrow_mut().profiler.start_logging();
    }

    /// Retrieve everything recorded since the last start/stop and reset
    /// the buffer for the next session. `None` if profiling is off or
    /// nothing was recorded.
    pub fn stop_logging_profiling_events(&self) -> Option<Vec<i32>> {
        self.inner.borrow_mut().profiler.stop_logging()
    }

    /// Surface (and clear) a profiling-buffer-exhaustion condition hit
    /// since the last call.
    pub fn take_profiling_exhausted(&self) -> SchedResult<()> {
        self.inner.borrow_mut().profiler.take_exhausted()
    }

    /// Set the yield budget from a target frame rate. `fps == 0`
    /// restores the 5ms default; anything outside `1..=125` is
    /// rejected.
    pub fn force_frame_rate(&self, fps: u32) -> SchedResult<()> {
        if fps == 0 {
            self.inner.borrow_mut().frame_interval_ms = DEFAULT_FRAME_INTERVAL_MS;
            return Ok(());
        }
        if fps > MAX_FORCEABLE_FPS {
            serr!("forceFrameRate: {}fps is out of the supported 1-{} range", fps, MAX_FORCEABLE_FPS);
            return Err(SchedError::InvalidFrameRate { fps });
        }
        self.inner.borrow_mut().frame_interval_ms = (1000.0 / fps as f64).floor();
        Ok(())
    }

    /// `true` once at least `frame_interval` ms have elapsed since the
    /// start of the current `perform_work_until_deadline` slice.
    pub fn should_yield(&self) -> bool {
        let inner = self.inner.borrow();
        inner.clock.now_ms() - inner.start_time_ms >= inner.frame_interval_ms
    }

    /// Promote any timer-queue entries whose `start_time` has arrived
    /// into the ready queue. The only path by which delayed tasks ever
    /// become runnable.
    fn advance_timers(&self, now: f64) {
        let mut inner = self.inner.borrow_mut();
        loop {
            let Some(top) = inner.timer_queue.peek() else { break };

            if !top.0.has_callback() {
                inner.timer_queue.pop();
                continue;
            }

            if top.0.start_time() <= now {
                let entry = inner.timer_queue.pop().expect("peek succeeded").0;
                inner.profiler.task_start(now, entry.id().raw(), entry.priority() as u8);
                entry.set_queued(true);
                inner.task_queue.push(ByExpirationTime(entry));
            } else {
                break;
            }
        }
    }

    /// Host-timeout callback: promote due timers, then either ask for
    /// a host-callback (ready work exists) or re-arm a timeout for the
    /// next pending timer.
    pub fn handle_timeout(&self, now: f64) {
        self.inner.borrow_mut().is_host_timeout_scheduled = false;
        self.advance_timers(now);

        let mut inner = self.inner.borrow_mut();
        if inner.is_host_callback_scheduled {
            return;
        }
        if !inner.task_queue.is_empty() {
            inner.is_host_callback_scheduled = true;
            inner.is_message_loop_running = true;
            inner.host.request_host_callback();
        } else if let Some(next_timer) = inner.timer_queue.peek() {
            let delay = next_timer.0.start_time() - now;
            inner.is_host_timeout_scheduled = true;
            inner.host.request_host_timeout(delay);
        }
    }

    /// Drain ready work until the queue empties, a task yields via
    /// continuation, or the yield budget is exhausted. Returns `true`
    /// if the caller should reschedule itself (work remains, whether
    /// ready now or pending in the timer queue).
    fn work_loop(&self, initial_time: f64) -> bool {
        let mut current_time = initial_time;
        self.advance_timers(current_time);

        loop {
            #[cfg(feature = "debug-pause")]
            if self.inner.borrow().is_scheduler_paused {
                break;
            }

            let Some(current_task) = self.first_callback_node() else { break };

            if current_task.expiration_time() > current_time && self.should_yield() {
                break;
            }

            match current_task.take_callback() {
                None => {
                    // Tombstone: cancelled or already spent.
                    self.inner.borrow_mut().task_queue.pop();
                }
                Some(cb) => {
                    let run_id = next_run_id();
                    {
                        let mut inner = self.inner.borrow_mut();
                        inner.current_priority_level = current_task.priority();
                        inner.current_task = Some(current_task.clone());
                        inner.profiler.task_run(current_time, current_task.id().raw(), run_id);
                    }

                    priosched_core::log::set_current_task(current_task.id().raw());
                    let did_timeout = current_task.expiration_time() <= current_time;
                    let continuation = cb(did_timeout);
                    priosched_core::log::clear_current_task();

                    current_time = self.now();

                    match continuation {
                        Continuation::Again(next_cb) => {
                            current_task.set_callback(next_cb);
                            let mut inner = self.inner.borrow_mut();
                            inner.profiler.task_yield(current_time, current_task.id().raw(), run_id);
                            drop(inner);
                            self.advance_timers(current_time);
                            return true;
                        }
                        Continuation::Done => {
                            let mut inner = self.inner.borrow_mut();
                            inner.profiler.task_complete(current_time, current_task.id().raw());
                            let is_still_root = matches!(
                                inner.task_queue.peek(),
                                Some(entry) if entry.0.id() == current_task.id()
                            );
                            if is_still_root {
                                inner.task_queue.pop();
                            }
                            drop(inner);
                            current_task.set_queued(false);
                            self.advance_timers(current_time);
                        }
                    }
                }
            }
        }

        if !self.inner.borrow().task_queue.is_empty() {
            return true;
        }

        let mut inner = self.inner.borrow_mut();
        if let Some(next_timer) = inner.timer_queue.peek() {
            let delay = next_timer.0.start_time() - current_time;
            inner.is_host_timeout_scheduled = true;
            inner.host.request_host_timeout(delay);
        }
        false
    }

    /// Sets up and tears down one `work_loop` slice: clears the
    /// host-callback flag, cancels any superseded host-timeout, saves
    /// and restores `current_priority_level`, and reports a panicking
    /// callback as a `TaskError` event before re-raising.
    fn flush_work(&self, initial_time: f64) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            let main_thread_id = inner.main_thread_id;
            inner.profiler.scheduler_resume(initial_time, main_thread_id);
            inner.is_host_callback_scheduled = false;
            if inner.is_host_timeout_scheduled {
                inner.is_host_timeout_scheduled = false;
                inner.host.cancel_host_timeout();
            }
            inner.is_performing_work = true;
        }

        let previous_priority = self.current_priority_level();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| self.work_loop(initial_time)));

        let has_more_work = match &result {
            Ok(more) => *more,
            Err(_) => {
                let mut inner = self.inner.borrow_mut();
                if let Some(task) = inner.current_task.clone() {
                    let now = inner.clock.now_ms();
                    inner.profiler.task_error(now, task.id().raw());
                    task.set_queued(false);
                }
                // the outer driver reschedules to keep draining; the real
                // unwind still propagates below.
                true
            }
        };

        {
            let mut inner = self.inner.borrow_mut();
            inner.current_priority_level = previous_priority;
            inner.current_task = None;
            inner.is_performing_work = false;
            let main_thread_id = inner.main_thread_id;
            let now = inner.clock.now_ms();
            inner.profiler.scheduler_suspend(now, main_thread_id);
        }

        if let Err(panic) = result {
            std::panic::resume_unwind(panic);
        }

        has_more_work
    }

    /// Entry point the `HostBridge` calls back into. A callback panic
    /// unwinds through here; the reschedule branch still runs first
    /// (via `catch_unwind`) so one bad task cannot wedge the scheduler,
    /// then the panic is re-raised for the embedder to observe.
    pub fn perform_work_until_deadline(&self) {
        if !self.inner.borrow().is_message_loop_running {
            return;
        }

        let current_time = self.now();
        self.inner.borrow_mut().start_time_ms = current_time;

        let outcome =
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| self.flush_work(current_time)));

        let has_more_work = match &outcome {
            Ok(more) => *more,
            Err(_) => true,
        };

        if has_more_work {
            self.inner.borrow().host.request_host_callback();
        } else {
            self.inner.borrow_mut().is_message_loop_running = false;
        }

        if let Err(panic) = outcome {
            std::panic::resume_unwind(panic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::host::ManualHostBridge;
    use std::cell::RefCell as StdRefCell;
    use std::rc::Rc as StdRc;

    fn make() -> (Scheduler<ManualClock, ManualHostBridge>, StdRc<ManualClock>) {
        let clock = StdRc::new(ManualClock::new());
        let sched = Scheduler::new(SchedulerConfig::default(), ManualClockHandle(clock.clone()), ManualHostBridge::new());
        (sched, clock)
    }

    /// `Clock` requires an owned type; this thin wrapper lets tests
    /// share one `ManualClock` between the scheduler and assertions.
    struct ManualClockHandle(StdRc<ManualClock>);
    impl Clock for ManualClockHandle {
        fn now_ms(&self) -> f64 {
            self.0.now_ms()
        }
    }

    fn done(log: StdRc<StdRefCell<Vec<&'static str>>>, name: &'static str) -> Callback {
        Box::new(move |_did_timeout| {
            log.borrow_mut().push(name);
            Continuation::Done
        })
    }

    #[test]
    fn fifo_within_same_priority_and_no_delay() {
        let (sched, _clock) = make();
        let log = StdRc::new(StdRefCell::new(Vec::new()));

        sched.schedule_callback(PriorityLevel::Normal, done(log.clone(), "a"), 0.0);
        sched.schedule_callback(PriorityLevel::Normal, done(log.clone(), "b"), 0.0);
        sched.schedule_callback(PriorityLevel::Normal, done(log.clone(), "c"), 0.0);

        sched.perform_work_until_deadline();

        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert!(sched.first_callback_node().is_none());
    }

    #[test]
    fn priority_inversion_via_expiration() {
        let (sched, clock) = make();
        let log = StdRc::new(StdRefCell::new(Vec::new()));

        sched.schedule_callback(PriorityLevel::Low, done(log.clone(), "low"), 0.0);
        clock.advance(1.0);
        sched.schedule_callback(PriorityLevel::Normal, done(log.clone(), "normal"), 0.0);
        clock.advance(10_000.0);

        sched.perform_work_until_deadline();

        assert_eq!(*log.borrow(), vec!["normal", "low"]);
    }

    #[test]
    fn delay_promotes_task_once_timeout_fires() {
        let (sched, clock) = make();
        let log = StdRc::new(StdRefCell::new(Vec::new()));

        sched.schedule_callback(PriorityLevel::Normal, done(log.clone(), "x"), 100.0);
        clock.advance(50.0);
        assert!(sched.first_callback_node().is_none());

        clock.advance(50.0);
        sched.handle_timeout(clock.now_ms());
        sched.perform_work_until_deadline();

        assert_eq!(*log.borrow(), vec!["x"]);
    }

    #[test]
    fn continuation_is_not_popped_until_it_finishes() {
        let (sched, _clock) = make();
        let log = StdRc::new(StdRefCell::new(Vec::new()));
        let calls = StdRc::new(StdRefCell::new(0u32));

        let calls_for_cb = calls.clone();
        let log_for_cb = log.clone();
        let cb: Callback = Box::new(move |_did_timeout| {
            *calls_for_cb.borrow_mut() += 1;
            if *calls_for_cb.borrow() == 1 {
                log_for_cb.borrow_mut().push("first");
                let calls_again = calls_for_cb.clone();
                let log_again = log_for_cb.clone();
                Continuation::Again(Box::new(move |_| {
                    *calls_again.borrow_mut() += 1;
                    log_again.borrow_mut().push("second");
                    Continuation::Done
                }))
            } else {
                Continuation::Done
            }
        });

        sched.schedule_callback(PriorityLevel::Normal, cb, 0.0);

        let more_work = sched.perform_work_until_deadline();
        let _ = more_work;
        assert_eq!(*log.borrow(), vec!["first"]);
        assert!(sched.first_callback_node().is_some());

        sched.perform_work_until_deadline();
        assert_eq!(*log.borrow(), vec!["first", "second"]);
        assert!(sched.first_callback_node().is_none());
    }

    #[test]
    fn cancellation_skips_the_callback() {
        let (sched, _clock) = make();
        let log = StdRc::new(StdRefCell::new(Vec::new()));

        sched.schedule_callback(PriorityLevel::Normal, done(log.clone(), "a"), 0.0);
        let b = sched.schedule_callback(PriorityLevel::Normal, done(log.clone(), "b"), 0.0);
        sched.schedule_callback(PriorityLevel::Normal, done(log.clone(), "c"), 0.0);

        sched.cancel_callback(&b);
        sched.perform_work_until_deadline();

        assert_eq!(*log.borrow(), vec!["a", "c"]);
        assert!(sched.first_callback_node().is_none());
    }

    #[test]
    fn immediate_priority_is_always_already_expired() {
        let (sched, _clock) = make();
        let task = sched.schedule_callback(PriorityLevel::Immediate, Box::new(|_| Continuation::Done), 0.0);
        assert!(task.expiration_time() <= sched.now());
    }

    #[test]
    fn run_with_priority_restores_even_on_panic() {
        let (sched, _clock) = make();
        assert_eq!(sched.current_priority_level(), PriorityLevel::Normal);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            sched.run_with_priority(PriorityLevel::UserBlocking, || {
                panic!("boom");
            })
        }));
        assert!(result.is_err());
        assert_eq!(sched.current_priority_level(), PriorityLevel::Normal);
    }

    #[test]
    fn wrap_callback_captures_priority_at_wrap_time_not_call_time() {
        let (sched, _clock) = make();
        let observed = StdRc::new(StdRefCell::new(None));
        let observed_for_wrap = observed.clone();
        let sched_for_wrap = sched.clone();

        let wrapped = sched.run_with_priority(PriorityLevel::UserBlocking, || {
            sched_for_wrap.wrap_callback(move || {
                *observed_for_wrap.borrow_mut() = Some(sched_for_wrap.current_priority_level());
            })
        });

        sched.run_with_priority(PriorityLevel::Idle, || {
            wrapped();
        });

        assert_eq!(*observed.borrow(), Some(PriorityLevel::UserBlocking));
    }

    #[test]
    fn force_frame_rate_rejects_out_of_range_values() {
        let (sched, _clock) = make();
        assert!(sched.force_frame_rate(0).is_ok());
        assert!(sched.force_frame_rate(60).is_ok());
        assert!(sched.force_frame_rate(126).is_err());
    }

    #[test]
    fn profiling_buffer_is_reachable_through_the_scheduler() {
        let clock = StdRc::new(ManualClock::new());
        let config = SchedulerConfig::default().profiling(true);
        let sched = Scheduler::new(config, ManualClockHandle(clock.clone()), ManualHostBridge::new());

        sched.schedule_callback(PriorityLevel::Normal, Box::new(|_| Continuation::Done), 0.0);
        sched.perform_work_until_deadline();

        let events = sched.stop_logging_profiling_events();
        assert!(events.is_some());
        assert!(sched.stop_logging_profiling_events().is_none());
    }

    #[test]
    fn profiling_disabled_by_default_yields_no_buffer() {
        let (sched, _clock) = make();
        sched.schedule_callback(PriorityLevel::Normal, Box::new(|_| Continuation::Done), 0.0);
        sched.perform_work_until_deadline();
        assert!(sched.stop_logging_profiling_events().is_none());
    }

    #[cfg(feature = "debug-pause")]
    #[test]
    fn paused_scheduler_holds_ready_work_until_continued() {
        let (sched, _clock) = make();
        let log = StdRc::new(StdRefCell::new(Vec::new()));

        sched.pause_execution();
        sched.schedule_callback(PriorityLevel::Normal, done(log.clone(), "a"), 0.0);
        sched.perform_work_until_deadline();
        assert!(log.borrow().is_empty(), "paused scheduler must not drain the ready queue");

        sched.continue_execution();
        sched.perform_work_until_deadline();
        assert_eq!(*log.borrow(), vec!["a"]);
    }

    #[cfg(not(feature = "debug-pause"))]
    #[test]
    fn pause_execution_is_a_no_op_without_the_debug_pause_feature() {
        let (sched, _clock) = make();
        let log = StdRc::new(StdRefCell::new(Vec::new()));

        sched.pause_execution();
        sched.schedule_callback(PriorityLevel::Normal, done(log.clone(), "a"), 0.0);
        sched.perform_work_until_deadline();

        assert_eq!(*log.borrow(), vec!["a"], "pause_execution has no effect when the feature is off");
    }

    #[test]
    fn rescheduling_after_a_full_drain_resumes_the_message_loop() {
        let (sched, _clock) = make();
        let log = StdRc::new(StdRefCell::new(Vec::new()));

        sched.schedule_callback(PriorityLevel::Normal, done(log.clone(), "a"), 0.0);
        sched.perform_work_until_deadline();
        assert_eq!(*log.borrow(), vec!["a"]);

        // The queue fully drained above; a callback scheduled afterward
        // must still make it through a later `perform_work_until_deadline`
        // rather than being silently stranded.
        sched.schedule_callback(PriorityLevel::Normal, done(log.clone(), "b"), 0.0);
        sched.perform_work_until_deadline();
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn re_entrant_schedule_from_a_running_callback_ties_break_by_id() {
        // spec.md §9's open question: a running callback re-enters
        // `schedule_callback` at equal priority with zero delay while
        // another task is already sitting at the not-yet-popped root.
        // The tombstoned-but-still-queued running entry and the two
        // contenders all land on the same sort_index; ascending `id` is
        // the only disambiguator.
        let (sched, _clock) = make();
        let log = StdRc::new(StdRefCell::new(Vec::new()));

        let sched_for_a = sched.clone();
        let log_for_a = log.clone();
        let a: Callback = Box::new(move |_did_timeout| {
            log_for_a.borrow_mut().push("a");
            sched_for_a.schedule_callback(PriorityLevel::Normal, done(log_for_a.clone(), "b"), 0.0);
            Continuation::Done
        });

        sched.schedule_callback(PriorityLevel::Normal, a, 0.0);
        sched.schedule_callback(PriorityLevel::Normal, done(log.clone(), "c"), 0.0);

        sched.perform_work_until_deadline();

        assert_eq!(*log.borrow(), vec!["a", "c", "b"]);
        assert!(sched.first_callback_node().is_none());
    }
}
