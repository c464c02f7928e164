//! Task bookkeeping shared between the timer queue and the ready queue

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::heap::HeapKey;
use crate::id::TaskId;
use crate::priority::PriorityLevel;

/// Outcome of invoking a task's callback.
///
/// A callback that wants more of its own time slice, without going
/// back through the full ready-queue ordering, returns `Again` with a
/// continuation; the scheduler re-invokes it directly on the next work
/// loop iteration rather than re-heapifying. Returning `Done` means the
/// task has nothing left to do and is retired.
pub enum Continuation {
    Done,
    Again(Callback),
}

/// A scheduled unit of work. Takes `did_timeout` (was this invocation's
/// deadline already in the past when it was picked up) and returns
/// either a continuation to run next time or `Done`. Each invocation
/// consumes the `Callback` — a continuation replaces it with a fresh
/// one rather than being called again in place.
pub type Callback = Box<dyn FnOnce(bool) -> Continuation>;

/// Shared, mutable state for one scheduled task.
///
/// Held behind `Rc<RefCell<_>>` rather than `Arc<Mutex<_>>`: the
/// scheduler that owns these tasks is `!Send`/`!Sync` by construction,
/// so there is never contention to guard against, only aliasing within
/// a single thread.
pub struct TaskInner {
    pub id: TaskId,
    pub priority: PriorityLevel,
    pub callback: Option<Callback>,
    pub start_time: f64,
    pub expiration_time: f64,
    /// Tombstone: set by `cancel_callback`, checked wherever the task
    /// would otherwise be popped off a heap and run. A cancelled task
    /// is never removed from the heap directly — see [`crate::heap`].
    pub cancelled: bool,
    /// `true` once this task has been moved from the timer queue into
    /// the ready queue (its `sort_index` becomes `expiration_time`
    /// rather than `start_time`).
    pub is_queued: bool,
}

/// Reference-counted handle to a scheduled task.
///
/// Cloning a `TaskHandle` is cheap and shares the same underlying
/// state; this is how both the timer queue and the ready queue, and
/// the caller's own `TaskId`-based lookups, observe the same
/// cancellation flag.
#[derive(Clone)]
pub struct TaskHandle(pub Rc<RefCell<TaskInner>>);

impl TaskHandle {
    pub fn new(
        id: TaskId,
        priority: PriorityLevel,
        callback: Callback,
        start_time: f64,
        expiration_time: f64,
    ) -> Self {
        TaskHandle(Rc::new(RefCell::new(TaskInner {
            id,
            priority,
            callback: Some(callback),
            start_time,
            expiration_time,
            cancelled: false,
            is_queued: false,
        })))
    }

    pub fn id(&self) -> TaskId {
        self.0.borrow().id
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.borrow().cancelled
    }

    pub fn cancel(&self) {
        let mut inner = self.0.borrow_mut();
        inner.cancelled = true;
        // Drop the callback eagerly so any captured state (and any
        // Rc cycles it might hold back to the scheduler) is released
        // as soon as the task is cancelled, not whenever the tombstone
        // finally reaches the heap root.
        inner.callback = None;
    }

    pub fn start_time(&self) -> f64 {
        self.0.borrow().start_time
    }

    pub fn expiration_time(&self) -> f64 {
        self.0.borrow().expiration_time
    }

    pub fn priority(&self) -> PriorityLevel {
        self.0.borrow().priority
    }

    pub fn take_callback(&self) -> Option<Callback> {
        self.0.borrow_mut().callback.take()
    }

    pub fn set_callback(&self, cb: Callback) {
        self.0.borrow_mut().callback = Some(cb);
    }

    pub fn has_callback(&self) -> bool {
        self.0.borrow().callback.is_some()
    }

    pub fn is_queued(&self) -> bool {
        self.0.borrow().is_queued
    }

    pub fn set_queued(&self, queued: bool) {
        self.0.borrow_mut().is_queued = queued;
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.borrow();
        f.debug_struct("TaskHandle")
            .field("id", &inner.id)
            .field("priority", &inner.priority)
            .field("start_time", &inner.start_time)
            .field("expiration_time", &inner.expiration_time)
            .field("cancelled", &inner.cancelled)
            .finish()
    }
}

/// Heap key for the timer queue: ordered by `start_time`.
pub struct ByStartTime(pub TaskHandle);

impl HeapKey for ByStartTime {
    fn sort_index(&self) -> f64 {
        self.0.start_time()
    }
    fn id(&self) -> u64 {
        self.0.id().raw()
    }
}

/// Heap key for the ready queue: ordered by `expiration_time`.
pub struct ByExpirationTime(pub TaskHandle);

impl HeapKey for ByExpirationTime {
    fn sort_index(&self) -> f64 {
        self.0.expiration_time()
    }
    fn id(&self) -> u64 {
        self.0.id().raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_callback() -> Callback {
        Box::new(|_| Continuation::Done)
    }

    #[test]
    fn cancelling_drops_the_callback() {
        let handle = TaskHandle::new(TaskId::next(), PriorityLevel::Normal, noop_callback(), 0.0, 5000.0);
        assert!(handle.has_callback());
        handle.cancel();
        assert!(handle.is_cancelled());
        assert!(!handle.has_callback());
    }

    #[test]
    fn clones_share_state() {
        let handle = TaskHandle::new(TaskId::next(), PriorityLevel::Normal, noop_callback(), 0.0, 5000.0);
        let clone = handle.clone();
        handle.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn heap_keys_use_expected_sort_index() {
        let handle = TaskHandle::new(TaskId::next(), PriorityLevel::Normal, noop_callback(), 10.0, 5010.0);
        assert_eq!(ByStartTime(handle.clone()).sort_index(), 10.0);
        assert_eq!(ByExpirationTime(handle).sort_index(), 5010.0);
    }
}
