//! Task identifier type

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a scheduled task.
///
/// Strictly monotonically increasing from 1 across the process lifetime.
/// `id` is assigned at creation and never reused; it is also the heap
/// tie-breaker: ties broken by `id` ascending, which gives FIFO among
/// entries with equal `sort_index`.
///
/// There is no sentinel "none" value — a `TaskId` always names a task
/// that was, at some point, scheduled.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Allocate the next task id. Process-wide, never reused.
    #[inline]
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        TaskId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for logging/debugging only.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskId({})", self.0)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
