//! Priority levels and their derived timeouts

use core::fmt;

/// Priority level for a scheduled callback.
///
/// Lower `timeout_ms()` means the task's deadline arrives sooner — see
/// `expiration_time = start_time + timeout(priority)` in the data model.
/// `NoPriority` is a reserved sentinel: it is a valid value to pass
/// around but a `Scheduler` never stores a task under it (out-of-range
/// or `NoPriority` inputs to `schedule_callback`/`run_with_priority` are
/// coerced to `Normal`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PriorityLevel {
    /// Reserved sentinel. Never stored on a task.
    NoPriority = 0,
    /// Already expired at creation — always ready. Never yielded for.
    Immediate = 1,
    /// 250ms timeout.
    UserBlocking = 2,
    /// 5000ms timeout. Default priority outside any callback.
    Normal = 3,
    /// 10000ms timeout.
    Low = 4,
    /// Effectively never expires (2^30 - 1 ms).
    Idle = 5,
}

/// `2^30 - 1`, the "effectively never" timeout used for `Idle`.
pub const MAX_31BIT_MS: i64 = (1 << 30) - 1;

impl PriorityLevel {
    /// Timeout in milliseconds used to derive `expirationTime` from
    /// `startTime`. `Immediate` is already-expired (`-1`): a task at
    /// this priority is always ready and never yielded for.
    #[inline]
    pub const fn timeout_ms(self) -> i64 {
        match self {
            PriorityLevel::NoPriority => PriorityLevel::Normal.timeout_ms(),
            PriorityLevel::Immediate => -1,
            PriorityLevel::UserBlocking => 250,
            PriorityLevel::Normal => 5_000,
            PriorityLevel::Low => 10_000,
            PriorityLevel::Idle => MAX_31BIT_MS,
        }
    }

    /// Coerce the `NoPriority` sentinel to `Normal`; every other level
    /// passes through unchanged.
    #[inline]
    pub const fn coerced(self) -> PriorityLevel {
        match self {
            PriorityLevel::NoPriority => PriorityLevel::Normal,
            other => other,
        }
    }

    /// Decode from a raw `u8`, coercing anything out of range to
    /// `Normal` rather than panicking.
    #[inline]
    pub const fn from_u8(v: u8) -> PriorityLevel {
        match v {
            0 => PriorityLevel::NoPriority,
            1 => PriorityLevel::Immediate,
            2 => PriorityLevel::UserBlocking,
            3 => PriorityLevel::Normal,
            4 => PriorityLevel::Low,
            5 => PriorityLevel::Idle,
            _ => PriorityLevel::Normal,
        }
    }
}

impl Default for PriorityLevel {
    /// Outside any callback, `current_priority_level` returns `Normal`.
    fn default() -> Self {
        PriorityLevel::Normal
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriorityLevel::NoPriority => "no-priority",
            PriorityLevel::Immediate => "immediate",
            PriorityLevel::UserBlocking => "user-blocking",
            PriorityLevel::Normal => "normal",
            PriorityLevel::Low => "low",
            PriorityLevel::Idle => "idle",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_is_already_expired() {
        assert_eq!(PriorityLevel::Immediate.timeout_ms(), -1);
    }

    #[test]
    fn idle_is_effectively_never() {
        assert_eq!(PriorityLevel::Idle.timeout_ms(), (1i64 << 30) - 1);
    }

    #[test]
    fn timeouts_widen_with_decreasing_urgency() {
        assert!(PriorityLevel::UserBlocking.timeout_ms() < PriorityLevel::Normal.timeout_ms());
        assert!(PriorityLevel::Normal.timeout_ms() < PriorityLevel::Low.timeout_ms());
        assert!(PriorityLevel::Low.timeout_ms() < PriorityLevel::Idle.timeout_ms());
    }

    #[test]
    fn no_priority_coerces_to_normal() {
        assert_eq!(PriorityLevel::NoPriority.coerced(), PriorityLevel::Normal);
        assert_eq!(PriorityLevel::Low.coerced(), PriorityLevel::Low);
    }

    #[test]
    fn out_of_range_byte_coerces_to_normal() {
        assert_eq!(PriorityLevel::from_u8(200), PriorityLevel::Normal);
    }

    #[test]
    fn default_is_normal() {
        assert_eq!(PriorityLevel::default(), PriorityLevel::Normal);
    }
}
