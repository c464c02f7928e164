//! Error types for the priority scheduler

use core::fmt;

/// Result type for scheduler operations
pub type SchedResult<T> = Result<T, SchedError>;

/// Errors that can occur in scheduler operations.
///
/// Most scheduler entry points are infallible by design — cancellation
/// of an unknown or already-fired task id is a no-op, not an error, and
/// a panicking callback is recorded and rescheduled around rather than
/// silently dropped, so one bad task doesn't wedge the queue even
/// though the panic itself still propagates to the caller. `SchedError`
/// covers the handful of cases where the caller genuinely did something
/// the scheduler can't honor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedError {
    /// `force_frame_rate` was called with an fps outside `(0, 125]`.
    /// The host's previous frame interval is left unchanged.
    InvalidFrameRate {
        /// The rejected value, for the log line / caller diagnostics.
        fps: u32,
    },

    /// The profiling ring buffer hit its hard cap and stopped
    /// recording. Profiling continues to no-op rather than panicking;
    /// this variant is surfaced once so a caller can decide whether to
    /// disable profiling or widen the buffer.
    ProfilingBufferExhausted,
}

impl fmt::Display for SchedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedError::InvalidFrameRate { fps } => {
                write!(f, "invalid frame rate requested: {}fps", fps)
            }
            SchedError::ProfilingBufferExhausted => {
                write!(f, "profiling buffer reached its maximum size and stopped recording")
            }
        }
    }
}

impl std::error::Error for SchedError {}
