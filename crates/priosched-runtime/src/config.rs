//! Scheduler configuration

use std::time::Duration;

/// Upper bound on requested frame rate; below this the browser clamps
/// `forceFrameRate` rather than honoring an absurdly small frame
/// budget. See `Scheduler::force_frame_rate`.
pub const MAX_FORCEABLE_FPS: u32 = 125;

/// Default yield budget, in milliseconds, restored by `forceFrameRate(0)`.
pub const DEFAULT_FRAME_INTERVAL_MS: f64 = 5.0;

/// Configuration for a [`crate::scheduler::Scheduler`].
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Target time budget per `perform_work_until_deadline` slice
    /// before `should_yield_to_host` starts returning `true`. Default:
    /// 5ms, matching a ~180fps host frame budget.
    pub frame_interval: Duration,

    /// Whether the ring-buffer profiler records `ProfilingSink`
    /// events. Off by default: recording costs a write per state
    /// transition.
    pub profiling: bool,

    /// Initial capacity (in i32 slots) for the profiling buffer.
    pub profiling_initial_capacity: usize,

    /// Hard cap on the profiling buffer; once reached, recording stops
    /// and `SchedError::ProfilingBufferExhausted` is reported once.
    pub profiling_max_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(5),
            profiling: false,
            profiling_initial_capacity: 131_072,
            profiling_max_capacity: 524_288,
        }
    }
}

impl SchedulerConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-slice frame interval.
    pub fn frame_interval(mut self, d: Duration) -> Self {
        self.frame_interval = d;
        self
    }

    /// Enable or disable profiling event recording.
    pub fn profiling(mut self, enable: bool) -> Self {
        self.profiling = enable;
        self
    }

    /// Set the profiling buffer's initial capacity, in i32 slots.
    pub fn profiling_initial_capacity(mut self, n: usize) -> Self {
        self.profiling_initial_capacity = n;
        self
    }

    /// Set the profiling buffer's hard cap, in i32 slots.
    pub fn profiling_max_capacity(mut self, n: usize) -> Self {
        self.profiling_max_capacity = n;
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.frame_interval.is_zero() {
            return Err("frame_interval must be greater than zero");
        }
        if self.profiling_initial_capacity == 0 {
            return Err("profiling_initial_capacity must be at least 1");
        }
        if self.profiling_max_capacity < self.profiling_initial_capacity {
            return Err("profiling_max_capacity must be >= profiling_initial_capacity");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SchedulerConfig::default().validate().is_ok());
    }

    #[test]
    fn builder_methods_chain() {
        let cfg = SchedulerConfig::new()
            .frame_interval(Duration::from_millis(8))
            .profiling(true)
            .profiling_initial_capacity(1024)
            .profiling_max_capacity(4096);
        assert_eq!(cfg.frame_interval, Duration::from_millis(8));
        assert!(cfg.profiling);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_frame_interval() {
        let cfg = SchedulerConfig::new().frame_interval(Duration::ZERO);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_max_below_initial_capacity() {
        let cfg = SchedulerConfig::new()
            .profiling_initial_capacity(1000)
            .profiling_max_capacity(500);
        assert!(cfg.validate().is_err());
    }
}
