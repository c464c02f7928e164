//! Kernel-style print macros for the scheduler
//!
//! Thread-safe, context-aware debug output similar to Linux kernel's printk.
//! Automatically includes the currently-running task id and an optional
//! timestamp.
//!
//! # Environment Variables
//!
//! - `PRIOSCHED_FLUSH_EPRINT=1` - Flush stderr after each print (useful for debugging crashes)
//! - `PRIOSCHED_LOG_LEVEL=<level>` - Set log level: 0=off, 1=error, 2=warn, 3=info, 4=debug, 5=trace
//! - `PRIOSCHED_LOG_TIME=1` - Include nanosecond timestamp in output
//!
//! # Output Format
//!
//! Without timestamp: `[LEVEL] [t<task>] message`
//! With timestamp:    `[LEVEL] [<ns>] [t<task>] message`
//!
//! Examples:
//! - `[DEBUG] [t5] Started processing`
//! - `[INFO]  [12345678] [t--] Flushing queued work`
//! - `[ERROR] [t--] profiling buffer exhausted`
//!
//! # Usage
//!
//! ```ignore
//! use priosched_core::{sdebug, sinfo, swarn, serr};
//!
//! // User just provides message - context is automatic
//! sdebug!("Processing task {}", task_id);
//! sinfo!("Flush completed");
//! swarn!("Unexpected state: {:?}", state);
//! serr!("Callback panicked!");
//! ```

use crate::env::env_get_bool;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::Instant;

/// Log levels (matches common conventions)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Off,
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Off => "",
            LogLevel::Error => "[ERROR]",
            LogLevel::Warn => "[WARN] ",
            LogLevel::Info => "[INFO] ",
            LogLevel::Debug => "[DEBUG]",
            LogLevel::Trace => "[TRACE]",
        }
    }
}

static FLUSH_ENABLED: AtomicBool = AtomicBool::new(false);
static TIME_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);
static INITIALIZED: AtomicBool = AtomicBool::new(false);

static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize logging from environment variables.
///
/// Called automatically on first log, but can be called explicitly for
/// deterministic initialization.
pub fn init() {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    START_TIME.get_or_init(Instant::now);

    FLUSH_ENABLED.store(env_get_bool("PRIOSCHED_FLUSH_EPRINT", false), Ordering::Relaxed);
    TIME_ENABLED.store(env_get_bool("PRIOSCHED_LOG_TIME", false), Ordering::Relaxed);

    if let Ok(val) = std::env::var("PRIOSCHED_LOG_LEVEL") {
        let level = match val.to_lowercase().as_str() {
            "off" | "0" => LogLevel::Off,
            "error" | "1" => LogLevel::Error,
            "warn" | "2" => LogLevel::Warn,
            "info" | "3" => LogLevel::Info,
            "debug" | "4" => LogLevel::Debug,
            "trace" | "5" => LogLevel::Trace,
            _ => LogLevel::Info,
        };
        LOG_LEVEL.store(level as u8, Ordering::Relaxed);
    }
}

#[inline]
pub fn flush_enabled() -> bool {
    if !INITIALIZED.load(Ordering::Relaxed) {
        init();
    }
    FLUSH_ENABLED.load(Ordering::Relaxed)
}

#[inline]
pub fn time_enabled() -> bool {
    if !INITIALIZED.load(Ordering::Relaxed) {
        init();
    }
    TIME_ENABLED.load(Ordering::Relaxed)
}

#[inline]
pub fn log_level() -> LogLevel {
    if !INITIALIZED.load(Ordering::Relaxed) {
        init();
    }
    LogLevel::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

pub fn set_log_level(level: LogLevel) {
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn set_flush_enabled(enabled: bool) {
    FLUSH_ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn set_time_enabled(enabled: bool) {
    TIME_ENABLED.store(enabled, Ordering::Relaxed);
}

#[inline]
pub fn level_enabled(level: LogLevel) -> bool {
    level as u8 <= log_level() as u8
}

#[inline]
pub fn elapsed_ns() -> u64 {
    let start = START_TIME.get_or_init(Instant::now);
    start.elapsed().as_nanos() as u64
}

// Since the scheduler core is single-threaded by construction, one
// thread-local cell is enough to track "the task currently running its
// callback" — there is no worker pool to disambiguate.
thread_local! {
    static CURRENT_TASK: std::cell::Cell<Option<u64>> = const { std::cell::Cell::new(None) };
}

/// Record the task id whose callback is currently executing.
pub fn set_current_task(id: u64) {
    CURRENT_TASK.with(|t| t.set(Some(id)));
}

/// Clear the current-task marker (called once the callback returns).
pub fn clear_current_task() {
    CURRENT_TASK.with(|t| t.set(None));
}

#[inline]
pub fn get_current_task() -> Option<u64> {
    CURRENT_TASK.with(|t| t.get())
}

fn format_context() -> String {
    match get_current_task() {
        Some(id) => format!("[t{}]", id),
        None => "[t--]".to_string(),
    }
}

#[doc(hidden)]
pub fn _sprint_impl(args: std::fmt::Arguments<'_>) {
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    let _ = handle.write_fmt(args);
    if flush_enabled() {
        let _ = handle.flush();
    }
}

#[doc(hidden)]
pub fn _sprintln_impl(args: std::fmt::Arguments<'_>) {
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    let _ = handle.write_fmt(args);
    let _ = handle.write_all(b"\n");
    if flush_enabled() {
        let _ = handle.flush();
    }
}

#[doc(hidden)]
pub fn _slog_impl(level: LogLevel, args: std::fmt::Arguments<'_>) {
    if !level_enabled(level) {
        return;
    }

    let stderr = std::io::stderr();
    let mut handle = stderr.lock();

    let _ = write!(handle, "{} ", level.prefix());

    if time_enabled() {
        let _ = write!(handle, "[{}] ", elapsed_ns());
    }

    let _ = write!(handle, "{} ", format_context());

    let _ = handle.write_fmt(args);
    let _ = handle.write_all(b"\n");

    if flush_enabled() {
        let _ = handle.flush();
    }
}

/// Print to stderr (no newline, no context). Like `eprint!` but with
/// optional auto-flush.
#[macro_export]
macro_rules! sprint {
    ($($arg:tt)*) => {{
        $crate::log::_sprint_impl(format_args!($($arg)*));
    }};
}

/// Print to stderr with newline (no context). Like `eprintln!` but with
/// optional auto-flush.
#[macro_export]
macro_rules! sprintln {
    () => {{
        $crate::log::_sprintln_impl(format_args!(""));
    }};
    ($($arg:tt)*) => {{
        $crate::log::_sprintln_impl(format_args!($($arg)*));
    }};
}

/// Error level log with context
#[macro_export]
macro_rules! serr {
    ($($arg:tt)*) => {{
        $crate::log::_slog_impl($crate::log::LogLevel::Error, format_args!($($arg)*));
    }};
}

/// Warning level log with context
#[macro_export]
macro_rules! swarn {
    ($($arg:tt)*) => {{
        $crate::log::_slog_impl($crate::log::LogLevel::Warn, format_args!($($arg)*));
    }};
}

/// Info level log with context
#[macro_export]
macro_rules! sinfo {
    ($($arg:tt)*) => {{
        $crate::log::_slog_impl($crate::log::LogLevel::Info, format_args!($($arg)*));
    }};
}

/// Debug level log with context
#[macro_export]
macro_rules! sdebug {
    ($($arg:tt)*) => {{
        $crate::log::_slog_impl($crate::log::LogLevel::Debug, format_args!($($arg)*));
    }};
}

/// Trace level log with context
#[macro_export]
macro_rules! strace {
    ($($arg:tt)*) => {{
        $crate::log::_slog_impl($crate::log::LogLevel::Trace, format_args!($($arg)*));
    }};
}
