//! Environment variable utilities
//!
//! Generic `env_get<T>` function for parsing environment variables with defaults.
//!
//! # Usage
//!
//! ```ignore
//! use priosched_core::env::{env_get, env_get_bool};
//!
//! // Get with type inference
//! let frame_ms: u64 = env_get("PRIOSCHED_FRAME_INTERVAL_MS", 5);
//! let cap: usize = env_get("PRIOSCHED_PROFILING_CAP", 524_288);
//! let name: String = env_get("PRIOSCHED_NAME", "default".to_string());
//!
//! // Boolean helper (accepts "1", "true", "yes", "on")
//! let profiling: bool = env_get_bool("PRIOSCHED_PROFILING", false);
//! ```

use std::str::FromStr;

/// Get environment variable parsed as type T, or return default
///
/// Works with any type that implements `FromStr`.
///
/// # Examples
///
/// ```ignore
/// let count: usize = env_get("COUNT", 10);
/// let ratio: f64 = env_get("RATIO", 0.5);
/// let name: String = env_get("NAME", "default".to_string());
/// ```
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Get environment variable as boolean
///
/// Accepts: "1", "true", "yes", "on" (case-insensitive) as true.
/// Everything else (including unset) returns the default.
///
/// # Examples
///
/// ```ignore
/// let debug = env_get_bool("DEBUG", false);
/// let verbose = env_get_bool("VERBOSE", true);
/// ```
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

/// Get environment variable as optional value
///
/// Returns `Some(T)` if the variable is set and parses successfully,
/// `None` otherwise.
///
/// # Examples
///
/// ```ignore
/// let maybe_port: Option<u16> = env_get_opt("PORT");
/// if let Some(port) = maybe_port {
///     println!("Using port {}", port);
/// }
/// ```
#[inline]
pub fn env_get_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Get environment variable as string, or return default
///
/// Convenience wrapper that doesn't require `FromStr`.
#[inline]
pub fn env_get_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Check if environment variable is set (regardless of value)
#[inline]
pub fn env_is_set(key: &str) -> bool {
    std::env::var(key).is_ok()
}

// ============================================================================
// Tests
// ============================================================================
