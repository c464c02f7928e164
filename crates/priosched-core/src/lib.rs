//! # priosched-core
//!
//! Core types shared between the scheduler runtime and anything that
//! embeds it. This crate is platform-agnostic: no threads, no I/O, no
//! wall-clock reads. All of that lives in `priosched-runtime`.
//!
//! ## Modules
//!
//! - `id` - monotonic task identifier
//! - `priority` - priority levels and their derived timeouts
//! - `heap` - generic `(sort_index, id)` min-heap shared by both queues
//! - `task` - task state (`TaskHandle`/`TaskInner`) and continuations
//! - `error` - error types
//! - `log` - kernel-style debug printing macros
//! - `env` - environment variable utilities

#![allow(dead_code)]

pub mod env;
pub mod error;
pub mod heap;
pub mod id;
pub mod log;
pub mod priority;
pub mod task;

pub use error::{SchedError, SchedResult};
pub use heap::{HeapKey, MinHeap};
pub use id::TaskId;
pub use priority::{PriorityLevel, MAX_31BIT_MS};
pub use task::{ByExpirationTime, ByStartTime, Callback, Continuation, TaskHandle, TaskInner};
pub use env::{env_get, env_get_bool, env_get_opt, env_get_str, env_is_set};
