//! # priosched-runtime
//!
//! The scheduler itself: the priority queues, the work-loop, and the
//! pieces an embedder plugs in to drive it — a [`Clock`], a
//! [`HostBridge`] for arranging re-entry, and an optional
//! [`ProfilingSink`].
//!
//! This crate has no opinion about *how* it gets invoked: [`Scheduler`]
//! doesn't spawn threads or own an event loop. Something outside it —
//! a GUI toolkit's message pump, a game's frame loop, or
//! [`ThreadHostBridge`] for the no-host-at-all case — calls
//! `perform_work_until_deadline` and `handle_timeout` when the bridge
//! says it's time.
//!
//! ## Modules
//!
//! - `config` - builder-style [`SchedulerConfig`]
//! - `clock` - the [`Clock`] trait and its `System`/`Manual` implementations
//! - `host` - the [`HostBridge`] trait and its reference implementations
//! - `profiling` - the [`ProfilingSink`] trait and the buffered recorder
//! - `scheduler` - [`Scheduler`] itself: queues and work-loop

#![allow(dead_code)]

pub mod clock;
pub mod config;
pub mod host;
pub mod profiling;
pub mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{SchedulerConfig, DEFAULT_FRAME_INTERVAL_MS, MAX_FORCEABLE_FPS};
pub use host::{HostBridge, ManualHostBridge, ThreadHostBridge, Wake};
pub use profiling::{BufferProfiler, EventTag, NullProfiler, ProfilingSink};
pub use scheduler::Scheduler;
