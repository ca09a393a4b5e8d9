//! splitwatch: typed process-memory watchers for auto-splitting timers
//!
//! The core abstraction is the [`Watcher`]: a stateful probe bound to a
//! (module, offset) location and a fixed value interpretation. Once per
//! polling tick the driving loop passes the attached process to
//! [`Watcher::update`], which re-resolves the module base, performs one
//! raw read, decodes the bytes, and reports whether the value changed
//! since the previous tick. Failures degrade to "no change observed";
//! they never escape an update.
//!
//! The operating system is reached only through the [`ProcessMemory`]
//! capability trait, with native backends for the supported platforms,
//! and the surrounding host environment (timer control, tick rate, user
//! settings) through the traits in [`host`].

pub mod config;
pub mod core;
pub mod host;
pub mod process;
pub mod watcher;

// Re-export main types from the core module
pub use crate::core::types::{
    Address, ProcessId, TextEncoding, Value, ValueKind, WatchError, WatchResult,
};
pub use crate::process::ProcessMemory;
pub use crate::watcher::Watcher;
