//! Core module containing the fundamental types for splitwatch
//!
//! Provides the address wrapper, the tagged value-kind table, and the
//! error types the capability layer reports.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{Address, ProcessId, TextEncoding, Value, ValueKind, WatchError, WatchResult};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
