//! Core type definitions for splitwatch
//!
//! This module contains the fundamental types used throughout the crate:
//! the address wrapper, value kinds with their decode table, and error
//! types.

mod address;
mod error;
mod value;

// Re-export all public types
pub use address::Address;
pub use error::{WatchError, WatchResult};
pub use value::{TextEncoding, Value, ValueKind};

// Common type aliases
pub type ProcessId = u32;
