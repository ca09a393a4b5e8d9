//! Custom error types for splitwatch

use std::fmt;
use thiserror::Error;

/// Main error type for process memory operations.
///
/// Watchers never surface these: any failure inside an update degrades to
/// "no change observed this tick". The variants exist for the capability
/// layer (attach, module resolution, raw reads) and for callers that want
/// to know why an attach failed.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Invalid memory address: {0}")]
    InvalidAddress(String),

    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Failed to read {len} bytes at {address}: {reason}")]
    ReadFailed {
        address: String,
        len: usize,
        reason: String,
    },

    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for process memory operations
pub type WatchResult<T> = Result<T, WatchError>;

impl WatchError {
    /// Creates a read failed error
    pub fn read_failed(address: impl fmt::Display, len: usize, reason: impl Into<String>) -> Self {
        WatchError::ReadFailed {
            address: address.to_string(),
            len,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WatchError::InvalidAddress("0xZZZ".to_string());
        assert_eq!(err.to_string(), "Invalid memory address: 0xZZZ");

        let err = WatchError::ProcessNotFound("game.exe".to_string());
        assert_eq!(err.to_string(), "Process not found: game.exe");

        let err = WatchError::ModuleNotFound("game.exe".to_string());
        assert_eq!(err.to_string(), "Module not found: game.exe");

        let err = WatchError::read_failed("0x400010", 4, "address unmapped");
        assert_eq!(
            err.to_string(),
            "Failed to read 4 bytes at 0x400010: address unmapped"
        );
    }

    #[test]
    fn test_read_failed_helper() {
        let err = WatchError::read_failed("0xABCD", 8, "page fault");
        match err {
            WatchError::ReadFailed {
                address,
                len,
                reason,
            } => {
                assert_eq!(address, "0xABCD");
                assert_eq!(len, 8);
                assert_eq!(reason, "page fault");
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_from_io_error() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "test");
        let err: WatchError = io_err.into();
        assert!(matches!(err, WatchError::Io(_)));
    }

    #[test]
    fn test_watch_result_type() {
        fn resolves() -> WatchResult<u64> {
            Ok(0x400000)
        }

        fn fails() -> WatchResult<u64> {
            Err(WatchError::ModuleNotFound("missing.dll".to_string()))
        }

        assert_eq!(resolves().unwrap(), 0x400000);
        assert!(fails().is_err());
    }
}
