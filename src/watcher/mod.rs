//! Memory watchers: typed, stateful probes over a target process
//!
//! A [`Watcher`] is bound at construction to a (module, offset) location
//! and a [`ValueKind`]. Each polling tick the caller passes the process
//! capability to [`Watcher::update`], which re-resolves the module base,
//! reads the location, decodes the bytes, and reports whether the decoded
//! value differs from the previous tick's.
//!
//! Failures never escape an update. A failed module resolution or read
//! leaves the current value untouched while the previous value still
//! advances, so a failed tick reports "no change" by construction.

use crate::core::types::{TextEncoding, Value, ValueKind};
use crate::process::ProcessMemory;
use tracing::trace;

/// A stateful probe over one memory location in the watched process.
///
/// The location (module name plus byte offset from the module's base) and
/// the value kind are fixed for the watcher's lifetime; only `current` and
/// `previous` change, and only through [`update`](Self::update). Module
/// bases can move between attaches, so resolution happens on every tick
/// rather than once at construction, and construction itself performs no
/// I/O: a module that is absent or not yet loaded is not an error here.
#[derive(Debug, Clone)]
pub struct Watcher {
    module: String,
    offset: u64,
    kind: ValueKind,
    current: Value,
    previous: Value,
}

impl Watcher {
    /// Creates a watcher for the given location and kind.
    ///
    /// `current` and `previous` both start at the kind's zero value, so a
    /// fresh watcher reports no change until its first successful read of
    /// a non-zero value.
    pub fn new(module: impl Into<String>, offset: u64, kind: ValueKind) -> Self {
        let zero = kind.zero();
        Watcher {
            module: module.into(),
            offset,
            kind,
            current: zero.clone(),
            previous: zero,
        }
    }

    /// Creates a bool watcher (one byte, zero means false)
    pub fn bool_at(module: impl Into<String>, offset: u64) -> Self {
        Watcher::new(module, offset, ValueKind::Bool)
    }

    /// Creates an i8 watcher
    pub fn i8_at(module: impl Into<String>, offset: u64) -> Self {
        Watcher::new(module, offset, ValueKind::I8)
    }

    /// Creates an i16 watcher
    pub fn i16_at(module: impl Into<String>, offset: u64) -> Self {
        Watcher::new(module, offset, ValueKind::I16)
    }

    /// Creates an i32 watcher
    pub fn i32_at(module: impl Into<String>, offset: u64) -> Self {
        Watcher::new(module, offset, ValueKind::I32)
    }

    /// Creates an i64 watcher
    pub fn i64_at(module: impl Into<String>, offset: u64) -> Self {
        Watcher::new(module, offset, ValueKind::I64)
    }

    /// Creates an isize watcher at the build's pointer width
    pub fn isize_at(module: impl Into<String>, offset: u64) -> Self {
        Watcher::new(module, offset, ValueKind::ISize)
    }

    /// Creates a u8 watcher
    pub fn u8_at(module: impl Into<String>, offset: u64) -> Self {
        Watcher::new(module, offset, ValueKind::U8)
    }

    /// Creates a u16 watcher
    pub fn u16_at(module: impl Into<String>, offset: u64) -> Self {
        Watcher::new(module, offset, ValueKind::U16)
    }

    /// Creates a u32 watcher
    pub fn u32_at(module: impl Into<String>, offset: u64) -> Self {
        Watcher::new(module, offset, ValueKind::U32)
    }

    /// Creates a u64 watcher
    pub fn u64_at(module: impl Into<String>, offset: u64) -> Self {
        Watcher::new(module, offset, ValueKind::U64)
    }

    /// Creates a usize watcher at the build's pointer width
    pub fn usize_at(module: impl Into<String>, offset: u64) -> Self {
        Watcher::new(module, offset, ValueKind::USize)
    }

    /// Creates an f32 watcher
    pub fn f32_at(module: impl Into<String>, offset: u64) -> Self {
        Watcher::new(module, offset, ValueKind::F32)
    }

    /// Creates an f64 watcher
    pub fn f64_at(module: impl Into<String>, offset: u64) -> Self {
        Watcher::new(module, offset, ValueKind::F64)
    }

    /// Creates a UTF-8 text watcher reading `length` bytes
    pub fn text_at(module: impl Into<String>, offset: u64, length: u32) -> Self {
        Watcher::new(
            module,
            offset,
            ValueKind::Text {
                length,
                encoding: TextEncoding::Utf8,
            },
        )
    }

    /// Creates a UTF-16 text watcher reading `length` code units
    /// (`length * 2` bytes)
    pub fn utf16_text_at(module: impl Into<String>, offset: u64, length: u32) -> Self {
        Watcher::new(
            module,
            offset,
            ValueKind::Text {
                length,
                encoding: TextEncoding::Utf16,
            },
        )
    }

    /// Polls the watched location once and returns whether the value
    /// changed since the previous tick.
    ///
    /// The previous value always advances to the pre-call current value,
    /// even when resolution or the read fails; in that case the current
    /// value is left untouched and the tick reports `false`. Callers that
    /// need liveness must check [`ProcessMemory::is_open`] themselves — a
    /// dead process looks identical to a value that stopped changing.
    pub fn update<P: ProcessMemory + ?Sized>(&mut self, process: &P) -> bool {
        self.previous = self.current.clone();

        let base = match process.module_address(&self.module) {
            Ok(base) if !base.is_null() => base,
            Ok(_) | Err(_) => {
                trace!(module = %self.module, "module base unresolved, keeping stale value");
                return self.changed();
            }
        };

        let target = base.offset(self.offset);
        let mut buf = vec![0u8; self.kind.byte_len()];
        if let Err(err) = process.read_exact(target, &mut buf) {
            trace!(address = %target, %err, "read failed, keeping stale value");
            return self.changed();
        }

        if let Some(value) = self.kind.decode(&buf) {
            self.current = value;
        }

        self.changed()
    }

    /// Whether the value changed in the most recent update cycle.
    ///
    /// Non-mutating; agrees with the boolean the last [`update`](Self::update)
    /// call returned.
    pub fn changed(&self) -> bool {
        self.current != self.previous
    }

    /// Last successfully decoded value
    pub fn current(&self) -> &Value {
        &self.current
    }

    /// The value `current` held immediately before the most recent update
    pub fn previous(&self) -> &Value {
        &self.previous
    }

    /// Name of the module this watcher resolves on every update
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Byte offset from the module's base address
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// The fixed value interpretation of this watcher
    pub fn kind(&self) -> ValueKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Address, WatchError, WatchResult};
    use std::cell::RefCell;

    /// Replays one scripted outcome per update call.
    struct FakeProcess {
        base: Address,
        reads: RefCell<Vec<Option<Vec<u8>>>>,
    }

    impl FakeProcess {
        fn new(base: u64, reads: Vec<Option<Vec<u8>>>) -> Self {
            FakeProcess {
                base: Address::new(base),
                reads: RefCell::new(reads),
            }
        }
    }

    impl ProcessMemory for FakeProcess {
        fn is_open(&self) -> bool {
            true
        }

        fn module_address(&self, _module: &str) -> WatchResult<Address> {
            Ok(self.base)
        }

        fn module_size(&self, _module: &str) -> WatchResult<u64> {
            Ok(0x1000)
        }

        fn read_exact(&self, address: Address, buf: &mut [u8]) -> WatchResult<()> {
            let mut reads = self.reads.borrow_mut();
            if reads.is_empty() {
                return Err(WatchError::read_failed(address, buf.len(), "script empty"));
            }
            match reads.remove(0) {
                Some(bytes) => {
                    assert_eq!(bytes.len(), buf.len(), "scripted read has wrong width");
                    buf.copy_from_slice(&bytes);
                    Ok(())
                }
                None => Err(WatchError::read_failed(address, buf.len(), "scripted failure")),
            }
        }
    }

    #[test]
    fn test_fresh_watcher_holds_zero_values() {
        let watcher = Watcher::u32_at("game.exe", 0x10);
        assert_eq!(watcher.current(), &Value::U32(0));
        assert_eq!(watcher.previous(), &Value::U32(0));
        assert!(!watcher.changed());
    }

    #[test]
    fn test_probe_location_is_fixed() {
        let watcher = Watcher::f32_at("game.exe", 0x24);
        assert_eq!(watcher.module(), "game.exe");
        assert_eq!(watcher.offset(), 0x24);
        assert_eq!(watcher.kind(), ValueKind::F32);
    }

    #[test]
    fn test_update_detects_change() {
        let process = FakeProcess::new(
            0x400000,
            vec![Some(vec![100, 0, 0, 0]), Some(vec![100, 0, 0, 0])],
        );
        let mut watcher = Watcher::u32_at("game.exe", 0x10);

        assert!(watcher.update(&process));
        assert_eq!(watcher.current(), &Value::U32(100));
        assert_eq!(watcher.previous(), &Value::U32(0));

        assert!(!watcher.update(&process));
        assert_eq!(watcher.previous(), &Value::U32(100));
    }

    #[test]
    fn test_update_return_agrees_with_changed_query() {
        let process = FakeProcess::new(0x400000, vec![Some(vec![1]), Some(vec![1])]);
        let mut watcher = Watcher::bool_at("game.exe", 0x8);

        assert_eq!(watcher.update(&process), watcher.changed());
        assert!(watcher.changed());
        // Querying twice does not mutate.
        assert!(watcher.changed());

        assert_eq!(watcher.update(&process), watcher.changed());
        assert!(!watcher.changed());
    }

    #[test]
    fn test_failed_read_keeps_current_and_advances_previous() {
        let process = FakeProcess::new(0x400000, vec![Some(vec![7, 0]), None]);
        let mut watcher = Watcher::u16_at("game.exe", 0x10);

        assert!(watcher.update(&process));

        assert!(!watcher.update(&process));
        assert_eq!(watcher.current(), &Value::U16(7));
        assert_eq!(watcher.previous(), &Value::U16(7));
    }

    #[test]
    fn test_unresolved_module_reads_nothing() {
        struct NoModules;

        impl ProcessMemory for NoModules {
            fn is_open(&self) -> bool {
                true
            }

            fn module_address(&self, module: &str) -> WatchResult<Address> {
                Err(WatchError::ModuleNotFound(module.to_string()))
            }

            fn module_size(&self, module: &str) -> WatchResult<u64> {
                Err(WatchError::ModuleNotFound(module.to_string()))
            }

            fn read_exact(&self, _address: Address, _buf: &mut [u8]) -> WatchResult<()> {
                panic!("read must not be attempted without a module base");
            }
        }

        let mut watcher = Watcher::i64_at("missing.dll", 0x100);
        assert!(!watcher.update(&NoModules));
        assert_eq!(watcher.current(), &Value::I64(0));
    }

    #[test]
    fn test_null_module_base_treated_as_unresolved() {
        let process = FakeProcess::new(0, vec![Some(vec![1, 0, 0, 0])]);
        let mut watcher = Watcher::u32_at("game.exe", 0x10);
        assert!(!watcher.update(&process));
        // The scripted read is still queued: update bailed before reading.
        assert_eq!(process.reads.borrow().len(), 1);
    }

    #[test]
    fn test_text_watcher_update() {
        let process = FakeProcess::new(0x400000, vec![Some(b"hello".to_vec())]);
        let mut watcher = Watcher::text_at("game.exe", 0x40, 5);

        assert!(watcher.update(&process));
        assert_eq!(watcher.current(), &Value::Text("hello".to_string()));
        assert_eq!(watcher.previous(), &Value::Text(String::new()));
    }

    #[test]
    fn test_utf16_text_watcher_reads_two_bytes_per_unit() {
        let mut bytes = Vec::new();
        for unit in "hello".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let process = FakeProcess::new(0x400000, vec![Some(bytes)]);
        let mut watcher = Watcher::utf16_text_at("game.exe", 0x40, 5);

        assert!(watcher.update(&process));
        assert_eq!(watcher.current(), &Value::Text("hello".to_string()));
    }

    #[test]
    fn test_negative_zero_read_is_not_a_change() {
        let process = FakeProcess::new(0x400000, vec![Some((-0.0f64).to_le_bytes().to_vec())]);
        let mut watcher = Watcher::f64_at("game.exe", 0x20);

        // -0.0 compares equal to the 0.0 zero value, so no change.
        assert!(!watcher.update(&process));
    }
}
