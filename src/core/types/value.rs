//! Value kinds and decoded values for memory watchers
//!
//! Every watcher carries a [`ValueKind`] tag fixed at construction. The tag
//! owns the per-kind behavior the update loop needs: scratch buffer size,
//! the zero value used before the first successful read, and the decode
//! routine from raw bytes. This replaces dispatching on type names or on a
//! class hierarchy with a single table keyed by the tag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem;

/// Text encoding for string watchers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    Utf8,
    Utf16,
}

impl TextEncoding {
    /// Bytes occupied by one code unit
    pub const fn bytes_per_unit(&self) -> usize {
        match self {
            TextEncoding::Utf8 => 1,
            TextEncoding::Utf16 => 2,
        }
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        TextEncoding::Utf8
    }
}

/// The fixed interpretation a watcher reads memory as.
///
/// For `Text`, `length` counts code units, so the read buffer is `length`
/// bytes for UTF-8 and `length * 2` bytes for UTF-16.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    ISize,
    U8,
    U16,
    U32,
    U64,
    USize,
    F32,
    F64,
    Text {
        length: u32,
        encoding: TextEncoding,
    },
}

impl ValueKind {
    /// Returns the exact scratch buffer size in bytes for one read.
    ///
    /// Size kinds use the native pointer width of the build, which is
    /// 4 bytes on 32-bit targets and 8 bytes on 64-bit targets.
    pub fn byte_len(&self) -> usize {
        match self {
            ValueKind::Bool | ValueKind::I8 | ValueKind::U8 => 1,
            ValueKind::I16 | ValueKind::U16 => 2,
            ValueKind::I32 | ValueKind::U32 | ValueKind::F32 => 4,
            ValueKind::I64 | ValueKind::U64 | ValueKind::F64 => 8,
            ValueKind::ISize | ValueKind::USize => mem::size_of::<usize>(),
            ValueKind::Text { length, encoding } => *length as usize * encoding.bytes_per_unit(),
        }
    }

    /// Returns the value a fresh watcher of this kind holds before its
    /// first successful read
    pub fn zero(&self) -> Value {
        match self {
            ValueKind::Bool => Value::Bool(false),
            ValueKind::I8 => Value::I8(0),
            ValueKind::I16 => Value::I16(0),
            ValueKind::I32 => Value::I32(0),
            ValueKind::I64 => Value::I64(0),
            ValueKind::ISize => Value::ISize(0),
            ValueKind::U8 => Value::U8(0),
            ValueKind::U16 => Value::U16(0),
            ValueKind::U32 => Value::U32(0),
            ValueKind::U64 => Value::U64(0),
            ValueKind::USize => Value::USize(0),
            ValueKind::F32 => Value::F32(0.0),
            ValueKind::F64 => Value::F64(0.0),
            ValueKind::Text { .. } => Value::Text(String::new()),
        }
    }

    /// Decodes a scratch buffer as a value of this kind.
    ///
    /// The buffer must be exactly [`byte_len`](Self::byte_len) bytes;
    /// anything else returns `None`. Scalars decode little-endian, matching
    /// the raw bytes the read capability returns on every supported target.
    /// Text truncates at the first NUL in either encoding and decodes
    /// lossily, so malformed sequences become U+FFFD instead of an error.
    pub fn decode(&self, bytes: &[u8]) -> Option<Value> {
        if bytes.len() != self.byte_len() {
            return None;
        }

        Some(match *self {
            ValueKind::Bool => Value::Bool(bytes[0] != 0),
            ValueKind::I8 => Value::I8(bytes[0] as i8),
            ValueKind::I16 => Value::I16(i16::from_le_bytes(bytes.try_into().ok()?)),
            ValueKind::I32 => Value::I32(i32::from_le_bytes(bytes.try_into().ok()?)),
            ValueKind::I64 => Value::I64(i64::from_le_bytes(bytes.try_into().ok()?)),
            ValueKind::ISize => {
                if bytes.len() == 8 {
                    Value::ISize(i64::from_le_bytes(bytes.try_into().ok()?) as isize)
                } else {
                    Value::ISize(i32::from_le_bytes(bytes.try_into().ok()?) as isize)
                }
            }
            ValueKind::U8 => Value::U8(bytes[0]),
            ValueKind::U16 => Value::U16(u16::from_le_bytes(bytes.try_into().ok()?)),
            ValueKind::U32 => Value::U32(u32::from_le_bytes(bytes.try_into().ok()?)),
            ValueKind::U64 => Value::U64(u64::from_le_bytes(bytes.try_into().ok()?)),
            ValueKind::USize => {
                if bytes.len() == 8 {
                    Value::USize(u64::from_le_bytes(bytes.try_into().ok()?) as usize)
                } else {
                    Value::USize(u32::from_le_bytes(bytes.try_into().ok()?) as usize)
                }
            }
            ValueKind::F32 => Value::F32(f32::from_le_bytes(bytes.try_into().ok()?)),
            ValueKind::F64 => Value::F64(f64::from_le_bytes(bytes.try_into().ok()?)),
            ValueKind::Text { encoding, .. } => Value::Text(decode_text(bytes, encoding)),
        })
    }
}

fn decode_text(bytes: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Utf8 => {
            let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
            String::from_utf8_lossy(&bytes[..end]).into_owned()
        }
        TextEncoding::Utf16 => {
            let mut units = Vec::with_capacity(bytes.len() / 2);
            for pair in bytes.chunks_exact(2) {
                let unit = u16::from_le_bytes([pair[0], pair[1]]);
                if unit == 0 {
                    break;
                }
                units.push(unit);
            }
            String::from_utf16_lossy(&units)
        }
    }
}

/// A decoded value observed at a watched location.
///
/// Equality is value equality per kind: strings compare by content, floats
/// by standard IEEE comparison (`-0.0 == 0.0`, `NaN != NaN`, a one-ULP
/// drift is a change).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    ISize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    USize(usize),
    F32(f32),
    F64(f64),
    Text(String),
}

impl Value {
    /// Returns the boolean payload, if this is a bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns any signed integer payload widened to i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I8(v) => Some(*v as i64),
            Value::I16(v) => Some(*v as i64),
            Value::I32(v) => Some(*v as i64),
            Value::I64(v) => Some(*v),
            Value::ISize(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Returns any unsigned integer payload widened to u64
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U8(v) => Some(*v as u64),
            Value::U16(v) => Some(*v as u64),
            Value::U32(v) => Some(*v as u64),
            Value::U64(v) => Some(*v),
            Value::USize(v) => Some(*v as u64),
            _ => None,
        }
    }

    /// Returns any float payload widened to f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F32(v) => Some(*v as f64),
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::I8(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::ISize(v) => write!(f, "{}", v),
            Value::U8(v) => write!(f, "{}", v),
            Value::U16(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::USize(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}
