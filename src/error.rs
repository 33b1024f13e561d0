//! Error surface for the hash-entry engine.
//!
//! Recoverable conditions (allocator exhaustion, an oversize value) surface
//! as `CoreError`. Anything that indicates a corrupted heap or a caller
//! violating an invariant (an LRU cycle, a negative header field) is a bug,
//! not a recoverable condition, and panics instead.

use core::fmt;

/// Recoverable error conditions raised by the hash-entry engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    /// The allocator could not supply enough blocks for the requested entry.
    OutOfMemory,
    /// A value's length exceeds what a single streaming write can bound
    /// (`value_length > i32::MAX`).
    ValueTooLarge,
    /// A key or value length does not fit the supplied source/sink.
    LengthMismatch,
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::OutOfMemory => f.write_str("allocator exhausted: no free blocks"),
            CoreError::ValueTooLarge => {
                f.write_str("value length exceeds the maximum streamable size")
            }
            CoreError::LengthMismatch => {
                f.write_str("source/sink length does not match the entry's stored length")
            }
        }
    }
}

impl core::error::Error for CoreError {}
