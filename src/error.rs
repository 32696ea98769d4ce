//! Error types for sparsebuf
//!
//! Provides a unified error type for all operations, plus a helper for
//! writing diagnostics into a caller-owned fixed-capacity buffer.

use std::io::Write;

use thiserror::Error;

use crate::alloc::AllocError;

/// Result type alias using SparseError
pub type Result<T> = std::result::Result<T, SparseError>;

/// Unified error type for sparse buffer operations
#[derive(Debug, Error)]
pub enum SparseError {
    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // -------------------------------------------------------------------------
    // Bounds Errors
    // -------------------------------------------------------------------------
    #[error("Out of bounds: position {pos} + {len} bytes exceeds buffer size {size}")]
    OutOfBounds { pos: usize, len: usize, size: usize },

    #[error("Cannot read past EOF: requested {requested} bytes, filled {filled}")]
    Eof { requested: usize, filled: usize },

    // -------------------------------------------------------------------------
    // Allocation Errors
    // -------------------------------------------------------------------------
    #[error("Allocation failure: {0}")]
    AllocationFailure(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<AllocError> for SparseError {
    fn from(e: AllocError) -> Self {
        SparseError::AllocationFailure(e.to_string())
    }
}

impl SparseError {
    /// Write this error's message into `buf` the way `snprintf` would.
    ///
    /// The message is truncated to `buf.len() - 1` bytes and followed by a
    /// NUL byte. Returns the number of message bytes written, excluding the
    /// terminator. An empty buffer receives nothing.
    pub fn write_to(&self, buf: &mut [u8]) -> usize {
        let Some(capacity) = buf.len().checked_sub(1) else {
            return 0;
        };

        let mut cursor = std::io::Cursor::new(&mut buf[..capacity]);
        // A full cursor reports WriteZero; the truncated prefix is what we want.
        let _ = write!(cursor, "{}", self);
        let written = cursor.position() as usize;

        buf[written] = 0;
        written
    }
}
