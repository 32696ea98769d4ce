//! # sparsebuf
//!
//! A fixed-size byte buffer where only written ranges consume memory:
//! - Bytes never written read as zero
//! - Overlapping or touching writes merge into one stored range
//! - Removing an interval trims or splits the ranges it crosses
//! - Range memory comes from an injectable allocator
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SparseBuffer                            │
//! │          (size, cursor, seek / resize / bounds)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼────────────────┐
//!          │            │                │
//!          ▼            ▼                ▼
//!   ┌─────────────┐ ┌─────────────┐ ┌─────────────┐
//!   │    merge    │ │    split    │ │   project   │
//!   │ (load_range)│ │(remove_range│ │   (read)    │
//!   └──────┬──────┘ └──────┬──────┘ └──────┬──────┘
//!          │               │               │
//!          └───────────────┼───────────────┘
//!                          ▼
//!                  ┌─────────────┐      ┌─────────────────┐
//!                  │  RangeList  │─────▶│ BufferAllocator │
//!                  │  (sorted)   │      │ (alloc/realloc/ │
//!                  └─────────────┘      │    release)     │
//!                                       └─────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use sparsebuf::{SparseBuffer, Whence};
//!
//! let mut buf = SparseBuffer::new(16)?;
//! buf.load_range(2, &[7, 7, 7])?;
//! buf.seek(1, Whence::Start)?;
//!
//! let mut out = [0xff; 5];
//! buf.read(&mut out)?;
//! assert_eq!(out, [0, 7, 7, 7, 0]);
//! # Ok::<(), sparsebuf::SparseError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod alloc;
pub mod range;
pub mod engine;
pub mod buffer;
pub mod assemble;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SparseError, Result};
pub use config::Config;
pub use alloc::{AllocError, BufferAllocator, SystemAllocator};
pub use buffer::{SparseBuffer, Whence};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of sparsebuf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
