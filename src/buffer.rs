//! Sparse Buffer Module
//!
//! The reader facade that ties the range engine together.
//!
//! ## Responsibilities
//! - Own the logical size, the read cursor, and the range list
//! - Validate bounds before handing work to the engine
//! - Route every buffer through the injected allocator
//! - Release all range memory on drop

use bytes::{Bytes, BytesMut};

use crate::alloc::{BufferAllocator, SystemAllocator};
use crate::config::Config;
use crate::engine::{merge, project, split};
use crate::error::{Result, SparseError};
use crate::range::{RangeList, Span};

/// Origin for [`SparseBuffer::seek`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// Offset from the start of the buffer
    Start = 0,

    /// Offset added to the current cursor
    Current = 1,

    /// Offset measured backwards from the logical end
    End = 2,
}

impl TryFrom<u32> for Whence {
    type Error = SparseError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(Whence::Start),
            1 => Ok(Whence::Current),
            2 => Ok(Whence::End),
            other => Err(SparseError::InvalidArgument(format!(
                "invalid seek mode {}",
                other
            ))),
        }
    }
}

/// A fixed-size byte buffer that only stores the ranges written into it
///
/// ## Model
/// - Bytes never written read as zero
/// - Written ranges are merged when they overlap or touch
/// - `read` projects a window starting at the cursor; only `seek` and a
///   shrinking `resize` move the cursor
///
/// ## Concurrency
/// None. Mutating calls take `&mut self`; share across threads only behind
/// an external lock.
#[derive(Debug)]
pub struct SparseBuffer<A: BufferAllocator = SystemAllocator> {
    /// Logical length in bytes
    size: usize,

    /// Read cursor, always `<= size`
    pos: usize,

    /// Stored ranges
    ranges: RangeList,

    /// Source of every range buffer
    allocator: A,
}

impl SparseBuffer<SystemAllocator> {
    /// Create a buffer of `size` bytes backed by the global heap
    pub fn new(size: usize) -> Result<Self> {
        Self::with_allocator(size, SystemAllocator::new())
    }

    /// Create a buffer from a [`Config`]
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let allocator = match config.memory_limit {
            Some(limit) => SystemAllocator::with_limit(limit),
            None => SystemAllocator::new(),
        };

        Self::with_allocator(config.size, allocator)
    }
}

impl<A: BufferAllocator> SparseBuffer<A> {
    /// Create a buffer of `size` bytes using a custom allocator
    pub fn with_allocator(size: usize, allocator: A) -> Result<Self> {
        if size == 0 {
            return Err(SparseError::InvalidArgument("Invalid reader size".to_string()));
        }

        tracing::debug!("Created sparse buffer of {} bytes", size);

        Ok(Self {
            size,
            pos: 0,
            ranges: RangeList::new(),
            allocator,
        })
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Store `bytes` at logical position `pos`
    ///
    /// Overlapping or touching ranges are merged. If an existing range
    /// already covers the whole write, the stored bytes are kept. On error
    /// nothing is changed.
    pub fn load_range(&mut self, pos: usize, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Err(SparseError::InvalidArgument("Invalid buffer size".to_string()));
        }

        match pos.checked_add(bytes.len()) {
            Some(end) if end <= self.size => {}
            _ => {
                return Err(SparseError::OutOfBounds {
                    pos,
                    len: bytes.len(),
                    size: self.size,
                })
            }
        }

        tracing::debug!("load_range pos={} len={}", pos, bytes.len());

        merge::load_range(&mut self.ranges, &self.allocator, pos, bytes).map_err(|e| {
            tracing::warn!("load_range at {} failed: {}", pos, e);
            e
        })
    }

    /// Forget logical bytes `[start, end]` (inclusive) so they read as zero
    ///
    /// Not transactional: on an allocation failure, ranges already trimmed
    /// stay trimmed.
    pub fn remove_range(&mut self, start: usize, end: usize) -> Result<()> {
        if end >= self.size || end < start {
            return Err(SparseError::InvalidArgument(format!(
                "Invalid range [{}, {}] for buffer of {} bytes",
                start, end, self.size
            )));
        }

        tracing::debug!("remove_range start={} end={}", start, end);

        split::remove_range(&mut self.ranges, &self.allocator, start, end).map_err(|e| {
            tracing::warn!("remove_range [{}, {}] failed: {}", start, end, e);
            e
        })
    }

    /// Release every stored range; size and cursor are unchanged
    pub fn clear(&mut self) {
        tracing::debug!("Clearing {} range(s)", self.ranges.len());
        self.release_all();
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Fill `buf` with the logical bytes starting at the cursor
    ///
    /// Does not move the cursor. Fails with `Eof` if the window runs past the
    /// logical end; bytes before that point are still written.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Err(SparseError::InvalidArgument("Cannot read zero bytes".to_string()));
        }

        project::project(&self.ranges, self.size, self.pos, buf)
    }

    /// Read `len` bytes starting at the cursor into a new [`Bytes`]
    pub fn read_bytes(&self, len: usize) -> Result<Bytes> {
        if len == 0 {
            return Err(SparseError::InvalidArgument("Cannot read zero bytes".to_string()));
        }

        let mut out = BytesMut::zeroed(len);
        self.read(&mut out)?;
        Ok(out.freeze())
    }

    // =========================================================================
    // Cursor & Size
    // =========================================================================

    /// Move the cursor and return its new absolute position
    pub fn seek(&mut self, offset: usize, whence: Whence) -> Result<usize> {
        // Reported as `base + len` so an overflowing target is still described.
        let (base, len) = match whence {
            Whence::Start => (offset, 0),
            Whence::Current => (self.pos, offset),
            Whence::End => match self.size.checked_sub(offset) {
                Some(target) => (target, 0),
                None => {
                    return Err(SparseError::InvalidArgument(format!(
                        "Cannot seek past beginning of file: {} bytes back from end of {}",
                        offset, self.size
                    )))
                }
            },
        };

        match base.checked_add(len) {
            Some(target) if target <= self.size => {
                self.pos = target;
                Ok(target)
            }
            _ => Err(SparseError::OutOfBounds {
                pos: base,
                len,
                size: self.size,
            }),
        }
    }

    /// Change the logical size
    ///
    /// Shrinking drops every stored byte at or past `new_size` and pulls the
    /// cursor back if needed. Growing only changes the size; new bytes read
    /// as zero.
    pub fn resize(&mut self, new_size: usize) -> Result<()> {
        if new_size == 0 {
            return Err(SparseError::InvalidArgument(
                "Cannot resize to zero size".to_string(),
            ));
        }

        if new_size < self.size {
            self.remove_range(new_size, self.size - 1)?;
            self.pos = self.pos.min(new_size);
        }

        tracing::debug!("Resized sparse buffer {} -> {}", self.size, new_size);
        self.size = new_size;
        Ok(())
    }

    /// Bytes between the cursor and the logical end
    pub fn bytes_left(&self) -> usize {
        self.size - self.pos
    }

    /// Logical size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Current cursor position
    pub fn position(&self) -> usize {
        self.pos
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of stored ranges
    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    /// Bytes of range data currently held
    pub fn resident_bytes(&self) -> usize {
        self.ranges.resident_bytes()
    }

    /// Stored `[pos, end)` spans in position order
    pub fn ranges(&self) -> impl Iterator<Item = Span> + '_ {
        self.ranges.spans()
    }

    /// The allocator backing this buffer
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Ranges are sorted, separated by gaps, and inside the logical size
    pub fn check_invariants(&self) -> bool {
        self.ranges.check_invariants(self.size) && self.pos <= self.size
    }

    fn release_all(&mut self) {
        let allocator = &self.allocator;
        self.ranges.drain_all(|r| allocator.release(r.data));
    }
}

impl<A: BufferAllocator> Drop for SparseBuffer<A> {
    fn drop(&mut self) {
        self.release_all();
    }
}
