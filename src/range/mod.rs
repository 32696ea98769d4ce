//! Range Module
//!
//! Stored byte ranges and the ordered list that holds them.
//!
//! ## Responsibilities
//! - Own the bytes of every explicitly written span
//! - Keep spans sorted by position
//! - Keep spans disjoint and non-adjacent (at least one unfilled byte
//!   between neighbours)
//!
//! ## Layout
//! ```text
//!  logical:  0                                                     size
//!            ├──────┬──────────┬───────────┬────────────┬─────────┤
//!            │ zero │ Range 0  │   zero    │  Range 1   │  zero   │
//!            └──────┴──────────┴───────────┴────────────┴─────────┘
//!  stored:          [pos, data]             [pos, data]
//! ```

mod list;

pub use list::RangeList;

/// A contiguous, explicitly written span with its own storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    /// Logical offset of the first byte
    pub pos: usize,

    /// Stored bytes; `data.len()` is the range size
    pub data: Vec<u8>,
}

impl Range {
    /// Create a range at `pos` owning `data`
    pub fn new(pos: usize, data: Vec<u8>) -> Self {
        Self { pos, data }
    }

    /// Number of bytes stored
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// One past the last logical byte covered
    pub fn end(&self) -> usize {
        self.pos + self.data.len()
    }

    /// Last logical byte covered (inclusive)
    ///
    /// Ranges are never empty, so this is always `>= pos`.
    pub fn last(&self) -> usize {
        self.end() - 1
    }
}

/// A `[pos, end)` span used when a range's bytes are not needed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub pos: usize,
    pub end: usize,
}

impl Span {
    pub fn new(pos: usize, end: usize) -> Self {
        Self { pos, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    /// Overlapping or exactly touching
    pub fn intersects(&self, other: &Span) -> bool {
        !(self.end < other.pos || other.end < self.pos)
    }

    /// `other` lies entirely within `self`
    pub fn contains(&self, other: &Span) -> bool {
        self.pos <= other.pos && self.end >= other.end
    }
}

impl From<&Range> for Span {
    fn from(range: &Range) -> Self {
        Span::new(range.pos, range.end())
    }
}
