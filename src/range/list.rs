//! RangeList implementation
//!
//! Sorted `Vec<Range>` with positional insert/remove.

use super::{Range, Span};

/// Ordered sequence of disjoint, non-adjacent ranges
///
/// ## Invariants
/// - Sorted by ascending `pos`
/// - For consecutive ranges `a`, `b`: `a.end() < b.pos`
/// - No range is empty
///
/// Index arguments must refer to existing entries; passing anything else is
/// a caller bug and panics.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RangeList {
    ranges: Vec<Range>,
}

impl RangeList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored ranges
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Range> {
        self.ranges.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Range> {
        self.ranges.get_mut(index)
    }

    /// All ranges in position order
    pub fn as_slice(&self) -> &[Range] {
        &self.ranges
    }

    /// Iterate ranges in position order
    pub fn iter(&self) -> std::slice::Iter<'_, Range> {
        self.ranges.iter()
    }

    /// Iterate the `[pos, end)` spans in position order
    pub fn spans(&self) -> impl Iterator<Item = Span> + '_ {
        self.ranges.iter().map(Span::from)
    }

    /// Total bytes held across all ranges
    pub fn resident_bytes(&self) -> usize {
        self.ranges.iter().map(Range::size).sum()
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Index of the range starting exactly at `pos`
    pub fn locate(&self, pos: usize) -> Option<usize> {
        self.ranges.binary_search_by_key(&pos, |r| r.pos).ok()
    }

    /// Index of the first range that overlaps or touches `span`
    pub fn first_intersecting(&self, span: Span) -> Option<usize> {
        // Ends are sorted too, so the first candidate is the first range
        // reaching `span.pos`.
        let candidate = self.ranges.partition_point(|r| r.end() < span.pos);
        self.ranges
            .get(candidate)
            .filter(|r| Span::from(*r).intersects(&span))
            .map(|_| candidate)
    }

    /// Index of the first range whose `pos` is greater than `pos`
    ///
    /// Equals `len()` when every range starts at or before `pos`.
    pub fn insertion_point(&self, pos: usize) -> usize {
        self.ranges.partition_point(|r| r.pos <= pos)
    }

    // =========================================================================
    // Linkage
    // =========================================================================

    /// Unlink and return the range at `index`
    pub fn remove(&mut self, index: usize) -> Range {
        self.ranges.remove(index)
    }

    /// Borrow the range at `index` mutably together with every range after it
    ///
    /// Lets a range be rewritten from its successors' bytes in place.
    pub fn entry_and_rest(&mut self, index: usize) -> (&mut Range, &[Range]) {
        let (head, rest) = self.ranges.split_at_mut(index + 1);
        (&mut head[index], &*rest)
    }

    /// Unlink ranges `[from, to)`, handing each one to `sink`
    pub fn remove_span(&mut self, from: usize, to: usize, mut sink: impl FnMut(Range)) {
        for range in self.ranges.drain(from..to) {
            sink(range);
        }
    }

    /// Insert `range` so that it ends up directly before the range at `index`
    pub fn insert_before(&mut self, index: usize, range: Range) {
        assert!(index < self.ranges.len(), "anchor index {} out of range", index);
        self.ranges.insert(index, range);
        debug_assert!(self.is_well_formed());
    }

    /// Insert `range` directly after the range at `index`
    pub fn insert_after(&mut self, index: usize, range: Range) {
        assert!(index < self.ranges.len(), "anchor index {} out of range", index);
        self.ranges.insert(index + 1, range);
        debug_assert!(self.is_well_formed());
    }

    /// Append `range` at the tail
    pub fn push(&mut self, range: Range) {
        self.ranges.push(range);
        debug_assert!(self.is_well_formed());
    }

    /// Unlink every range, handing each one to `sink`
    pub fn drain_all(&mut self, sink: impl FnMut(Range)) {
        let len = self.ranges.len();
        self.remove_span(0, len, sink);
    }

    // =========================================================================
    // Invariant Checks
    // =========================================================================

    /// Sorted, non-empty, and every neighbour pair separated by a gap
    pub fn is_well_formed(&self) -> bool {
        self.ranges.iter().all(|r| !r.data.is_empty())
            && self.ranges.windows(2).all(|w| w[0].end() < w[1].pos)
    }

    /// Well formed and nothing stored at or past `size`
    pub fn check_invariants(&self, size: usize) -> bool {
        self.is_well_formed() && self.ranges.last().map_or(true, |r| r.end() <= size)
    }
}

impl<'a> IntoIterator for &'a RangeList {
    type Item = &'a Range;
    type IntoIter = std::slice::Iter<'a, Range>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}
