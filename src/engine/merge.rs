//! Insertion with merge
//!
//! ## Precedence
//! When the incoming write meets the first stored range it touches:
//!
//! ```text
//!  incoming contains stored   → incoming bytes
//!  stored contains incoming   → stored bytes (write is shadowed)
//!  incoming starts lower      → incoming bytes, then stored tail
//!  stored starts lower        → stored head, then incoming bytes
//! ```
//!
//! The result is then folded forward into every following range it
//! overlaps or touches, keeping its own bytes and taking only the tails
//! that stick out past its end.

use crate::alloc::BufferAllocator;
use crate::error::Result;
use crate::range::{Range, RangeList, Span};

/// Insert `bytes` at `pos`, merging with any ranges they overlap or touch
///
/// The only fallible step is growing the first stored range, which happens
/// before anything is modified, so on error the list is exactly as it was.
pub fn load_range<A: BufferAllocator>(
    list: &mut RangeList,
    alloc: &A,
    pos: usize,
    bytes: &[u8],
) -> Result<()> {
    debug_assert!(!bytes.is_empty());
    let incoming = Span::new(pos, pos + bytes.len());

    let Some(first) = list.first_intersecting(incoming) else {
        return insert_detached(list, alloc, pos, bytes);
    };

    let ranges = list.as_slice();
    let stored = Span::from(&ranges[first]);

    // Fully shadowed: nothing changes, and nothing new can touch a neighbour.
    if stored.contains(&incoming) && !incoming.contains(&stored) {
        tracing::trace!(
            "write at {} ({} bytes) shadowed by range at {}",
            pos,
            bytes.len(),
            stored.pos
        );
        return Ok(());
    }

    let merged = Span::new(incoming.pos.min(stored.pos), incoming.end.max(stored.end));

    // Find how far forward the merged range reaches.
    let mut end = merged.end;
    let mut last = first;
    while let Some(next) = ranges.get(last + 1) {
        if next.pos > end {
            break;
        }
        end = end.max(next.end());
        last += 1;
    }

    // The stored range grows in place and the absorbed ranges are released
    // right after, so only the net growth counts against a memory limit.
    // A failed reallocation leaves its buffer untouched.
    let (target, rest) = list.entry_and_rest(first);
    let absorbed = &rest[..last - first];
    let reclaim = absorbed.iter().map(Range::size).sum();
    alloc.reallocate_reclaiming(&mut target.data, end - merged.pos, reclaim)?;
    let data = &mut target.data;

    // First merge: incoming against the stored range it hit.
    if incoming.contains(&stored) {
        data[..bytes.len()].copy_from_slice(bytes);
    } else if incoming.pos <= stored.pos {
        let tail = incoming.end - stored.pos;
        data.copy_within(tail..stored.len(), bytes.len());
        data[..bytes.len()].copy_from_slice(bytes);
    } else {
        let head = incoming.pos - stored.pos;
        data[head..merged.len()].copy_from_slice(bytes);
    }

    // Cascade: append whatever each absorbed range adds past the current end.
    let mut written = merged.end;
    for range in absorbed {
        if range.end() > written {
            let src = &range.data[written - range.pos..];
            let dst = written - merged.pos;
            data[dst..dst + src.len()].copy_from_slice(src);
            written = range.end();
        }
    }
    target.pos = merged.pos;

    tracing::trace!(
        "merged write at {} into [{}, {}), absorbing {} range(s)",
        pos,
        merged.pos,
        end,
        last - first
    );

    list.remove_span(first + 1, last + 1, |r| alloc.release(r.data));

    debug_assert!(list.is_well_formed());
    Ok(())
}

/// Insert a range that touches nothing, in sorted position
fn insert_detached<A: BufferAllocator>(
    list: &mut RangeList,
    alloc: &A,
    pos: usize,
    bytes: &[u8],
) -> Result<()> {
    let mut data = alloc.allocate(bytes.len())?;
    data.copy_from_slice(bytes);
    let range = Range::new(pos, data);

    let at = list.insertion_point(pos);
    if at == list.len() {
        list.push(range);
    } else {
        list.insert_before(at, range);
    }

    tracing::trace!("inserted range at {} ({} bytes) as entry {}", pos, bytes.len(), at);
    Ok(())
}
