//! Removal with split
//!
//! Cases for a stored range `[rngstart, rngend]` against the deletion window
//! `[start, end]` (both inclusive):
//!
//! ```text
//!  window:              [start ........ end]
//!  after   →                                   [====]      stop
//!  before  →  [====]                                       skip
//!  inside  →                [=====]                        remove
//!  around  →          [===========================]        split in two
//!  head    →          [========]                           truncate
//!  tail    →                          [=========]          move start
//! ```

use crate::alloc::BufferAllocator;
use crate::error::Result;
use crate::range::{Range, RangeList};

/// Remove logical bytes `[start, end]` from the list
///
/// Not transactional: ranges handled before an allocation failure stay
/// changed. Every intermediate state is still a well-formed list.
pub fn remove_range<A: BufferAllocator>(
    list: &mut RangeList,
    alloc: &A,
    start: usize,
    end: usize,
) -> Result<()> {
    debug_assert!(start <= end);

    let mut index = 0;
    while let Some(range) = list.get_mut(index) {
        let rngstart = range.pos;
        let rngend = range.last();

        if rngstart > end {
            break;
        }

        if rngend < start {
            index += 1;
            continue;
        }

        if rngstart >= start && rngend <= end {
            let removed = list.remove(index);
            tracing::trace!("removed range at {} ({} bytes)", removed.pos, removed.size());
            alloc.release(removed.data);
            continue;
        }

        if rngstart < start && rngend > end {
            let mut right = alloc.allocate(rngend - end)?;
            right.copy_from_slice(&range.data[end + 1 - rngstart..]);

            if let Err(e) = alloc.reallocate(&mut range.data, start - rngstart) {
                alloc.release(right);
                return Err(e.into());
            }

            tracing::trace!(
                "split range at {} into [{}, {}) and [{}, {}]",
                rngstart,
                rngstart,
                start,
                end + 1,
                rngend
            );
            list.insert_after(index, Range::new(end + 1, right));
            index += 2;
            continue;
        }

        if rngstart < start {
            alloc.reallocate(&mut range.data, start - rngstart)?;
        } else {
            let mut tail = alloc.allocate(rngend - end)?;
            tail.copy_from_slice(&range.data[end + 1 - rngstart..]);

            let old = std::mem::replace(&mut range.data, tail);
            range.pos = end + 1;
            alloc.release(old);
        }

        index += 1;
    }

    Ok(())
}
