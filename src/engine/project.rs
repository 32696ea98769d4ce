//! Zero-filled read projection

use crate::error::{Result, SparseError};
use crate::range::RangeList;

/// Render logical bytes `[offset, offset + buf.len())` into `buf`
///
/// Gaps between ranges read as zero. If the window runs past `size`, the
/// bytes up to `size` are still written and `Eof` reports how many.
pub fn project(list: &RangeList, size: usize, offset: usize, buf: &mut [u8]) -> Result<usize> {
    let requested = buf.len();
    let mut off = offset;
    let mut filled = 0;

    for range in list {
        if filled == requested {
            break;
        }

        if range.end() < off {
            continue;
        }

        if range.pos > off {
            let zeros = (range.pos - off).min(requested - filled);
            buf[filled..filled + zeros].fill(0);
            filled += zeros;
            off += zeros;

            if filled == requested {
                break;
            }
        }

        let skip = off - range.pos;
        let count = (range.size() - skip).min(requested - filled);
        buf[filled..filled + count].copy_from_slice(&range.data[skip..skip + count]);
        filled += count;
        off += count;
    }

    // Trailing gap up to the logical end.
    if filled < requested && off < size {
        let zeros = (size - off).min(requested - filled);
        buf[filled..filled + zeros].fill(0);
        filled += zeros;
    }

    if filled != requested {
        return Err(SparseError::Eof { requested, filled });
    }

    Ok(filled)
}
