//! Fragment Assembly
//!
//! Builds a file out of discontiguous fragments: each fragment file is
//! loaded at its offset, optional holes are punched out, and the whole
//! logical buffer is streamed to the output with unfilled bytes as zeros.
//!
//! ## Argument Formats
//! - Fragment: `<offset>:<path>` (e.g. `4096:part2.bin`)
//! - Hole: `<start>-<end>`, inclusive (e.g. `100-199`)

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::alloc::BufferAllocator;
use crate::buffer::{SparseBuffer, Whence};
use crate::config::Config;
use crate::error::{Result, SparseError};
use crate::range::Span;

/// Bytes read from the sparse buffer per output write
pub const CHUNK_SIZE: usize = 64 * 1024;

/// A fragment file to be placed at a logical offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentSpec {
    pub offset: usize,
    pub path: PathBuf,
}

impl FromStr for FragmentSpec {
    type Err = SparseError;

    fn from_str(s: &str) -> Result<Self> {
        let (offset, path) = s.split_once(':').ok_or_else(|| {
            SparseError::Config(format!("fragment '{}' is not <offset>:<path>", s))
        })?;

        let offset = offset
            .trim()
            .parse()
            .map_err(|e| SparseError::Config(format!("bad fragment offset '{}': {}", offset, e)))?;

        if path.is_empty() {
            return Err(SparseError::Config(format!("fragment '{}' has no path", s)));
        }

        Ok(Self {
            offset,
            path: PathBuf::from(path),
        })
    }
}

/// An inclusive interval to zero out after loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleSpec {
    pub start: usize,
    pub end: usize,
}

impl FromStr for HoleSpec {
    type Err = SparseError;

    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = s.split_once('-').ok_or_else(|| {
            SparseError::Config(format!("hole '{}' is not <start>-<end>", s))
        })?;

        let parse = |v: &str| {
            v.trim()
                .parse::<usize>()
                .map_err(|e| SparseError::Config(format!("bad hole bound '{}': {}", v, e)))
        };

        Ok(Self {
            start: parse(start)?,
            end: parse(end)?,
        })
    }
}

/// Summary of an assembly run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleReport {
    /// Logical size of the output
    pub size: usize,

    /// Fragments actually loaded (empty files are skipped)
    pub fragments: usize,

    /// Stored spans after loading and hole punching
    pub ranges: Vec<Span>,

    /// Bytes of fragment data held in memory
    pub resident_bytes: usize,
}

/// Load fragments and punch holes, returning the populated buffer
pub fn load(
    config: &Config,
    fragments: &[FragmentSpec],
    holes: &[HoleSpec],
) -> Result<(SparseBuffer, usize)> {
    let mut buffer = SparseBuffer::from_config(config)?;
    let mut loaded = 0;

    for fragment in fragments {
        let data = fs::read(&fragment.path)?;
        if data.is_empty() {
            tracing::warn!("Skipping empty fragment {}", fragment.path.display());
            continue;
        }

        tracing::debug!(
            "Loading {} ({} bytes) at offset {}",
            fragment.path.display(),
            data.len(),
            fragment.offset
        );
        buffer.load_range(fragment.offset, &data)?;
        loaded += 1;
    }

    for hole in holes {
        tracing::debug!("Punching hole [{}, {}]", hole.start, hole.end);
        buffer.remove_range(hole.start, hole.end)?;
    }

    Ok((buffer, loaded))
}

/// Stream the full logical contents of `buffer` to `out`
///
/// Leaves the cursor at the logical end. Returns the number of bytes written.
pub fn write_contents<A: BufferAllocator, W: Write>(
    buffer: &mut SparseBuffer<A>,
    out: &mut W,
) -> Result<usize> {
    buffer.seek(0, Whence::Start)?;
    let mut written = 0;

    while buffer.bytes_left() > 0 {
        let len = buffer.bytes_left().min(CHUNK_SIZE);
        let chunk = buffer.read_bytes(len)?;
        out.write_all(&chunk)?;

        buffer.seek(len, Whence::Current)?;
        written += len;
    }

    Ok(written)
}

/// Assemble `fragments` into the file at `output`
pub fn assemble(
    config: &Config,
    fragments: &[FragmentSpec],
    holes: &[HoleSpec],
    output: &Path,
) -> Result<AssembleReport> {
    let (mut buffer, loaded) = load(config, fragments, holes)?;

    let mut writer = BufWriter::new(File::create(output)?);
    let written = write_contents(&mut buffer, &mut writer)?;
    writer.flush()?;

    let report = AssembleReport {
        size: buffer.size(),
        fragments: loaded,
        ranges: buffer.ranges().collect(),
        resident_bytes: buffer.resident_bytes(),
    };

    tracing::info!(
        "Assembled {} bytes into {} from {} fragment(s), {} range(s) resident",
        written,
        output.display(),
        report.fragments,
        report.ranges.len()
    );

    Ok(report)
}
