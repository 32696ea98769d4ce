//! Allocation capability
//!
//! Every range buffer is obtained from, resized through, and handed back to a
//! [`BufferAllocator`]. The default [`SystemAllocator`] uses the global heap
//! with fallible reservation and can optionally enforce a memory limit.
//!
//! ## Contract
//! - `allocate(len)` returns a zero-filled buffer of exactly `len` bytes
//! - `reallocate(buf, new_len)` resizes in place, keeping the common prefix;
//!   it may fail independently of `allocate`
//! - `reallocate_reclaiming(buf, new_len, reclaim)` is `reallocate` for a
//!   caller about to release `reclaim` bytes held in other buffers
//! - `release(buf)` accepts exactly what `allocate`/`reallocate` produced

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;

/// The allocator refused a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("could not allocate {requested} bytes")]
pub struct AllocError {
    /// Number of bytes that were requested
    pub requested: usize,
}

/// Allocate / reallocate / release capability injected into a sparse buffer
pub trait BufferAllocator {
    /// Allocate a zero-filled buffer of exactly `len` bytes
    fn allocate(&self, len: usize) -> Result<Vec<u8>, AllocError>;

    /// Resize `buf` to exactly `new_len` bytes
    ///
    /// On failure `buf` is left untouched.
    fn reallocate(&self, buf: &mut Vec<u8>, new_len: usize) -> Result<(), AllocError>;

    /// Resize `buf` when the caller will release `reclaim` bytes of other
    /// buffers as soon as this succeeds
    ///
    /// Allocators that enforce a limit may count those bytes as already
    /// freed. On failure `buf` is left untouched.
    fn reallocate_reclaiming(
        &self,
        buf: &mut Vec<u8>,
        new_len: usize,
        _reclaim: usize,
    ) -> Result<(), AllocError> {
        self.reallocate(buf, new_len)
    }

    /// Return a buffer to the allocator
    fn release(&self, buf: Vec<u8>);
}

impl<A: BufferAllocator + ?Sized> BufferAllocator for &A {
    fn allocate(&self, len: usize) -> Result<Vec<u8>, AllocError> {
        (**self).allocate(len)
    }

    fn reallocate(&self, buf: &mut Vec<u8>, new_len: usize) -> Result<(), AllocError> {
        (**self).reallocate(buf, new_len)
    }

    fn reallocate_reclaiming(
        &self,
        buf: &mut Vec<u8>,
        new_len: usize,
        reclaim: usize,
    ) -> Result<(), AllocError> {
        (**self).reallocate_reclaiming(buf, new_len, reclaim)
    }

    fn release(&self, buf: Vec<u8>) {
        (**self).release(buf)
    }
}

impl<A: BufferAllocator + ?Sized> BufferAllocator for Rc<A> {
    fn allocate(&self, len: usize) -> Result<Vec<u8>, AllocError> {
        (**self).allocate(len)
    }

    fn reallocate(&self, buf: &mut Vec<u8>, new_len: usize) -> Result<(), AllocError> {
        (**self).reallocate(buf, new_len)
    }

    fn reallocate_reclaiming(
        &self,
        buf: &mut Vec<u8>,
        new_len: usize,
        reclaim: usize,
    ) -> Result<(), AllocError> {
        (**self).reallocate_reclaiming(buf, new_len, reclaim)
    }

    fn release(&self, buf: Vec<u8>) {
        (**self).release(buf)
    }
}

/// Global-heap allocator with an optional cap on resident bytes
///
/// Resident bytes are tracked by buffer length, so the cap applies to range
/// data only, not to allocator or list overhead.
#[derive(Debug, Default)]
pub struct SystemAllocator {
    /// Maximum resident bytes, `None` for unlimited
    limit: Option<usize>,

    /// Bytes currently handed out
    resident: Cell<usize>,
}

impl SystemAllocator {
    /// Create an unlimited allocator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an allocator that refuses to hold more than `limit` bytes
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            resident: Cell::new(0),
        }
    }

    /// Bytes currently handed out and not yet released
    pub fn resident(&self) -> usize {
        self.resident.get()
    }

    /// Configured limit, if any
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Check that `extra` more bytes fit once `reclaim` resident bytes go
    fn admit(&self, extra: usize, reclaim: usize) -> Result<(), AllocError> {
        let Some(limit) = self.limit else {
            return Ok(());
        };

        match self.resident.get().checked_add(extra) {
            Some(total) if total.saturating_sub(reclaim) <= limit => Ok(()),
            _ => Err(AllocError { requested: extra }),
        }
    }
}

impl BufferAllocator for SystemAllocator {
    fn allocate(&self, len: usize) -> Result<Vec<u8>, AllocError> {
        self.admit(len, 0)?;

        let mut buf = Vec::new();
        buf.try_reserve_exact(len)
            .map_err(|_| AllocError { requested: len })?;
        buf.resize(len, 0);

        self.resident.set(self.resident.get() + len);
        Ok(buf)
    }

    fn reallocate(&self, buf: &mut Vec<u8>, new_len: usize) -> Result<(), AllocError> {
        self.reallocate_reclaiming(buf, new_len, 0)
    }

    fn reallocate_reclaiming(
        &self,
        buf: &mut Vec<u8>,
        new_len: usize,
        reclaim: usize,
    ) -> Result<(), AllocError> {
        let old_len = buf.len();

        if new_len <= old_len {
            buf.truncate(new_len);
            buf.shrink_to_fit();
            self.resident
                .set(self.resident.get().saturating_sub(old_len - new_len));
            return Ok(());
        }

        let extra = new_len - old_len;
        self.admit(extra, reclaim)?;
        buf.try_reserve_exact(extra)
            .map_err(|_| AllocError { requested: extra })?;
        buf.resize(new_len, 0);

        self.resident.set(self.resident.get() + extra);
        Ok(())
    }

    fn release(&self, buf: Vec<u8>) {
        self.resident.set(self.resident.get().saturating_sub(buf.len()));
    }
}

