//! Engine Module
//!
//! The range algorithms that operate directly on a [`RangeList`].
//!
//! ## Responsibilities
//! - `merge`: insert written bytes, coalescing with overlapping or touching
//!   ranges
//! - `split`: remove an inclusive interval, trimming or splitting ranges
//! - `project`: render a window of the logical buffer over a zero background
//!
//! None of these know the logical size or cursor; bounds are validated by
//! [`SparseBuffer`](crate::buffer::SparseBuffer) before they are called.
//!
//! [`RangeList`]: crate::range::RangeList

pub mod merge;
pub mod split;
pub mod project;

pub use merge::load_range;
pub use split::remove_range;
pub use project::project;
