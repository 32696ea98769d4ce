//! Merge Engine Tests
//!
//! Tests verify:
//! - Detached inserts land in sorted position
//! - Overlapping and exactly adjacent writes coalesce
//! - Containment and partial-overlap precedence
//! - Forward cascade across several stored ranges
//! - All-or-nothing behaviour on allocation failure

#[path = "../common/mod.rs"]
mod common;

use common::{fill, runs, CountingAllocator};
use sparsebuf::engine::load_range;
use sparsebuf::range::{RangeList, Span};
use sparsebuf::SparseError;

// =============================================================================
// Helper Functions
// =============================================================================

fn spans(list: &RangeList) -> Vec<(usize, usize)> {
    list.spans().map(|s| (s.pos, s.end)).collect()
}

fn data_at(list: &RangeList, index: usize) -> Vec<u8> {
    list.get(index).unwrap().data.clone()
}

// =============================================================================
// Detached Insert Tests
// =============================================================================

#[test]
fn test_insert_into_empty_list() {
    let alloc = CountingAllocator::new();
    let mut list = RangeList::new();

    load_range(&mut list, &alloc, 5, &[1, 2, 3]).unwrap();

    assert_eq!(spans(&list), vec![(5, 8)]);
    assert_eq!(data_at(&list, 0), vec![1, 2, 3]);
    assert_eq!(alloc.live(), 1);
}

#[test]
fn test_disjoint_inserts_are_sorted() {
    let alloc = CountingAllocator::new();
    let mut list = RangeList::new();

    load_range(&mut list, &alloc, 20, &fill(2, 4)).unwrap();
    load_range(&mut list, &alloc, 40, &fill(4, 4)).unwrap();
    load_range(&mut list, &alloc, 0, &fill(1, 4)).unwrap();
    load_range(&mut list, &alloc, 30, &fill(3, 4)).unwrap();

    assert_eq!(spans(&list), vec![(0, 4), (20, 24), (30, 34), (40, 44)]);
    assert!(list.is_well_formed());
    assert_eq!(alloc.live(), 4);
}

#[test]
fn test_one_byte_gap_keeps_ranges_apart() {
    let alloc = CountingAllocator::new();
    let mut list = RangeList::new();

    load_range(&mut list, &alloc, 0, &fill(1, 4)).unwrap();
    load_range(&mut list, &alloc, 5, &fill(2, 4)).unwrap();

    assert_eq!(spans(&list), vec![(0, 4), (5, 9)]);
}

// =============================================================================
// Adjacency Tests
// =============================================================================

#[test]
fn test_adjacent_after_merges() {
    let alloc = CountingAllocator::new();
    let mut list = RangeList::new();

    load_range(&mut list, &alloc, 0, &fill(1, 4)).unwrap();
    load_range(&mut list, &alloc, 4, &fill(2, 4)).unwrap();

    assert_eq!(spans(&list), vec![(0, 8)]);
    assert_eq!(data_at(&list, 0), runs(&[(1, 4), (2, 4)]));
    assert_eq!(alloc.live(), 1);
}

#[test]
fn test_adjacent_before_merges() {
    let alloc = CountingAllocator::new();
    let mut list = RangeList::new();

    load_range(&mut list, &alloc, 4, &fill(2, 4)).unwrap();
    load_range(&mut list, &alloc, 0, &fill(1, 4)).unwrap();

    assert_eq!(spans(&list), vec![(0, 8)]);
    assert_eq!(data_at(&list, 0), runs(&[(1, 4), (2, 4)]));
}

// =============================================================================
// Precedence Tests
// =============================================================================

#[test]
fn test_new_containing_existing_keeps_new_bytes() {
    let alloc = CountingAllocator::new();
    let mut list = RangeList::new();

    load_range(&mut list, &alloc, 4, &fill(1, 2)).unwrap();
    load_range(&mut list, &alloc, 2, &fill(9, 8)).unwrap();

    assert_eq!(spans(&list), vec![(2, 10)]);
    assert_eq!(data_at(&list, 0), fill(9, 8));
    assert_eq!(alloc.live(), 1);
}

#[test]
fn test_identical_span_keeps_new_bytes() {
    let alloc = CountingAllocator::new();
    let mut list = RangeList::new();

    load_range(&mut list, &alloc, 0, &fill(1, 4)).unwrap();
    load_range(&mut list, &alloc, 0, &fill(2, 4)).unwrap();

    assert_eq!(data_at(&list, 0), fill(2, 4));
}

#[test]
fn test_existing_containing_new_keeps_existing_bytes() {
    let alloc = CountingAllocator::new();
    let mut list = RangeList::new();

    load_range(&mut list, &alloc, 0, &fill(1, 10)).unwrap();
    let allocations = alloc.allocations();

    load_range(&mut list, &alloc, 3, &fill(2, 4)).unwrap();

    assert_eq!(spans(&list), vec![(0, 10)]);
    assert_eq!(data_at(&list, 0), fill(1, 10));
    assert_eq!(alloc.allocations(), allocations, "shadowed write allocates nothing");
    assert_eq!(alloc.reallocations(), 0);
}

#[test]
fn test_partial_overlap_new_lower() {
    let alloc = CountingAllocator::new();
    let mut list = RangeList::new();

    load_range(&mut list, &alloc, 4, &fill(1, 6)).unwrap();
    load_range(&mut list, &alloc, 0, &fill(2, 6)).unwrap();

    assert_eq!(spans(&list), vec![(0, 10)]);
    assert_eq!(data_at(&list, 0), runs(&[(2, 6), (1, 4)]));
}

#[test]
fn test_partial_overlap_existing_lower() {
    let alloc = CountingAllocator::new();
    let mut list = RangeList::new();

    load_range(&mut list, &alloc, 0, &fill(1, 10)).unwrap();
    load_range(&mut list, &alloc, 4, &fill(2, 10)).unwrap();

    assert_eq!(spans(&list), vec![(0, 14)]);
    assert_eq!(data_at(&list, 0), runs(&[(1, 4), (2, 10)]));
}

// =============================================================================
// Cascade Tests
// =============================================================================

#[test]
fn test_bridge_between_two_ranges() {
    let alloc = CountingAllocator::new();
    let mut list = RangeList::new();

    load_range(&mut list, &alloc, 0, &fill(1, 4)).unwrap();
    load_range(&mut list, &alloc, 8, &fill(3, 4)).unwrap();
    load_range(&mut list, &alloc, 4, &fill(2, 4)).unwrap();

    assert_eq!(spans(&list), vec![(0, 12)]);
    assert_eq!(data_at(&list, 0), runs(&[(1, 4), (2, 4), (3, 4)]));
    assert_eq!(alloc.live(), 1);
}

#[test]
fn test_cascade_absorbs_several_ranges() {
    let alloc = CountingAllocator::new();
    let mut list = RangeList::new();

    load_range(&mut list, &alloc, 0, &fill(1, 3)).unwrap();
    load_range(&mut list, &alloc, 6, &fill(2, 2)).unwrap();
    load_range(&mut list, &alloc, 10, &fill(3, 2)).unwrap();
    load_range(&mut list, &alloc, 14, &fill(4, 6)).unwrap();
    load_range(&mut list, &alloc, 30, &fill(5, 2)).unwrap();

    // Overlaps the first, swallows the next two, and overlaps into the fourth.
    load_range(&mut list, &alloc, 2, &fill(9, 14)).unwrap();

    assert_eq!(spans(&list), vec![(0, 20), (30, 32)]);
    assert_eq!(data_at(&list, 0), runs(&[(1, 2), (9, 14), (4, 4)]));
    assert!(list.is_well_formed());
    assert_eq!(alloc.live(), 2);
}

#[test]
fn test_cascade_stops_at_gap() {
    let alloc = CountingAllocator::new();
    let mut list = RangeList::new();

    load_range(&mut list, &alloc, 0, &fill(1, 4)).unwrap();
    load_range(&mut list, &alloc, 10, &fill(2, 4)).unwrap();
    load_range(&mut list, &alloc, 3, &fill(3, 6)).unwrap();

    assert_eq!(spans(&list), vec![(0, 9), (10, 14)]);
}

#[test]
fn test_write_touching_both_neighbours_leaves_no_adjacency() {
    let alloc = CountingAllocator::new();
    let mut list = RangeList::new();

    load_range(&mut list, &alloc, 0, &fill(1, 5)).unwrap();
    load_range(&mut list, &alloc, 10, &fill(2, 5)).unwrap();
    load_range(&mut list, &alloc, 5, &fill(3, 5)).unwrap();

    assert_eq!(list.spans().collect::<Vec<_>>(), vec![Span::new(0, 15)]);
}

#[test]
fn test_merge_grows_first_range_in_place() {
    let alloc = CountingAllocator::new();
    let mut list = RangeList::new();
    load_range(&mut list, &alloc, 10, &fill(1, 10)).unwrap();
    load_range(&mut list, &alloc, 30, &fill(3, 5)).unwrap();
    let allocations = alloc.allocations();

    load_range(&mut list, &alloc, 5, &fill(2, 25)).unwrap();

    assert_eq!(spans(&list), vec![(5, 35)]);
    assert_eq!(data_at(&list, 0), runs(&[(2, 25), (3, 5)]));
    assert_eq!(alloc.allocations(), allocations, "no fresh buffer for a merge");
    assert_eq!(alloc.reallocations(), 1);
    assert_eq!(alloc.live(), 1);
}

#[test]
fn test_merge_new_lower_shifts_stored_tail() {
    let alloc = CountingAllocator::new();
    let mut list = RangeList::new();
    let stored: Vec<u8> = (0..10).collect();
    load_range(&mut list, &alloc, 10, &stored).unwrap();

    load_range(&mut list, &alloc, 4, &fill(0xEE, 8)).unwrap();

    let mut expected = fill(0xEE, 8);
    expected.extend(2..10u8);
    assert_eq!(spans(&list), vec![(4, 20)]);
    assert_eq!(data_at(&list, 0), expected);
}

// =============================================================================
// Allocation Failure Tests
// =============================================================================

#[test]
fn test_failed_detached_insert_leaves_list_unchanged() {
    let alloc = CountingAllocator::new();
    let mut list = RangeList::new();
    load_range(&mut list, &alloc, 0, &fill(1, 4)).unwrap();
    let before = list.clone();

    alloc.fail_after(0);
    let result = load_range(&mut list, &alloc, 10, &fill(2, 4));

    assert!(matches!(result, Err(SparseError::AllocationFailure(_))));
    assert_eq!(list, before);
    assert_eq!(alloc.live(), 1);
}

#[test]
fn test_failed_merge_leaves_list_unchanged() {
    let alloc = CountingAllocator::new();
    let mut list = RangeList::new();
    load_range(&mut list, &alloc, 0, &fill(1, 4)).unwrap();
    load_range(&mut list, &alloc, 8, &fill(2, 4)).unwrap();
    let before = list.clone();

    alloc.fail_after(0);
    let result = load_range(&mut list, &alloc, 2, &fill(3, 8));

    assert!(matches!(result, Err(SparseError::AllocationFailure(_))));
    assert_eq!(list, before);
    assert_eq!(alloc.live(), 2);

    alloc.heal();
    load_range(&mut list, &alloc, 2, &fill(3, 8)).unwrap();
    assert_eq!(spans(&list), vec![(0, 12)]);
}
