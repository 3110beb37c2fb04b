//! TLB Unit Tests.
//!
//! Verifies the fully associative, software-managed TLB:
//! - Insert and lookup by page
//! - Single valid entry per virtual page
//! - Deterministic least-recently-used replacement
//! - Purge and reset

use rstest::rstest;
use twin64_core::common::PAGE_SIZE;
use twin64_core::core::units::mmu::tlb::{ACC_READ, ACC_WRITE, Tlb};

/// Virtual address of page `n`.
fn page(n: u64) -> i64 {
    (n * PAGE_SIZE) as i64
}

/// Physical address mapped for page `n` in these tests.
fn frame(n: u64) -> i64 {
    ((n + 0x40) * PAGE_SIZE) as i64
}

// ══════════════════════════════════════════════════════════
// 1. Basic Operations
// ══════════════════════════════════════════════════════════

#[test]
fn lookup_miss_on_empty() {
    let mut tlb = Tlb::new(8);
    assert_eq!(tlb.lookup(page(3)), None);
    assert_eq!(tlb.misses(), 1);
    assert_eq!(tlb.hits(), 0);
}

#[test]
fn insert_then_lookup_translates_offset() {
    let mut tlb = Tlb::new(8);
    let _ = tlb.insert(page(2) + 0x123, frame(2) + 0x456, ACC_READ, 7);

    let entry = tlb.lookup(page(2) + 0x10).unwrap();
    assert!(entry.valid);
    assert_eq!(entry.virtual_address, page(2));
    assert_eq!(entry.physical_address, frame(2));
    assert_eq!(entry.protect_id, 7);
    assert_eq!(entry.translate(page(2) as u64 + 0x10), frame(2) as u64 + 0x10);
    assert_eq!(tlb.hits(), 1);
}

#[test]
fn reinserting_a_page_overwrites_in_place() {
    let mut tlb = Tlb::new(4);
    let first = tlb.insert(page(1), frame(1), ACC_READ, 0);
    let _ = tlb.insert(page(5), frame(5), ACC_READ, 0);
    let again = tlb.insert(page(1) + 8, frame(9), ACC_READ | ACC_WRITE, 0);

    assert_eq!(first, again);
    assert_eq!(tlb.valid_count(), 2);
    assert_eq!(tlb.peek(page(1)).unwrap().physical_address, frame(9));
}

#[test]
fn peek_does_not_count() {
    let mut tlb = Tlb::new(2);
    let _ = tlb.insert(page(0), frame(0), ACC_READ, 0);
    assert!(tlb.peek(page(0)).is_some());
    assert!(tlb.peek(page(1)).is_none());
    assert_eq!((tlb.hits(), tlb.misses()), (0, 0));
}

// ══════════════════════════════════════════════════════════
// 2. Replacement
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(1)]
#[case(2)]
#[case(4)]
#[case(16)]
fn each_insert_beyond_capacity_evicts_the_oldest(#[case] capacity: usize) {
    let mut tlb = Tlb::new(capacity);
    let n = capacity as u64;
    for p in 0..n {
        let _ = tlb.insert(page(p), frame(p), ACC_READ, 0);
    }
    assert_eq!(tlb.valid_count(), capacity);

    for extra in 0..n {
        let _ = tlb.insert(page(n + extra), frame(n + extra), ACC_READ, 0);
        assert_eq!(tlb.valid_count(), capacity);
        assert!(tlb.peek(page(extra)).is_none(), "page {extra} should be evicted");
        for kept in (extra + 1)..=(n + extra) {
            assert!(tlb.peek(page(kept)).is_some(), "page {kept} should remain");
        }
    }
}

#[test]
fn lookup_refreshes_recency() {
    let mut tlb = Tlb::new(3);
    for p in 0..3 {
        let _ = tlb.insert(page(p), frame(p), ACC_READ, 0);
    }
    assert!(tlb.lookup(page(0)).is_some());

    let _ = tlb.insert(page(3), frame(3), ACC_READ, 0);
    assert!(tlb.peek(page(0)).is_some());
    assert!(tlb.peek(page(1)).is_none());
}

#[test]
fn replacement_trace_is_reproducible() {
    let run = || {
        let mut tlb = Tlb::new(4);
        let mut slots = Vec::new();
        for p in [0, 1, 2, 3, 1, 4, 0, 5, 2, 6] {
            if tlb.lookup(page(p)).is_none() {
                slots.push(tlb.insert(page(p), frame(p), ACC_READ, 0));
            }
        }
        slots
    };
    assert_eq!(run(), run());
    assert_eq!(run(), vec![0, 1, 2, 3, 0, 2, 3, 1, 0]);
}

// ══════════════════════════════════════════════════════════
// 3. Maintenance
// ══════════════════════════════════════════════════════════

#[test]
fn purge_of_unmapped_page_is_a_noop() {
    let mut tlb = Tlb::new(4);
    let _ = tlb.insert(page(1), frame(1), ACC_READ, 0);
    let before = tlb.entries().to_vec();

    assert!(!tlb.purge(page(9)));
    assert_eq!(tlb.entries(), before.as_slice());
}

#[test]
fn purge_invalidates_only_that_page() {
    let mut tlb = Tlb::new(4);
    let _ = tlb.insert(page(1), frame(1), ACC_READ, 0);
    let _ = tlb.insert(page(2), frame(2), ACC_READ, 0);

    assert!(tlb.purge(page(1) + 0x3FFF));
    assert!(tlb.peek(page(1)).is_none());
    assert!(tlb.peek(page(2)).is_some());
}

#[test]
fn reset_invalidates_everything_but_keeps_capacity() {
    let mut tlb = Tlb::new(4);
    for p in 0..4 {
        let _ = tlb.insert(page(p), frame(p), ACC_READ, 0);
    }
    tlb.reset();
    assert_eq!(tlb.valid_count(), 0);
    assert_eq!(tlb.capacity(), 4);
    assert!(tlb.entry(3).is_some_and(|e| !e.valid));
    assert!(tlb.entry(4).is_none());
}
