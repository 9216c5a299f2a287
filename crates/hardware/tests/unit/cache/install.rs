//! Cache Install Tests.
//!
//! Verifies fills and evictions under LRU: empty ways fill first, full sets evict
//! the line with the smallest timestamp, evicted lines are reported with their
//! original address, and dirty evictions are counted exactly once.

use cachesim_core::{AccessResult, LineAddr, ReplacementPolicy};
use pretty_assertions::assert_eq;

use crate::common::harness::{Driver, set0, small_config};

fn lru() -> Driver {
    Driver::new(&small_config(ReplacementPolicy::Lru))
}

// ──────────────────────────────────────────────────────────
// 1. Filling empty ways
// ──────────────────────────────────────────────────────────

/// Installs into a cold set take ways 0, 1, 2, 3 in order and evict nothing.
#[test]
fn empty_ways_fill_in_index_order() {
    let mut drv = lru();
    for n in 0..4 {
        assert!(drv.fill(set0(n), 0).is_none());
        assert_eq!(drv.cache.set(0).unwrap().find(n), Some(n as usize));
    }
    assert_eq!(drv.cache.set(0).unwrap().occupancy(), 4);
}

/// Installed lines are valid, clean, owned by the requester, and stamped with `now`.
#[test]
fn install_initializes_line_metadata() {
    let mut drv = lru();
    let _ = drv.install(set0(9), true, 1);
    let line = *drv.cache.probe(set0(9)).unwrap();

    assert!(line.valid);
    assert!(!line.dirty);
    assert_eq!(line.tag, 9);
    assert_eq!(line.core_id, 1);
    assert_eq!(line.last_access, drv.now);
}

/// Empty slots win even when an occupied way is older.
#[test]
fn empty_way_preferred_over_eviction() {
    let mut drv = lru();
    let _ = drv.fill(set0(0), 0);
    let _ = drv.fill(set0(1), 0);
    // Way 1 was filled later; ways 2 and 3 are empty.
    let _ = drv.fill(set0(2), 0);
    assert!(drv.cache.contains(set0(0)));
    assert!(drv.cache.contains(set0(1)));
    assert_eq!(drv.cache.stats().dirty_evicts, 0);
}

// ──────────────────────────────────────────────────────────
// 2. LRU eviction
// ──────────────────────────────────────────────────────────

/// Fill the set, then miss on a fifth tag: the oldest line is the victim.
#[test]
fn full_set_evicts_oldest_timestamp() {
    let mut drv = lru();
    for n in 0..4 {
        let _ = drv.fill(set0(n), 0);
    }

    assert_eq!(drv.access(set0(4), false, 0), AccessResult::Miss);
    let evicted = drv.install(set0(4), false, 0).unwrap();

    assert_eq!(evicted.line.tag, 0);
    assert_eq!(evicted.addr, LineAddr(set0(0)));
    assert_eq!(drv.cache.set(0).unwrap().find(4), Some(0));
}

/// Touching the oldest line moves the victim to the next oldest.
#[test]
fn hit_protects_line_from_eviction() {
    let mut drv = lru();
    for n in 0..4 {
        let _ = drv.fill(set0(n), 0);
    }
    let _ = drv.access(set0(0), false, 0);

    let evicted = drv.install(set0(4), false, 0).unwrap();
    assert_eq!(evicted.line.tag, 1);
    assert!(drv.cache.contains(set0(0)));
}

/// Eviction changes only the victim way.
#[test]
fn eviction_leaves_other_ways_untouched() {
    let mut drv = lru();
    for n in 0..4 {
        let _ = drv.fill(set0(n), 0);
    }
    let before = drv.cache.set(0).unwrap().lines().to_vec();

    let _ = drv.install(set0(7), false, 0);
    let after = drv.cache.set(0).unwrap().lines();
    assert_eq!(&before[1..], &after[1..]);
    assert_eq!(after[0].tag, 7);
}

/// Equal timestamps resolve to the lowest way.
#[test]
fn timestamp_ties_evict_lowest_way() {
    let mut drv = lru();
    let now = 50;
    for n in 0..4 {
        let _ = drv.cache.install(set0(n), false, 0, now);
    }
    let evicted = drv.cache.install(set0(4), false, 0, now + 1).unwrap();
    assert_eq!(evicted.line.tag, 0);
}

// ──────────────────────────────────────────────────────────
// 3. Dirty eviction accounting
// ──────────────────────────────────────────────────────────

/// Evicting a dirty line counts once and reports the line for write-back.
#[test]
fn dirty_victim_counts_once() {
    let mut drv = lru();
    let _ = drv.request(set0(0), true, 0);
    for n in 1..4 {
        let _ = drv.request(set0(n), false, 0);
    }

    let (_, evicted) = drv.request(set0(4), false, 0);
    let evicted = evicted.unwrap();
    assert!(evicted.needs_writeback());
    assert_eq!(evicted.addr, LineAddr(set0(0)));
    assert_eq!(drv.cache.stats().dirty_evicts, 1);
}

/// Clean victims and empty-slot fills never count.
#[test]
fn clean_victim_does_not_count() {
    let mut drv = lru();
    for n in 0..8 {
        let _ = drv.request(set0(n), false, 0);
    }
    assert_eq!(drv.cache.stats().dirty_evicts, 0);
}

/// Every dirty line pushed out by a stream of new tags is counted.
#[test]
fn streaming_over_dirty_set_counts_each_eviction() {
    let mut drv = lru();
    for n in 0..4 {
        let _ = drv.request(set0(n), true, 0);
    }
    let mut writebacks = 0;
    for n in 4..8 {
        let (_, evicted) = drv.request(set0(n), false, 0);
        writebacks += u64::from(evicted.is_some_and(|e| e.needs_writeback()));
    }
    assert_eq!(writebacks, 4);
    assert_eq!(drv.cache.stats().dirty_evicts, 4);
}

// ──────────────────────────────────────────────────────────
// 4. Duplicate install guard
// ──────────────────────────────────────────────────────────

/// Installing a resident tag refreshes it instead of creating a second copy.
#[test]
fn duplicate_install_does_not_duplicate_tag() {
    let mut drv = lru();
    let _ = drv.request(set0(3), true, 0);

    assert!(drv.install(set0(3), false, 1).is_none());
    let set = drv.cache.set(0).unwrap();
    assert_eq!(set.occupancy(), 1);

    let line = drv.cache.probe(set0(3)).unwrap();
    assert!(line.dirty, "refresh keeps modified data");
    assert_eq!(line.core_id, 1);
    assert_eq!(line.last_access, drv.now);
}
