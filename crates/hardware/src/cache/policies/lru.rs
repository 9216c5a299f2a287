//! Least Recently Used (LRU) victim selection.
//!
//! Recency is tracked through the per-line `last_access` timestamps written by the
//! access and install paths, so this policy keeps no state of its own. Victim search
//! walks a contiguous range of ways in index order:
//!
//! - The first invalid way wins immediately; filling an empty slot evicts nothing.
//! - Otherwise the way with the strictly smallest timestamp wins. Equal timestamps
//!   resolve to the lowest way index.
//!
//! The partitioning policies reuse this search on a sub-range of the set.
//!
//! # Performance
//!
//! - **Time Complexity:** O(W) per victim search, where W is the range width
//! - **Space Complexity:** O(1) beyond the timestamps stored in the lines

use std::ops::Range;

use crate::cache::CacheLine;
use crate::common::Cycle;

/// Selects the LRU victim among `lines[range]`.
///
/// `range` must be non-empty and lie within `lines`.
pub fn select(lines: &[CacheLine], range: Range<usize>) -> usize {
    let mut victim = range.start;
    let mut oldest = Cycle::MAX;

    for way in range {
        let line = &lines[way];
        if !line.valid {
            return way;
        }
        if line.last_access < oldest {
            victim = way;
            oldest = line.last_access;
        }
    }
    victim
}
