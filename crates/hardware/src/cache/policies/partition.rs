//! Static way partitioning.
//!
//! Splits every set into two contiguous way ranges: core 0 owns `[0, quota)` and
//! core 1 owns `[quota, ways)`. Victim search for a request is confined to the
//! requester's range, so one core can never evict the other's lines. Hits are not
//! restricted; a core may hit on a line held in the other core's ways.
//!
//! Any core id other than 0 is served from the second range.

use std::ops::Range;

use crate::common::CoreId;

/// Two-core split of a set's ways.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WayPartition {
    ways: usize,
    quota: usize,
}

impl WayPartition {
    /// Creates a partition giving core 0 the first `quota` ways.
    ///
    /// The quota is clamped so that each core keeps at least one way.
    pub fn new(ways: usize, quota: usize) -> Self {
        let mut part = Self { ways, quota: 1 };
        part.set_quota(quota);
        part
    }

    /// Ways currently owned by core 0.
    #[inline(always)]
    pub const fn quota(&self) -> usize {
        self.quota
    }

    /// Total ways being split.
    #[inline(always)]
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Moves the boundary between the two ranges.
    pub fn set_quota(&mut self, quota: usize) {
        self.quota = quota.clamp(1, self.ways.saturating_sub(1).max(1));
    }

    /// The contiguous range of ways `core` may fill or evict.
    #[inline]
    pub const fn range_for(&self, core: CoreId) -> Range<usize> {
        if core == 0 {
            0..self.quota
        } else {
            self.quota..self.ways
        }
    }
}
