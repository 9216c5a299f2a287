//! Cache line and cache set storage.
//!
//! A set is a fixed inline array of [`MAX_WAYS_PER_SET`] lines of which the first
//! `ways` are live. The position of a line in the array is its way index, which is
//! what the replacement policies return.

use crate::common::{CoreId, Cycle, MAX_WAYS_PER_SET};

/// Resident state of one way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    /// The way holds a line.
    pub valid: bool,
    /// The line was written since it was installed.
    pub dirty: bool,
    /// High-order line-address bits above the set index.
    pub tag: u64,
    /// Core that installed the line.
    pub core_id: CoreId,
    /// Cycle of the most recent install or hit.
    pub last_access: Cycle,
}

/// One set of a set-associative cache.
///
/// Holds exactly `ways` live lines. Within a set, at most one valid line carries a
/// given tag; the cache's access and install paths maintain that.
#[derive(Clone, Debug)]
pub struct CacheSet {
    lines: [CacheLine; MAX_WAYS_PER_SET],
    ways: usize,
}

impl CacheSet {
    /// Creates an empty set with `ways` live ways.
    pub(crate) fn new(ways: usize) -> Self {
        debug_assert!(ways > 0 && ways <= MAX_WAYS_PER_SET);
        Self {
            lines: [CacheLine::default(); MAX_WAYS_PER_SET],
            ways,
        }
    }

    /// Number of live ways (the associativity).
    #[inline(always)]
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// The live lines, indexed by way.
    #[inline(always)]
    pub fn lines(&self) -> &[CacheLine] {
        &self.lines[..self.ways]
    }

    #[inline(always)]
    pub(crate) fn lines_mut(&mut self) -> &mut [CacheLine] {
        &mut self.lines[..self.ways]
    }

    /// Returns the way holding a valid line with `tag`, if any.
    #[inline]
    pub fn find(&self, tag: u64) -> Option<usize> {
        self.lines()
            .iter()
            .position(|line| line.valid && line.tag == tag)
    }

    /// Number of valid lines in the set.
    pub fn occupancy(&self) -> usize {
        self.lines().iter().filter(|line| line.valid).count()
    }

    /// Number of valid lines owned by `core`.
    pub fn occupancy_of(&self, core: CoreId) -> usize {
        self.lines()
            .iter()
            .filter(|line| line.valid && line.core_id == core)
            .count()
    }
}
