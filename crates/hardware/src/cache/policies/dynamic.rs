//! Utility monitor for dynamic way partitioning.
//!
//! Each core gets an auxiliary tag directory: a shadow copy of the sampled sets that
//! tracks what that core's hit rate would be if it owned the whole cache. The shadow
//! sets are true-LRU stacks `ways` deep. A shadow hit at stack position `p` means the
//! access would have hit with `p + 1` or more ways, so per-position hit counters give
//! each core's marginal utility curve.
//!
//! Every `interval` observed accesses the core-0 quota is re-derived as the split
//! `q` in `[1, ways - 1]` maximizing
//!
//! ```text
//! hits0[0..q].sum() + hits1[0..ways - q].sum()
//! ```
//!
//! with ties going to the smallest `q`. Counters are then halved so older epochs
//! fade out.

use crate::common::{CoreId, MAX_CORES, MAX_WAYS_PER_SET};

/// Shadow-tag hit curves for two cores.
#[derive(Clone, Debug)]
pub struct UtilityMonitor {
    ways: usize,
    sample_stride: usize,
    interval: u64,
    observed: u64,
    /// Shadow stacks per core and sampled set, MRU first.
    shadow: [Vec<Vec<u64>>; MAX_CORES as usize],
    /// Shadow hits per core and stack position.
    hits: [[u64; MAX_WAYS_PER_SET]; MAX_CORES as usize],
    /// Shadow misses per core.
    misses: [u64; MAX_CORES as usize],
}

impl UtilityMonitor {
    /// Creates a monitor over every `sample_stride`-th of `num_sets` sets.
    ///
    /// `sample_stride` and `interval` must be non-zero.
    pub fn new(num_sets: usize, ways: usize, sample_stride: usize, interval: u64) -> Self {
        let sampled = num_sets.div_ceil(sample_stride);
        let directory = || vec![Vec::with_capacity(ways); sampled];
        Self {
            ways,
            sample_stride,
            interval,
            observed: 0,
            shadow: [directory(), directory()],
            hits: [[0; MAX_WAYS_PER_SET]; MAX_CORES as usize],
            misses: [0; MAX_CORES as usize],
        }
    }

    const fn slot(core: CoreId) -> usize {
        if core == 0 { 0 } else { 1 }
    }

    /// Records an access in the requesting core's shadow directory.
    ///
    /// Returns `true` when the access closes a re-partition epoch.
    pub fn observe(&mut self, index: usize, tag: u64, core: CoreId) -> bool {
        if index % self.sample_stride == 0 {
            let slot = Self::slot(core);
            let stack = &mut self.shadow[slot][index / self.sample_stride];
            if let Some(pos) = stack.iter().position(|&t| t == tag) {
                self.hits[slot][pos] += 1;
                stack[..=pos].rotate_right(1);
            } else {
                self.misses[slot] += 1;
                if stack.len() < self.ways {
                    stack.push(tag);
                } else if let Some(lru) = stack.last_mut() {
                    *lru = tag;
                }
                stack.rotate_right(1);
            }
        }

        self.observed += 1;
        self.observed % self.interval == 0
    }

    /// Shadow hits recorded for `core` at each LRU stack position.
    pub fn hit_curve(&self, core: CoreId) -> &[u64] {
        &self.hits[Self::slot(core)][..self.ways]
    }

    /// Shadow misses recorded for `core`.
    pub const fn misses(&self, core: CoreId) -> u64 {
        self.misses[Self::slot(core)]
    }

    /// Accesses observed since construction.
    pub const fn observed(&self) -> u64 {
        self.observed
    }

    /// The core-0 quota maximizing total shadow hits.
    ///
    /// Returns `None` while no shadow hits have been recorded, so an idle epoch
    /// leaves the current split in place.
    pub fn best_quota(&self) -> Option<usize> {
        let [h0, h1] = &self.hits;
        if h0.iter().chain(h1.iter()).all(|&h| h == 0) {
            return None;
        }

        let mut best: Option<(usize, u64)> = None;
        for q in 1..self.ways {
            let utility: u64 = h0[..q].iter().sum::<u64>() + h1[..self.ways - q].iter().sum::<u64>();
            if best.is_none_or(|(_, u)| utility > u) {
                best = Some((q, utility));
            }
        }
        best.map(|(q, _)| q)
    }

    /// Halves every counter.
    pub fn decay(&mut self) {
        for curve in &mut self.hits {
            for h in curve.iter_mut() {
                *h >>= 1;
            }
        }
        for m in &mut self.misses {
            *m >>= 1;
        }
    }
}
