//! Set-Associative Cache.
//!
//! This module implements a single cache module driven by a stream of line addresses.
//! It provides:
//! 1. **Access:** Hit/miss resolution that touches only the matched line and the counters.
//! 2. **Install:** Victim selection, eviction, and fill of a line after a miss.
//! 3. **Inspection:** Side-effect-free probes for drivers and tests.
//!
//! # Access protocol
//!
//! A miss never allocates. The driver installs the line separately and then replays
//! the access, modelling a retry after the fill. The replay is what sets the dirty bit
//! for a write miss and refreshes the timestamp, so every dirty and timestamp mutation
//! after a fill flows through [`Cache::access`].
//!
//! ```text
//! access(A) -> Miss
//! install(A)          // line valid, clean, stamped with `now`
//! access(A) -> Hit    // replay: marks dirty if the original access was a write
//! ```
//!
//! The logical clock belongs to the driver. Every call takes the current cycle.

/// Cache line and cache set storage.
pub mod line;

/// Cache replacement policy implementations (LRU, random, static and dynamic partitioning).
pub mod policies;

pub use line::{CacheLine, CacheSet};

use tracing::{debug, trace, warn};

use self::policies::Policy;
use crate::common::{AccessKind, CoreId, Cycle, Geometry, LineAddr, Location, Result};
use crate::config::{CacheConfig, ReplacementPolicy};
use crate::stats::CacheStats;

/// Outcome of a cache lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessResult {
    /// A valid line with the requested tag is resident.
    Hit,
    /// No valid line with the requested tag is resident.
    Miss,
}

impl AccessResult {
    /// Returns `true` for [`AccessResult::Hit`].
    #[inline(always)]
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit)
    }
}

/// A valid line displaced by [`Cache::install`].
///
/// Carries everything the next level needs to accept a write-back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Evicted {
    /// The line as it was when evicted.
    pub line: CacheLine,
    /// Line address the evicted line was holding.
    pub addr: LineAddr,
}

impl Evicted {
    /// The evicted line was modified and must be written back.
    #[inline(always)]
    pub const fn needs_writeback(&self) -> bool {
        self.line.dirty
    }
}

/// A set-associative cache with a configurable replacement policy.
#[derive(Clone, Debug)]
pub struct Cache {
    sets: Vec<CacheSet>,
    geometry: Geometry,
    policy: Policy,
    stats: CacheStats,
}

impl Cache {
    /// Creates an empty cache from a configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`](crate::common::ConfigError) if the geometry or the
    /// partitioning parameters violate a precondition (see [`CacheConfig::validate`]).
    pub fn new(config: &CacheConfig) -> Result<Self> {
        let geometry = config.validate()?;
        let policy = Policy::from_config(config, &geometry);

        debug!(
            sets = geometry.num_sets(),
            ways = geometry.ways(),
            policy = %config.policy,
            "creating cache"
        );

        Ok(Self {
            sets: vec![CacheSet::new(geometry.ways()); geometry.num_sets()],
            geometry,
            policy,
            stats: CacheStats::default(),
        })
    }

    /// Looks up a line and updates the statistics.
    ///
    /// On a hit the matched line's timestamp becomes `now`, and a write marks it dirty.
    /// A miss changes nothing but the counters.
    ///
    /// # Arguments
    ///
    /// * `line_addr` - Address of the line, excluding offset bits.
    /// * `is_write` - Whether this access is a write.
    /// * `core_id` - Core that issued the access.
    /// * `now` - Current logical cycle.
    pub fn access(
        &mut self,
        line_addr: u64,
        is_write: bool,
        core_id: CoreId,
        now: Cycle,
    ) -> AccessResult {
        let loc = self.geometry.decompose(LineAddr(line_addr));
        let kind = AccessKind::from(is_write);
        self.policy.observe(loc, core_id);
        self.stats.record_access(kind);

        let set = &mut self.sets[loc.index];
        if let Some(way) = set.find(loc.tag) {
            let line = &mut set.lines_mut()[way];
            line.last_access = now;
            if is_write {
                line.dirty = true;
            }
            trace!(index = loc.index, tag = loc.tag, way, is_write, core_id, "hit");
            AccessResult::Hit
        } else {
            self.stats.record_miss(kind);
            trace!(index = loc.index, tag = loc.tag, is_write, core_id, "miss");
            AccessResult::Miss
        }
    }

    /// Brings a line into the cache after a miss.
    ///
    /// The policy picks a way in the target set. If that way holds a valid line, the
    /// line is evicted and returned, and a dirty victim bumps the dirty-eviction counter.
    /// The new line is installed valid, clean, owned by `core_id`, and stamped with `now`;
    /// `is_write` does not set the dirty bit (the replayed access does).
    ///
    /// Installing a tag that is already resident refreshes that line instead of creating
    /// a duplicate, and evicts nothing.
    ///
    /// # Returns
    ///
    /// The displaced line, if the chosen way was occupied.
    pub fn install(
        &mut self,
        line_addr: u64,
        is_write: bool,
        core_id: CoreId,
        now: Cycle,
    ) -> Option<Evicted> {
        let loc = self.geometry.decompose(LineAddr(line_addr));
        let set = &mut self.sets[loc.index];

        if let Some(way) = set.find(loc.tag) {
            warn!(
                index = loc.index,
                tag = loc.tag,
                way,
                "install of resident line; refreshing in place"
            );
            let line = &mut set.lines_mut()[way];
            line.last_access = now;
            line.core_id = core_id;
            return None;
        }

        let way = self.policy.select_victim(set, core_id);
        let slot = &mut set.lines_mut()[way];
        let victim = *slot;
        *slot = CacheLine {
            valid: true,
            dirty: false,
            tag: loc.tag,
            core_id,
            last_access: now,
        };

        trace!(
            index = loc.index,
            tag = loc.tag,
            way,
            is_write,
            core_id,
            "installed line"
        );

        if !victim.valid {
            return None;
        }
        if victim.dirty {
            self.stats.dirty_evicts += 1;
        }
        let addr = self.geometry.recompose(Location {
            index: loc.index,
            tag: victim.tag,
        });
        debug!(
            index = loc.index,
            way,
            victim_tag = victim.tag,
            dirty = victim.dirty,
            owner = victim.core_id,
            "evicted line"
        );
        Some(Evicted { line: victim, addr })
    }

    /// Returns `true` if the line is resident. No state changes.
    pub fn contains(&self, line_addr: u64) -> bool {
        self.probe(line_addr).is_some()
    }

    /// Returns the resident line for an address without touching it.
    pub fn probe(&self, line_addr: u64) -> Option<&CacheLine> {
        let loc = self.geometry.decompose(LineAddr(line_addr));
        let set = &self.sets[loc.index];
        set.find(loc.tag).map(|way| &set.lines()[way])
    }

    /// Set index and tag an address maps to.
    pub const fn locate(&self, line_addr: u64) -> Location {
        self.geometry.decompose(LineAddr(line_addr))
    }

    /// The set at `index`, if it exists.
    pub fn set(&self, index: usize) -> Option<&CacheSet> {
        self.sets.get(index)
    }

    /// Shape of the cache.
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Active replacement policy selector.
    pub const fn policy(&self) -> ReplacementPolicy {
        self.policy.kind()
    }

    /// Ways currently reserved for core 0, for the partitioning policies.
    pub fn partition_quota(&self) -> Option<usize> {
        self.policy.partition().map(policies::WayPartition::quota)
    }

    /// Accumulated access statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Prints the statistics report under `label` to stdout.
    pub fn print_stats(&self, label: &str) {
        self.stats.print(label);
    }
}
