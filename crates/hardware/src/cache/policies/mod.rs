//! Cache Replacement Policies.
//!
//! Selects the way a new line is installed into.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used, by per-line timestamp.
//! - `Random`: Uniform pick over all ways.
//! - `StaticPartition`: LRU inside a fixed per-core range of ways.
//! - `DynamicPartition`: LRU inside a per-core range whose boundary follows
//!   shadow-tag utility monitors.
//!
//! The set of policies is closed, so they are variants of [`Policy`] rather than
//! trait objects.

/// Utility monitor driving dynamic way partitioning.
pub mod dynamic;

/// Least Recently Used victim search.
pub mod lru;

/// Two-core way partitioning.
pub mod partition;

/// Random replacement policy.
pub mod random;

pub use dynamic::UtilityMonitor;
pub use partition::WayPartition;
pub use random::RandomPolicy;

use tracing::debug;

use crate::cache::CacheSet;
use crate::common::{CoreId, Geometry, Location};
use crate::config::{CacheConfig, ReplacementPolicy};

/// Active replacement policy and its state.
#[derive(Clone, Debug)]
pub enum Policy {
    /// Least Recently Used over the whole set.
    Lru,
    /// Random way.
    Random(RandomPolicy),
    /// LRU within a fixed per-core range.
    StaticPartition(WayPartition),
    /// LRU within a per-core range re-derived every epoch.
    DynamicPartition {
        /// Current split of the ways.
        partition: WayPartition,
        /// Shadow-tag hit curves feeding the split.
        monitor: UtilityMonitor,
    },
}

impl Policy {
    /// Builds the policy selected by `config` for a cache of shape `geometry`.
    pub fn from_config(config: &CacheConfig, geometry: &Geometry) -> Self {
        let ways = geometry.ways();
        match config.policy {
            ReplacementPolicy::Lru => Self::Lru,
            ReplacementPolicy::Random => Self::Random(RandomPolicy::new(ways, config.seed)),
            ReplacementPolicy::StaticPartition => {
                Self::StaticPartition(WayPartition::new(ways, config.core0_quota()))
            }
            ReplacementPolicy::DynamicPartition => Self::DynamicPartition {
                partition: WayPartition::new(ways, config.core0_quota()),
                monitor: UtilityMonitor::new(
                    geometry.num_sets(),
                    ways,
                    config.partition.sample_stride,
                    config.partition.repartition_interval,
                ),
            },
        }
    }

    /// The configuration selector this policy was built from.
    pub const fn kind(&self) -> ReplacementPolicy {
        match self {
            Self::Lru => ReplacementPolicy::Lru,
            Self::Random(_) => ReplacementPolicy::Random,
            Self::StaticPartition(_) => ReplacementPolicy::StaticPartition,
            Self::DynamicPartition { .. } => ReplacementPolicy::DynamicPartition,
        }
    }

    /// Current way split, for the partitioning policies.
    pub const fn partition(&self) -> Option<&WayPartition> {
        match self {
            Self::StaticPartition(partition) | Self::DynamicPartition { partition, .. } => {
                Some(partition)
            }
            Self::Lru | Self::Random(_) => None,
        }
    }

    /// Picks the way in `set` that a line requested by `core` is installed into.
    ///
    /// The returned way may hold a valid line; the caller evicts it.
    pub fn select_victim(&mut self, set: &CacheSet, core: CoreId) -> usize {
        match self {
            Self::Lru => lru::select(set.lines(), 0..set.ways()),
            Self::Random(rng) => rng.select(),
            Self::StaticPartition(partition) | Self::DynamicPartition { partition, .. } => {
                lru::select(set.lines(), partition.range_for(core))
            }
        }
    }

    /// Feeds one access to policies that learn from the access stream.
    ///
    /// Dynamic partitioning moves its boundary here when an epoch closes.
    pub fn observe(&mut self, loc: Location, core: CoreId) {
        if let Self::DynamicPartition { partition, monitor } = self {
            if !monitor.observe(loc.index, loc.tag, core) {
                return;
            }
            if let Some(quota) = monitor.best_quota() {
                if quota != partition.quota() {
                    debug!(
                        from = partition.quota(),
                        to = quota,
                        observed = monitor.observed(),
                        "repartitioning ways"
                    );
                }
                partition.set_quota(quota);
            }
            monitor.decay();
        }
    }
}
