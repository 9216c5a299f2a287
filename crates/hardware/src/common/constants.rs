//! Global Model Constants.
//!
//! This module defines the hard limits of the cache model. It includes:
//! 1. **Associativity:** The fixed capacity of every cache set.
//! 2. **Partitioning:** The number of cores the way-partitioning policies split a set between.

/// Maximum number of ways in a cache set.
///
/// Sets are stored inline as fixed arrays of this length; the configured
/// associativity selects how many of them are live.
pub const MAX_WAYS_PER_SET: usize = 16;

/// Number of cores supported by the way-partitioning policies.
///
/// A set is split into exactly two contiguous ranges, one per core.
pub const MAX_CORES: u32 = 2;
