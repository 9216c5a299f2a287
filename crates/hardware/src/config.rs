//! Configuration system for the cache model.
//!
//! This module defines the configuration structures and enums used to parameterize
//! a cache. It provides:
//! 1. **Defaults:** Baseline geometry and partitioning constants.
//! 2. **Structures:** Cache geometry plus the partitioning sub-config.
//! 3. **Enums:** Replacement policy selectors.
//! 4. **Validation:** Precondition checks that derive the [`Geometry`] a cache is built from.
//!
//! Configuration is supplied as JSON (see [`CacheConfig::from_json`]) or built in code
//! starting from `CacheConfig::default()`.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::common::{ConfigError, Geometry, MAX_CORES, MAX_WAYS_PER_SET, Result};

/// Default configuration constants for the cache model.
mod defaults {
    /// Default cache size in bytes (32 KiB).
    pub const CACHE_SIZE: u64 = 32 * 1024;

    /// Default cache line size in bytes (64 bytes).
    pub const CACHE_LINE: u64 = 64;

    /// Default cache associativity (8 ways).
    pub const CACHE_WAYS: usize = 8;

    /// Default seed of the random replacement PRNG.
    pub const RANDOM_SEED: u64 = 123456789;

    /// Default number of cores sharing the cache.
    pub const NUM_CORES: u32 = 1;

    /// Default dynamic re-partition epoch, in observed accesses.
    pub const REPARTITION_INTERVAL: u64 = 10_000;

    /// Default shadow-tag sampling stride (every set is sampled).
    pub const SAMPLE_STRIDE: usize = 1;
}

/// Cache replacement policy algorithms.
///
/// Specifies the algorithm used to select which way to fill or evict
/// when a new line is installed into a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ReplacementPolicy {
    /// Least Recently Used replacement policy.
    ///
    /// Fills an empty way if one exists, otherwise evicts the way with
    /// the oldest last-access timestamp.
    #[default]
    #[serde(rename = "LRU", alias = "Lru", alias = "lru")]
    Lru,
    /// Random replacement policy.
    ///
    /// Picks any way of the set, valid or not.
    #[serde(rename = "RANDOM", alias = "Random", alias = "random")]
    Random,
    /// Static way partitioning.
    ///
    /// Core 0 owns a fixed contiguous range of ways, core 1 the rest;
    /// LRU runs inside the requester's range.
    #[serde(rename = "SWP", alias = "StaticPartition", alias = "swp")]
    StaticPartition,
    /// Dynamic way partitioning.
    ///
    /// Like static partitioning, but the core-0 quota is periodically
    /// re-derived from shadow-tag utility monitors.
    #[serde(rename = "DWP", alias = "DynamicPartition", alias = "dwp")]
    DynamicPartition,
}

impl ReplacementPolicy {
    /// Returns `true` for the two way-partitioning policies.
    pub const fn is_partitioned(self) -> bool {
        matches!(self, Self::StaticPartition | Self::DynamicPartition)
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lru => "LRU",
            Self::Random => "RANDOM",
            Self::StaticPartition => "SWP",
            Self::DynamicPartition => "DWP",
        };
        f.write_str(name)
    }
}

impl FromStr for ReplacementPolicy {
    type Err = ConfigError;

    /// Parses a policy name or the numeric selector (`0`-`3`) used by trace drivers.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "lru" => Ok(Self::Lru),
            "1" | "random" | "rand" => Ok(Self::Random),
            "2" | "swp" | "static" | "staticpartition" => Ok(Self::StaticPartition),
            "3" | "dwp" | "dynamic" | "dynamicpartition" => Ok(Self::DynamicPartition),
            _ => Err(ConfigError::UnknownPolicy(s.to_owned())),
        }
    }
}

/// Way-partitioning parameters.
///
/// Only consulted by [`ReplacementPolicy::StaticPartition`] and
/// [`ReplacementPolicy::DynamicPartition`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PartitionConfig {
    /// Number of cores issuing accesses to this cache
    #[serde(default = "PartitionConfig::default_num_cores")]
    pub num_cores: u32,

    /// Ways of every set reserved for core 0 (defaults to half the ways).
    /// Dynamic partitioning starts from this quota.
    #[serde(default)]
    pub core0_ways: Option<usize>,

    /// Observed accesses between dynamic re-partitions
    #[serde(default = "PartitionConfig::default_repartition_interval")]
    pub repartition_interval: u64,

    /// Shadow tags are kept for every `sample_stride`-th set
    #[serde(default = "PartitionConfig::default_sample_stride")]
    pub sample_stride: usize,
}

impl PartitionConfig {
    /// Returns the default core count.
    fn default_num_cores() -> u32 {
        defaults::NUM_CORES
    }

    /// Returns the default dynamic re-partition epoch.
    fn default_repartition_interval() -> u64 {
        defaults::REPARTITION_INTERVAL
    }

    /// Returns the default shadow-tag sampling stride.
    fn default_sample_stride() -> usize {
        defaults::SAMPLE_STRIDE
    }
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            num_cores: defaults::NUM_CORES,
            core0_ways: None,
            repartition_interval: defaults::REPARTITION_INTERVAL,
            sample_stride: defaults::SAMPLE_STRIDE,
        }
    }
}

/// Configuration of a single cache module.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{CacheConfig, ReplacementPolicy};
///
/// let json = r#"{
///     "size_bytes": 65536,
///     "line_bytes": 64,
///     "ways": 16,
///     "policy": "SWP",
///     "partition": { "num_cores": 2, "core0_ways": 12 }
/// }"#;
///
/// let config = CacheConfig::from_json(json).unwrap();
/// assert_eq!(config.policy, ReplacementPolicy::StaticPartition);
/// assert_eq!(config.core0_quota(), 12);
/// assert_eq!(config.validate().unwrap().num_sets(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Total cache size in bytes
    #[serde(default = "CacheConfig::default_size")]
    pub size_bytes: u64,

    /// Cache line size in bytes
    #[serde(default = "CacheConfig::default_line")]
    pub line_bytes: u64,

    /// Associativity (number of ways)
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Replacement policy
    #[serde(default)]
    pub policy: ReplacementPolicy,

    /// Way-partitioning parameters
    #[serde(default)]
    pub partition: PartitionConfig,

    /// Seed for the random replacement PRNG
    #[serde(default = "CacheConfig::default_seed")]
    pub seed: u64,
}

impl CacheConfig {
    /// Returns the default cache size in bytes.
    fn default_size() -> u64 {
        defaults::CACHE_SIZE
    }

    /// Returns the default cache line size in bytes.
    fn default_line() -> u64 {
        defaults::CACHE_LINE
    }

    /// Returns the default cache associativity (number of ways).
    fn default_ways() -> usize {
        defaults::CACHE_WAYS
    }

    /// Returns the default random replacement seed.
    fn default_seed() -> u64 {
        defaults::RANDOM_SEED
    }

    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if its contents are not a valid configuration.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// The core-0 way quota the partitioning policies start from.
    pub fn core0_quota(&self) -> usize {
        self.partition.core0_ways.unwrap_or(self.ways / 2)
    }

    /// Checks every geometry and policy precondition and derives the cache shape.
    ///
    /// The set count is `(size_bytes / line_bytes) / ways`. Line size, associativity,
    /// and set count must all be powers of two, and associativity may not exceed
    /// [`MAX_WAYS_PER_SET`].
    ///
    /// # Errors
    ///
    /// Returns the first violated precondition as a [`ConfigError`].
    pub fn validate(&self) -> Result<Geometry> {
        if self.size_bytes == 0 {
            return Err(ConfigError::ZeroSize);
        }
        if self.line_bytes == 0 {
            return Err(ConfigError::ZeroLineSize);
        }
        if self.ways == 0 {
            return Err(ConfigError::ZeroWays);
        }
        if !self.line_bytes.is_power_of_two() {
            return Err(ConfigError::LineSizeNotPowerOfTwo(self.line_bytes));
        }
        if !self.ways.is_power_of_two() {
            return Err(ConfigError::WaysNotPowerOfTwo(self.ways));
        }
        if self.ways > MAX_WAYS_PER_SET {
            return Err(ConfigError::TooManyWays {
                ways: self.ways,
                max: MAX_WAYS_PER_SET,
            });
        }

        // A set wider than u64 can never divide the size.
        let whole_sets = self
            .line_bytes
            .checked_mul(self.ways as u64)
            .is_some_and(|set_bytes| self.size_bytes % set_bytes == 0);
        if !whole_sets {
            return Err(ConfigError::UnevenSets {
                size: self.size_bytes,
                line: self.line_bytes,
                ways: self.ways,
            });
        }
        let num_sets = (self.size_bytes / self.line_bytes) / self.ways as u64;
        if !num_sets.is_power_of_two() {
            return Err(ConfigError::SetsNotPowerOfTwo(num_sets));
        }

        if self.policy.is_partitioned() {
            self.validate_partition()?;
        }

        Ok(Geometry::new(num_sets as usize, self.ways))
    }

    /// Checks the parameters only the partitioning policies consume.
    fn validate_partition(&self) -> Result<()> {
        let part = &self.partition;
        if part.num_cores != MAX_CORES {
            return Err(ConfigError::PartitionCores {
                expected: MAX_CORES,
                got: part.num_cores,
            });
        }
        let quota = self.core0_quota();
        if quota == 0 || quota >= self.ways {
            return Err(ConfigError::PartitionQuota {
                quota,
                max: self.ways.saturating_sub(1),
            });
        }
        if self.policy == ReplacementPolicy::DynamicPartition {
            if part.repartition_interval == 0 {
                return Err(ConfigError::ZeroPartitionParameter("repartition_interval"));
            }
            if part.sample_stride == 0 {
                return Err(ConfigError::ZeroPartitionParameter("sample_stride"));
            }
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    /// Creates a default cache configuration.
    ///
    /// 32 KiB, 64-byte lines, 8-way set-associative, LRU replacement, single core.
    fn default() -> Self {
        Self {
            size_bytes: defaults::CACHE_SIZE,
            line_bytes: defaults::CACHE_LINE,
            ways: defaults::CACHE_WAYS,
            policy: ReplacementPolicy::default(),
            partition: PartitionConfig::default(),
            seed: defaults::RANDOM_SEED,
        }
    }
}
