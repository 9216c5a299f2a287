//! Configuration error definitions.
//!
//! A cache is only ever built from a geometry whose set count and associativity are powers
//! of two, since the set index is extracted with a bitmask. Every precondition violation is
//! reported here when the cache is constructed; once built, accesses and installs cannot fail.

use thiserror::Error;

/// Result alias for fallible configuration and construction.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while validating a cache configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The total cache size is zero.
    #[error("cache size must be non-zero")]
    ZeroSize,

    /// The line size is zero.
    #[error("cache line size must be non-zero")]
    ZeroLineSize,

    /// The associativity is zero.
    #[error("associativity must be non-zero")]
    ZeroWays,

    /// The line size is not a power of two.
    #[error("cache line size {0} is not a power of two")]
    LineSizeNotPowerOfTwo(u64),

    /// The associativity is not a power of two.
    #[error("associativity {0} is not a power of two")]
    WaysNotPowerOfTwo(usize),

    /// The associativity exceeds the per-set capacity.
    #[error("associativity {ways} exceeds the maximum of {max} ways per set")]
    TooManyWays {
        /// Requested associativity.
        ways: usize,
        /// Largest supported associativity.
        max: usize,
    },

    /// The size does not divide into whole sets of `ways` lines.
    #[error("cache size {size} is not a multiple of line size {line} x {ways} ways")]
    UnevenSets {
        /// Total size in bytes.
        size: u64,
        /// Line size in bytes.
        line: u64,
        /// Associativity.
        ways: usize,
    },

    /// The derived number of sets is not a power of two.
    #[error("derived set count {0} is not a power of two")]
    SetsNotPowerOfTwo(u64),

    /// A partitioned policy was configured for a core count it cannot split between.
    #[error("way partitioning requires exactly {expected} cores, got {got}")]
    PartitionCores {
        /// Core count the partitioning policies support.
        expected: u32,
        /// Configured core count.
        got: u32,
    },

    /// The static core-0 quota leaves one of the two cores without ways.
    #[error("core 0 way quota {quota} must lie in [1, {max}]")]
    PartitionQuota {
        /// Configured core-0 quota.
        quota: usize,
        /// Largest valid quota (`ways - 1`).
        max: usize,
    },

    /// Dynamic partitioning was configured with a zero-length epoch or sampling stride.
    #[error("dynamic partitioning {0} must be non-zero")]
    ZeroPartitionParameter(&'static str),

    /// A replacement policy selector did not name a known policy.
    #[error("unknown replacement policy `{0}` (expected lru, random, swp, dwp or 0-3)")]
    UnknownPolicy(String),

    /// The configuration document could not be parsed.
    #[error("invalid cache configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("failed to read cache configuration: {0}")]
    Io(#[from] std::io::Error),
}
