//! Trace-driven set-associative cache model.
//!
//! This crate implements a single cache module of a memory-hierarchy simulator with the following:
//! 1. **Addressing:** Decomposition of pre-shifted line addresses into set index and tag.
//! 2. **Storage:** Fixed-capacity sets of cache lines carrying valid, dirty, owner, and timestamp state.
//! 3. **Replacement:** Strict LRU, random, and static/dynamic way partitioning for two cores.
//! 4. **Statistics:** Read/write access and miss counters, dirty evictions, and the frozen report format.
//!
//! The cache never advances time on its own. Drivers own the logical clock and pass the
//! current cycle into every [`Cache::access`] and [`Cache::install`] call.
//!
//! # Examples
//!
//! ```
//! use cachesim_core::{AccessResult, Cache, CacheConfig};
//!
//! let config = CacheConfig {
//!     size_bytes: 32 * 1024,
//!     line_bytes: 64,
//!     ways: 8,
//!     ..CacheConfig::default()
//! };
//! let mut cache = Cache::new(&config).unwrap();
//! assert_eq!(cache.geometry().num_sets(), 64);
//!
//! assert_eq!(cache.access(0x40, false, 0, 1), AccessResult::Miss);
//! let _ = cache.install(0x40, false, 0, 1);
//! assert_eq!(cache.access(0x40, true, 0, 2), AccessResult::Hit);
//! ```

/// Set-associative cache: lines, sets, access and install engines.
pub mod cache;
/// Common types and constants (line addresses, geometry, errors).
pub mod common;
/// Cache configuration (defaults, policy selectors, partitioning parameters).
pub mod config;
/// Access statistics and the report format.
pub mod stats;

/// Main cache type; construct with `Cache::new`.
pub use crate::cache::{AccessResult, Cache, CacheLine, CacheSet, Evicted};
/// Address decomposition types.
pub use crate::common::{ConfigError, Geometry, LineAddr, Location};
/// Root configuration type; use `CacheConfig::default()` or deserialize from JSON.
pub use crate::config::{CacheConfig, PartitionConfig, ReplacementPolicy};
/// Statistics counters and report.
pub use crate::stats::{CacheStats, StatsReport};
