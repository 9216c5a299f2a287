use cachesim_core::common::{CoreId, Cycle};
use cachesim_core::{AccessResult, Cache, CacheConfig, Evicted, ReplacementPolicy};
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A 512-byte cache with 64-byte lines and 4 ways: 2 sets.
///
/// Set index = line & 1, tag = line >> 1. Even line addresses share set 0.
pub fn small_config(policy: ReplacementPolicy) -> CacheConfig {
    CacheConfig {
        size_bytes: 512,
        line_bytes: 64,
        ways: 4,
        policy,
        ..CacheConfig::default()
    }
}

/// Two-core partitioned variant of [`small_config`] with the given core-0 quota.
pub fn partitioned_config(policy: ReplacementPolicy, core0_ways: usize) -> CacheConfig {
    let mut config = small_config(policy);
    config.partition.num_cores = 2;
    config.partition.core0_ways = Some(core0_ways);
    config
}

/// Line address of the `n`-th distinct line mapping to set 0 of [`small_config`].
pub const fn set0(n: u64) -> u64 {
    n * 2
}

/// Drives a cache the way a trace driver does, advancing the clock by one cycle per call.
pub struct Driver {
    pub cache: Cache,
    pub now: Cycle,
}

impl Driver {
    pub fn new(config: &CacheConfig) -> Self {
        init_tracing();
        Self {
            cache: Cache::new(config).unwrap(),
            now: 0,
        }
    }

    pub fn tick(&mut self) -> Cycle {
        self.now += 1;
        self.now
    }

    /// A bare lookup.
    pub fn access(&mut self, line: u64, is_write: bool, core: CoreId) -> AccessResult {
        let now = self.tick();
        self.cache.access(line, is_write, core, now)
    }

    /// A bare install.
    pub fn install(&mut self, line: u64, is_write: bool, core: CoreId) -> Option<Evicted> {
        let now = self.tick();
        self.cache.install(line, is_write, core, now)
    }

    /// Access; on a miss install and replay the access in the same cycle.
    ///
    /// Returns the outcome of the first lookup and the line displaced by the fill.
    /// The replay is counted in the statistics like any other access.
    pub fn request(&mut self, line: u64, is_write: bool, core: CoreId) -> (AccessResult, Option<Evicted>) {
        let now = self.tick();
        let first = self.cache.access(line, is_write, core, now);
        if first.is_hit() {
            return (first, None);
        }
        let evicted = self.cache.install(line, is_write, core, now);
        let _ = self.cache.access(line, is_write, core, now);
        (first, evicted)
    }

    /// Miss plus install without the replay, filling `line` clean.
    pub fn fill(&mut self, line: u64, core: CoreId) -> Option<Evicted> {
        let now = self.tick();
        let _ = self.cache.access(line, false, core, now);
        self.cache.install(line, false, core, now)
    }
}
