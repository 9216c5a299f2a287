//! Replacement Policy Tests.
//!
//! Behaviour every policy shares (a missed line is resident after its fill and
//! then hits) plus the properties specific to random replacement.

use cachesim_core::{AccessResult, Cache, CacheConfig, ReplacementPolicy};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::{Driver, partitioned_config, set0, small_config};

fn config_for(policy: ReplacementPolicy) -> CacheConfig {
    if policy.is_partitioned() {
        partitioned_config(policy, 2)
    } else {
        small_config(policy)
    }
}

#[rstest]
#[case::lru(ReplacementPolicy::Lru)]
#[case::random(ReplacementPolicy::Random)]
#[case::swp(ReplacementPolicy::StaticPartition)]
#[case::dwp(ReplacementPolicy::DynamicPartition)]
fn missed_line_hits_after_install(#[case] policy: ReplacementPolicy) {
    let mut drv = Driver::new(&config_for(policy));
    assert_eq!(drv.cache.policy(), policy);

    assert_eq!(drv.request(set0(5), false, 0).0, AccessResult::Miss);
    assert!(drv.cache.contains(set0(5)));
    assert_eq!(drv.access(set0(5), false, 0), AccessResult::Hit);
}

#[rstest]
#[case::lru(ReplacementPolicy::Lru)]
#[case::random(ReplacementPolicy::Random)]
#[case::swp(ReplacementPolicy::StaticPartition)]
#[case::dwp(ReplacementPolicy::DynamicPartition)]
fn requested_line_always_resident(#[case] policy: ReplacementPolicy) {
    let mut drv = Driver::new(&config_for(policy));
    for n in 0..32 {
        let core = (n % 2) as u32;
        let _ = drv.request(set0(n % 11), n % 3 == 0, core);
        assert!(drv.cache.contains(set0(n % 11)), "line {} missing", set0(n % 11));
    }
}

#[rstest]
#[case::lru(ReplacementPolicy::Lru)]
#[case::random(ReplacementPolicy::Random)]
#[case::swp(ReplacementPolicy::StaticPartition)]
#[case::dwp(ReplacementPolicy::DynamicPartition)]
fn partition_quota_reported_only_when_partitioned(#[case] policy: ReplacementPolicy) {
    let cache = Cache::new(&config_for(policy)).unwrap();
    assert_eq!(cache.partition_quota().is_some(), policy.is_partitioned());
}

// ──────────────────────────────────────────────────────────
// Random replacement
// ──────────────────────────────────────────────────────────

fn random_victims(seed: u64) -> Vec<u64> {
    let mut config = small_config(ReplacementPolicy::Random);
    config.seed = seed;
    let mut drv = Driver::new(&config);
    (0..64)
        .filter_map(|n| drv.request(set0(n), false, 0).1)
        .map(|evicted| evicted.addr.val())
        .collect()
}

/// The same seed replays the same victim sequence.
#[test]
fn random_is_deterministic_per_seed() {
    assert_eq!(random_victims(7), random_victims(7));
}

/// Different seeds give different victim sequences.
#[test]
fn random_seed_changes_victims() {
    assert_ne!(random_victims(7), random_victims(8));
}

/// Random replacement spreads victims over every way.
#[test]
fn random_uses_every_way() {
    let mut drv = Driver::new(&small_config(ReplacementPolicy::Random));
    let mut hit = [false; 4];
    for n in 0..256 {
        let _ = drv.request(set0(n), false, 0);
        let way = drv.cache.set(0).unwrap().find(n).unwrap();
        hit[way] = true;
    }
    assert_eq!(hit, [true; 4]);
}

/// Random ignores validity, so victims may be picked while ways are still empty.
/// Every displaced line here is dirty, and each one is counted.
#[test]
fn random_counts_dirty_evictions() {
    let mut drv = Driver::new(&small_config(ReplacementPolicy::Random));
    let mut displaced = 0;
    let mut writebacks = 0;
    for n in 0..64 {
        let (_, evicted) = drv.request(set0(n), true, 0);
        if let Some(evicted) = evicted {
            displaced += 1;
            writebacks += u64::from(evicted.needs_writeback());
        }
    }
    assert!(displaced >= 60);
    assert_eq!(writebacks, displaced);
    assert_eq!(drv.cache.stats().dirty_evicts, writebacks);
}
