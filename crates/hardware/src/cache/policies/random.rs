//! Random Replacement Policy.
//!
//! This policy picks any way of the set, valid or not. It uses a xorshift64
//! generator, avoiding the overhead of a general-purpose RNG and keeping runs
//! reproducible for a given seed.

/// Random policy state.
#[derive(Clone, Debug)]
pub struct RandomPolicy {
    /// Number of ways in the cache.
    ways: usize,
    /// Internal state for the pseudo-random number generator.
    state: u64,
}

impl RandomPolicy {
    /// Fallback seed; xorshift never leaves the all-zero state.
    const ZERO_SEED_REPLACEMENT: u64 = 0x9E37_79B9_7F4A_7C15;

    /// Creates a new Random policy instance.
    ///
    /// # Arguments
    ///
    /// * `ways` - The associativity (number of ways) of the cache.
    /// * `seed` - Initial generator state.
    pub const fn new(ways: usize, seed: u64) -> Self {
        let state = if seed == 0 {
            Self::ZERO_SEED_REPLACEMENT
        } else {
            seed
        };
        Self { ways, state }
    }

    /// Generates a pseudo-random number and maps it to a way index in `[0, ways)`.
    pub fn select(&mut self) -> usize {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        (x % self.ways as u64) as usize
    }
}
