//! Line addresses and set/tag decomposition.
//!
//! This module defines the addressing rules of a set-associative cache. It provides the following:
//! 1. **Line Addresses:** A strong type for addresses with the intra-line offset already removed.
//! 2. **Geometry:** Set count and associativity, both powers of two, derived from a validated config.
//! 3. **Decomposition:** The single mapping from a line address to its `(index, tag)` location.

/// A memory address divided by the cache line size.
///
/// Drivers shift byte addresses by the line offset before presenting them to the cache,
/// so two byte addresses within the same line produce the same `LineAddr`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineAddr(pub u64);

impl LineAddr {
    /// Creates a line address from a raw value that already excludes offset bits.
    #[inline(always)]
    pub const fn new(line_addr: u64) -> Self {
        Self(line_addr)
    }

    /// Converts a byte address into a line address.
    ///
    /// # Arguments
    ///
    /// * `byte_addr` - The full byte address.
    /// * `line_bytes` - The cache line size in bytes (a power of two).
    #[inline(always)]
    pub const fn from_byte_addr(byte_addr: u64, line_bytes: u64) -> Self {
        Self(byte_addr >> line_bytes.trailing_zeros())
    }

    /// Returns the raw line address value.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }
}

impl From<u64> for LineAddr {
    fn from(line_addr: u64) -> Self {
        Self(line_addr)
    }
}

/// The set index and tag a line address maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    /// Set index (low `log2(num_sets)` bits of the line address).
    pub index: usize,
    /// Tag (the remaining high-order bits).
    pub tag: u64,
}

/// Shape of a set-associative cache.
///
/// Only constructed from a validated configuration, so both `num_sets` and `ways`
/// are non-zero powers of two and `ways <= MAX_WAYS_PER_SET`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    num_sets: usize,
    ways: usize,
    index_bits: u32,
}

impl Geometry {
    /// Builds a geometry from already-validated parameters.
    pub(crate) const fn new(num_sets: usize, ways: usize) -> Self {
        Self {
            num_sets,
            ways,
            index_bits: num_sets.trailing_zeros(),
        }
    }

    /// Number of sets in the cache.
    #[inline(always)]
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Associativity (ways per set).
    #[inline(always)]
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Number of line-address bits consumed by the set index.
    #[inline(always)]
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Mask selecting the set index from a line address.
    #[inline(always)]
    pub const fn index_mask(&self) -> u64 {
        (self.num_sets as u64) - 1
    }

    /// Splits a line address into its set index and tag.
    ///
    /// Both the access and the install path go through this function, so a given
    /// address always lands in the same set with the same tag.
    #[inline(always)]
    pub const fn decompose(&self, addr: LineAddr) -> Location {
        Location {
            index: (addr.0 & self.index_mask()) as usize,
            // A one-set cache has zero index bits; `>> 0` keeps the whole address as the tag.
            tag: addr.0 >> self.index_bits,
        }
    }

    /// Rebuilds the line address that produced a location.
    ///
    /// Used to address write-backs of evicted lines in the next level.
    #[inline(always)]
    pub const fn recompose(&self, loc: Location) -> LineAddr {
        LineAddr((loc.tag << self.index_bits) | loc.index as u64)
    }
}
