//! Access classification types.
//!
//! Small scalar aliases shared by the access path, the policies, and drivers.

/// Identifier of the core that issued an access.
pub type CoreId = u32;

/// Logical cycle number supplied by the driver's clock.
pub type Cycle = u64;

/// Kind of memory operation presented to the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// Load (data read).
    Read,
    /// Store (data write).
    Write,
}

impl AccessKind {
    /// Returns `true` for [`AccessKind::Write`].
    #[inline(always)]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

impl From<bool> for AccessKind {
    fn from(is_write: bool) -> Self {
        if is_write { Self::Write } else { Self::Read }
    }
}
