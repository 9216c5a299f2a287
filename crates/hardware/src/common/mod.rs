//! Common utilities and types used throughout the cache model.
//!
//! This module provides the building blocks shared by the cache, its policies, and the
//! configuration layer. It includes:
//! 1. **Address Types:** Line addresses and the set/tag decomposition derived from geometry.
//! 2. **Constants:** Hardware limits such as the maximum associativity.
//! 3. **Error Handling:** Configuration errors raised when building a cache.
//! 4. **Access Types:** Core identifiers, cycle counts, and read/write classification.

/// Line address and geometry types.
pub mod addr;

/// Common constants used throughout the model.
pub mod constants;

/// Configuration error type.
pub mod error;

/// Access classification and scalar aliases.
pub mod types;

pub use addr::{Geometry, LineAddr, Location};
pub use constants::{MAX_CORES, MAX_WAYS_PER_SET};
pub use error::{ConfigError, Result};
pub use types::{AccessKind, CoreId, Cycle};
