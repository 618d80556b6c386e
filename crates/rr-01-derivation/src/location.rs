//! # Location Value Object
//!
//! A 32-byte storage location. The zero location is reserved as the
//! absent sentinel and is never handed out by the deriver.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A derived 32-byte storage location.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Location(pub [u8; 32]);

impl Location {
    /// The reserved zero location.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates a location from a 32-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns true for the reserved zero location.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{}...{}",
            hex::encode(&self.0[..4]),
            hex::encode(&self.0[30..])
        )
    }
}

impl From<[u8; 32]> for Location {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// The set of locations a storage substrate can address.
///
/// The deriver keeps bumping until a candidate falls inside the space.
pub trait LocationSpace: Send + Sync {
    /// Returns true if `candidate` may hold a record.
    fn is_addressable(&self, candidate: &Location) -> bool;
}

/// Every location except the reserved zero location.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullSpace;

impl LocationSpace for FullSpace {
    fn is_addressable(&self, candidate: &Location) -> bool {
        !candidate.is_zero()
    }
}
