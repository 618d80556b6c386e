//! # Location Deriver
//!
//! Computes the storage location of every registry entity from a tag, an
//! optional parent scope and the entity id:
//!
//! ```text
//! candidate(bump) = keccak256(
//!     len(tag) ‖ tag ‖ scope_marker ‖ scope ‖ len(id) ‖ id ‖ bump
//! )
//! location = candidate(b) for the smallest b in 0..=255 that is addressable
//! ```
//!
//! Every variable-length component is length-prefixed so two distinct
//! (tag, scope, id) triples never hash the same preimage.
//!
//! | Entity | Tag | Scope | Id bytes |
//! |--------|-----|-------|----------|
//! | Network | `network` | none | name padded to 32 |
//! | Reporter | `reporter` | network | uuid seed (16, big-endian) |
//! | Case | `case` | network | uuid seed (16, big-endian) |
//! | Address | `address` | network | address padded to 64 |
//! | Asset | `asset` | network | mint padded to 64 ‖ asset id padded to 32 |
//! | Confirmation | `confirmation` | target address/asset | reporter uuid seed |
//!
//! The deriver never checks occupancy. Two live entities can only collide
//! if the entity store accepted a create at an occupied location, which it
//! refuses.

use crate::codec::{encode_address, encode_asset_id, encode_name, id_to_integer};
use crate::errors::DerivationError;
use crate::location::{FullSpace, Location, LocationSpace};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use tracing::trace;
use uuid::Uuid;

/// Fixed tag constants, one per entity type.
pub mod tags {
    /// Network tag.
    pub const NETWORK: &str = "network";
    /// Reporter tag.
    pub const REPORTER: &str = "reporter";
    /// Case tag.
    pub const CASE: &str = "case";
    /// Address tag.
    pub const ADDRESS: &str = "address";
    /// Asset tag.
    pub const ASSET: &str = "asset";
    /// Confirmation tag.
    pub const CONFIRMATION: &str = "confirmation";
}

/// Result of a derivation: the location and the bump that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Derivation {
    pub location: Location,
    pub bump: u8,
}

/// Deterministic location deriver over a [`LocationSpace`].
#[derive(Debug, Clone, Default)]
pub struct Deriver<S: LocationSpace = FullSpace> {
    space: S,
}

impl Deriver<FullSpace> {
    /// Deriver over the full location space.
    #[must_use]
    pub fn new() -> Self {
        Self { space: FullSpace }
    }
}

impl<S: LocationSpace> Deriver<S> {
    /// Deriver over a custom location space.
    pub fn with_space(space: S) -> Self {
        Self { space }
    }

    /// Derive the location for `(tag, scope, id)`.
    ///
    /// Returns the first addressable candidate and its bump.
    pub fn derive(
        &self,
        tag: &str,
        scope: Option<&Location>,
        id: &[u8],
    ) -> Result<Derivation, DerivationError> {
        for bump in 0..=u8::MAX {
            let location = candidate(tag, scope, id, bump);
            if self.space.is_addressable(&location) {
                trace!(tag, bump, %location, "location derived");
                return Ok(Derivation { location, bump });
            }
        }
        Err(DerivationError::NoValidBump {
            tag: tag.to_string(),
        })
    }

    /// Check that `bump` is the canonical bump for `(tag, scope, id)` and
    /// that it produces `location`.
    #[must_use]
    pub fn verify(
        &self,
        tag: &str,
        scope: Option<&Location>,
        id: &[u8],
        bump: u8,
        location: &Location,
    ) -> bool {
        match self.derive(tag, scope, id) {
            Ok(derived) => derived.bump == bump && derived.location == *location,
            Err(_) => false,
        }
    }

    /// Network location from its name.
    pub fn network_location(&self, name: &str) -> Result<Derivation, DerivationError> {
        self.derive(tags::NETWORK, None, &encode_name(name)?)
    }

    /// Reporter location inside a network.
    pub fn reporter_location(
        &self,
        network: &Location,
        reporter_id: Uuid,
    ) -> Result<Derivation, DerivationError> {
        self.derive(tags::REPORTER, Some(network), &uuid_seed(reporter_id))
    }

    /// Case location inside a network.
    pub fn case_location(
        &self,
        network: &Location,
        case_id: Uuid,
    ) -> Result<Derivation, DerivationError> {
        self.derive(tags::CASE, Some(network), &uuid_seed(case_id))
    }

    /// Address location inside a network.
    pub fn address_location(
        &self,
        network: &Location,
        address: &[u8],
    ) -> Result<Derivation, DerivationError> {
        self.derive(tags::ADDRESS, Some(network), &encode_address(address)?)
    }

    /// Asset location inside a network.
    pub fn asset_location(
        &self,
        network: &Location,
        mint: &[u8],
        asset_id: &[u8],
    ) -> Result<Derivation, DerivationError> {
        let mut id = encode_address(mint)?;
        id.extend_from_slice(&encode_asset_id(asset_id)?);
        self.derive(tags::ASSET, Some(network), &id)
    }

    /// Confirmation location, scoped by the confirmed address or asset.
    pub fn confirmation_location(
        &self,
        target: &Location,
        reporter_id: Uuid,
    ) -> Result<Derivation, DerivationError> {
        self.derive(tags::CONFIRMATION, Some(target), &uuid_seed(reporter_id))
    }
}

fn uuid_seed(id: Uuid) -> [u8; 16] {
    id_to_integer(id).to_be_bytes()
}

fn candidate(tag: &str, scope: Option<&Location>, id: &[u8], bump: u8) -> Location {
    let mut hasher = Keccak256::new();
    hasher.update((tag.len() as u32).to_be_bytes());
    hasher.update(tag.as_bytes());
    match scope {
        Some(scope) => {
            hasher.update([1u8]);
            hasher.update(scope.as_bytes());
        }
        None => hasher.update([0u8]),
    }
    hasher.update((id.len() as u32).to_be_bytes());
    hasher.update(id);
    hasher.update([bump]);

    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    Location(out)
}
