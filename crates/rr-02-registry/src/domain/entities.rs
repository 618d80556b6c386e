//! # Domain Entities
//!
//! Registry records keyed by derived location. Every record has a
//! `Default` value, which is what public queries return for an unoccupied
//! location.
//!
//! ## Ownership
//!
//! A network owns the reporter/case/address/asset/confirmation namespace
//! under it; records refer to their network by location. Addresses and
//! assets refer to their case and reporter by id, never by pointer.

use crate::domain::value_objects::{
    CaseStatus, Category, Identity, ReporterRole, ReporterStatus, Timestamp, TokenId,
};
use rr_01_derivation::Location;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// ENTITY KIND
// =============================================================================

/// Entity type tag carried by every stored record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Network,
    Reporter,
    Case,
    Address,
    Asset,
    Confirmation,
}

impl EntityKind {
    /// Derivation tag for this kind.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        use rr_01_derivation::tags;
        match self {
            Self::Network => tags::NETWORK,
            Self::Reporter => tags::REPORTER,
            Self::Case => tags::CASE,
            Self::Address => tags::ADDRESS,
            Self::Asset => tags::ASSET,
            Self::Confirmation => tags::CONFIRMATION,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A record the entity store can persist.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Kind tag written alongside the payload.
    const KIND: EntityKind;
}

// =============================================================================
// NETWORK
// =============================================================================

/// Per-role stake requirements and the unstake lock period.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeConfiguration {
    /// Seconds between deactivation and unstake.
    pub unlock_duration: u64,
    pub validator_stake: u128,
    pub tracer_stake: u128,
    pub publisher_stake: u128,
    pub authority_stake: u128,
    pub appraiser_stake: u128,
}

impl StakeConfiguration {
    /// Stake required to activate a reporter of `role`.
    #[must_use]
    pub fn requirement(&self, role: ReporterRole) -> u128 {
        match role {
            ReporterRole::Validator => self.validator_stake,
            ReporterRole::Tracer => self.tracer_stake,
            ReporterRole::Publisher => self.publisher_stake,
            ReporterRole::Authority => self.authority_stake,
            ReporterRole::Appraiser => self.appraiser_stake,
        }
    }
}

/// Fixed reward per reporting action.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardConfiguration {
    pub address_tracer_reward: u128,
    pub address_confirmation_reward: u128,
    pub asset_tracer_reward: u128,
    pub asset_confirmation_reward: u128,
}

/// A named, isolated registry instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub name: String,
    /// Own derived location; also the escrow and reward pool account.
    pub location: Location,
    pub authority: Identity,
    pub stake_token: TokenId,
    pub reward_token: TokenId,
    pub stake_configuration: StakeConfiguration,
    pub reward_configuration: RewardConfiguration,
    pub bump: u8,
}

impl Network {
    /// Account holding staked funds and paying rewards.
    #[must_use]
    pub fn escrow(&self) -> Identity {
        Identity::from(self.location)
    }

    /// True for the default (absent) record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.location.is_zero()
    }
}

impl Entity for Network {
    const KIND: EntityKind = EntityKind::Network;
}

// =============================================================================
// REPORTER
// =============================================================================

/// A role-holding identity that submits risk data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reporter {
    pub id: Uuid,
    pub network: Location,
    pub account: Identity,
    pub role: ReporterRole,
    pub name: String,
    pub url: String,
    pub status: ReporterStatus,
    pub stake: u128,
    pub unlock_timestamp: Timestamp,
    pub bump: u8,
}

impl Reporter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.network.is_zero()
    }
}

impl Entity for Reporter {
    const KIND: EntityKind = EntityKind::Reporter;
}

// =============================================================================
// CASE
// =============================================================================

/// A named investigation grouping flagged addresses and assets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub id: Uuid,
    pub network: Location,
    pub name: String,
    pub url: String,
    pub status: CaseStatus,
    pub reporter_id: Uuid,
    pub bump: u8,
}

impl Case {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.network.is_zero()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == CaseStatus::Open
    }
}

impl Entity for Case {
    const KIND: EntityKind = EntityKind::Case;
}

// =============================================================================
// FLAGGED ADDRESS / ASSET
// =============================================================================

/// Risk assessment shared by addresses and assets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFlag {
    pub case_id: Uuid,
    pub reporter_id: Uuid,
    pub confirmations: u64,
    pub risk_score: u8,
    pub category: Category,
}

/// A flagged on-chain address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub network: Location,
    /// Raw address bytes, unpadded.
    pub address: Vec<u8>,
    pub flag: RiskFlag,
    pub bump: u8,
}

impl Address {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.network.is_zero()
    }
}

impl Entity for Address {
    const KIND: EntityKind = EntityKind::Address;
}

/// A flagged asset (token or NFT) identified by mint and asset id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub network: Location,
    pub mint: Vec<u8>,
    pub asset_id: Vec<u8>,
    pub flag: RiskFlag,
    pub bump: u8,
}

impl Asset {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.network.is_zero()
    }
}

impl Entity for Asset {
    const KIND: EntityKind = EntityKind::Asset;
}

// =============================================================================
// CONFIRMATION
// =============================================================================

/// One reporter's attestation of a flagged address or asset. Immutable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub network: Location,
    /// Location of the confirmed address or asset.
    pub account: Location,
    pub reporter_id: Uuid,
    pub bump: u8,
}

impl Entity for Confirmation {
    const KIND: EntityKind = EntityKind::Confirmation;
}

/// A page of listed records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Records available before paging.
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags_match_deriver() {
        assert_eq!(EntityKind::Network.tag(), "network");
        assert_eq!(EntityKind::Confirmation.to_string(), "confirmation");
    }

    #[test]
    fn test_stake_requirement_by_role() {
        let config = StakeConfiguration {
            unlock_duration: 60,
            validator_stake: 1,
            tracer_stake: 2,
            publisher_stake: 3,
            authority_stake: 4,
            appraiser_stake: 5,
        };
        assert_eq!(config.requirement(ReporterRole::Tracer), 2);
        assert_eq!(config.requirement(ReporterRole::Appraiser), 5);
    }

    #[test]
    fn test_default_records_are_empty() {
        assert!(Network::default().is_empty());
        assert!(Reporter::default().is_empty());
        assert!(Case::default().is_empty());
        assert!(Address::default().is_empty());
        assert!(Asset::default().is_empty());
        assert_eq!(Address::default().flag.category, Category::None);
    }

    #[test]
    fn test_escrow_is_network_location() {
        let network = Network {
            location: Location::new([9u8; 32]),
            ..Network::default()
        };
        assert_eq!(network.escrow(), Identity::new([9u8; 32]));
    }
}
