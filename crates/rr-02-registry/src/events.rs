//! # Registry Events
//!
//! Emitted after every committed mutation, never before. An event that
//! cannot be delivered (no subscribers) is dropped; the mutation stands.
//!
//! | Event | Trigger |
//! |-------|---------|
//! | `NetworkCreated` | `create_network` |
//! | `AuthorityChanged` | `set_authority` |
//! | `StakeConfigurationUpdated` | `update_stake_configuration` |
//! | `RewardConfigurationUpdated` | `update_reward_configuration` |
//! | `ReporterCreated` / `ReporterUpdated` | reporter administration |
//! | `ReporterActivated` / `ReporterDeactivated` / `ReporterUnstaked` | staking |
//! | `CaseCreated` / `CaseUpdated` | case lifecycle |
//! | `AddressCreated` / `AddressUpdated` / `AddressConfirmed` | address lifecycle |
//! | `AssetCreated` / `AssetUpdated` / `AssetConfirmed` | asset lifecycle |

use crate::domain::value_objects::{CaseStatus, Category, Identity, ReporterRole, Timestamp};
use rr_01_derivation::Location;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event published by the lifecycle engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    NetworkCreated {
        network: Location,
        name: String,
        authority: Identity,
    },
    AuthorityChanged {
        network: Location,
        previous: Identity,
        authority: Identity,
    },
    StakeConfigurationUpdated {
        network: Location,
    },
    RewardConfigurationUpdated {
        network: Location,
    },
    ReporterCreated {
        network: Location,
        reporter_id: Uuid,
        role: ReporterRole,
        account: Identity,
    },
    ReporterUpdated {
        network: Location,
        reporter_id: Uuid,
    },
    ReporterActivated {
        network: Location,
        reporter_id: Uuid,
        stake: u128,
    },
    ReporterDeactivated {
        network: Location,
        reporter_id: Uuid,
        unlock_timestamp: Timestamp,
    },
    ReporterUnstaked {
        network: Location,
        reporter_id: Uuid,
        amount: u128,
    },
    CaseCreated {
        network: Location,
        case_id: Uuid,
        reporter_id: Uuid,
    },
    CaseUpdated {
        network: Location,
        case_id: Uuid,
        status: CaseStatus,
    },
    AddressCreated {
        network: Location,
        address: Vec<u8>,
        case_id: Uuid,
        reporter_id: Uuid,
        risk_score: u8,
        category: Category,
    },
    AddressUpdated {
        network: Location,
        address: Vec<u8>,
        case_id: Uuid,
        risk_score: u8,
        category: Category,
    },
    AddressConfirmed {
        network: Location,
        address: Vec<u8>,
        reporter_id: Uuid,
        confirmations: u64,
    },
    AssetCreated {
        network: Location,
        mint: Vec<u8>,
        asset_id: Vec<u8>,
        case_id: Uuid,
        reporter_id: Uuid,
        risk_score: u8,
        category: Category,
    },
    AssetUpdated {
        network: Location,
        mint: Vec<u8>,
        asset_id: Vec<u8>,
        case_id: Uuid,
        risk_score: u8,
        category: Category,
    },
    AssetConfirmed {
        network: Location,
        mint: Vec<u8>,
        asset_id: Vec<u8>,
        reporter_id: Uuid,
        confirmations: u64,
    },
}

impl RegistryEvent {
    /// Event name, used as a log field.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::NetworkCreated { .. } => "NetworkCreated",
            Self::AuthorityChanged { .. } => "AuthorityChanged",
            Self::StakeConfigurationUpdated { .. } => "StakeConfigurationUpdated",
            Self::RewardConfigurationUpdated { .. } => "RewardConfigurationUpdated",
            Self::ReporterCreated { .. } => "ReporterCreated",
            Self::ReporterUpdated { .. } => "ReporterUpdated",
            Self::ReporterActivated { .. } => "ReporterActivated",
            Self::ReporterDeactivated { .. } => "ReporterDeactivated",
            Self::ReporterUnstaked { .. } => "ReporterUnstaked",
            Self::CaseCreated { .. } => "CaseCreated",
            Self::CaseUpdated { .. } => "CaseUpdated",
            Self::AddressCreated { .. } => "AddressCreated",
            Self::AddressUpdated { .. } => "AddressUpdated",
            Self::AddressConfirmed { .. } => "AddressConfirmed",
            Self::AssetCreated { .. } => "AssetCreated",
            Self::AssetUpdated { .. } => "AssetUpdated",
            Self::AssetConfirmed { .. } => "AssetConfirmed",
        }
    }

    /// Network the event belongs to.
    #[must_use]
    pub fn network(&self) -> Location {
        match self {
            Self::NetworkCreated { network, .. }
            | Self::AuthorityChanged { network, .. }
            | Self::StakeConfigurationUpdated { network }
            | Self::RewardConfigurationUpdated { network }
            | Self::ReporterCreated { network, .. }
            | Self::ReporterUpdated { network, .. }
            | Self::ReporterActivated { network, .. }
            | Self::ReporterDeactivated { network, .. }
            | Self::ReporterUnstaked { network, .. }
            | Self::CaseCreated { network, .. }
            | Self::CaseUpdated { network, .. }
            | Self::AddressCreated { network, .. }
            | Self::AddressUpdated { network, .. }
            | Self::AddressConfirmed { network, .. }
            | Self::AssetCreated { network, .. }
            | Self::AssetUpdated { network, .. }
            | Self::AssetConfirmed { network, .. } => *network,
        }
    }
}
