//! # Stake/Reward Ledger
//!
//! Pure state transitions for reporter staking, plus reward amounts.
//! Fund movement itself happens in the service through `FundsTransfer`;
//! these functions only decide what must move and what the reporter looks
//! like afterwards.
//!
//! ```text
//!            activate (transfer in)
//!  Inactive ───────────────────────→ Active
//!     ↑                                 │ deactivate
//!     │ unstake (transfer out)          ↓
//!     └─────────────────────────── Unstaking
//!           now ≥ unlock_timestamp
//! ```

use crate::domain::entities::{Network, Reporter, RewardConfiguration};
use crate::domain::value_objects::{ReporterStatus, Timestamp};
use crate::errors::{RegistryError, RegistryResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// STAKE TRANSITIONS
// =============================================================================

/// Validate activation and return the stake that must be transferred in.
pub fn begin_activation(reporter: &Reporter, network: &Network) -> RegistryResult<u128> {
    if reporter.status != ReporterStatus::Inactive {
        return Err(RegistryError::InvalidState(format!(
            "reporter {} must be inactive to activate, is {:?}",
            reporter.id, reporter.status
        )));
    }
    let required = network.stake_configuration.requirement(reporter.role);
    if required == 0 {
        return Err(RegistryError::InvalidState(format!(
            "no stake configured for role {}",
            reporter.role
        )));
    }
    Ok(required)
}

/// Record a completed stake transfer.
pub fn complete_activation(reporter: &mut Reporter, amount: u128) {
    reporter.status = ReporterStatus::Active;
    reporter.stake = amount;
    reporter.unlock_timestamp = 0;
}

/// Start the unlock period.
pub fn deactivate(reporter: &mut Reporter, network: &Network, now: Timestamp) -> RegistryResult<()> {
    if reporter.status != ReporterStatus::Active {
        return Err(RegistryError::InvalidState(format!(
            "reporter {} must be active to deactivate, is {:?}",
            reporter.id, reporter.status
        )));
    }
    reporter.status = ReporterStatus::Unstaking;
    reporter.unlock_timestamp = now.saturating_add(network.stake_configuration.unlock_duration);
    Ok(())
}

/// Validate unstake and return the stake that must be transferred out.
pub fn begin_unstake(reporter: &Reporter, now: Timestamp) -> RegistryResult<u128> {
    if reporter.status != ReporterStatus::Unstaking {
        return Err(RegistryError::InvalidState(format!(
            "reporter {} must be unstaking to unstake, is {:?}",
            reporter.id, reporter.status
        )));
    }
    if now < reporter.unlock_timestamp {
        return Err(RegistryError::TooEarly {
            unlock_at: reporter.unlock_timestamp,
            now,
        });
    }
    Ok(reporter.stake)
}

/// Record a completed stake return.
pub fn complete_unstake(reporter: &mut Reporter) {
    reporter.status = ReporterStatus::Inactive;
    reporter.stake = 0;
    reporter.unlock_timestamp = 0;
}

// =============================================================================
// REWARDS
// =============================================================================

/// Rewarded reporting actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewardKind {
    AddressTracer,
    AddressConfirmation,
    AssetTracer,
    AssetConfirmation,
}

impl RewardKind {
    /// Configured amount for this action.
    #[must_use]
    pub fn amount(self, config: &RewardConfiguration) -> u128 {
        match self {
            Self::AddressTracer => config.address_tracer_reward,
            Self::AddressConfirmation => config.address_confirmation_reward,
            Self::AssetTracer => config.asset_tracer_reward,
            Self::AssetConfirmation => config.asset_confirmation_reward,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::AddressTracer => "address_tracer",
            Self::AddressConfirmation => "address_confirmation",
            Self::AssetTracer => "asset_tracer",
            Self::AssetConfirmation => "asset_confirmation",
        }
    }
}

impl fmt::Display for RewardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What happened to the reward attached to an operation.
///
/// A failed payout never undoes the operation that earned it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardOutcome {
    Paid { amount: u128 },
    /// Zero reward configured, or the operation carries none.
    Skipped,
    Failed { amount: u128, reason: String },
}

impl RewardOutcome {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::StakeConfiguration;
    use crate::domain::value_objects::ReporterRole;

    fn network() -> Network {
        Network {
            name: "N".into(),
            stake_configuration: StakeConfiguration {
                unlock_duration: 100,
                validator_stake: 10,
                tracer_stake: 20,
                publisher_stake: 30,
                authority_stake: 40,
                appraiser_stake: 0,
            },
            ..Network::default()
        }
    }

    fn reporter(role: ReporterRole) -> Reporter {
        Reporter {
            role,
            ..Reporter::default()
        }
    }

    #[test]
    fn test_activation_requires_stake_for_role() {
        let network = network();
        assert_eq!(
            begin_activation(&reporter(ReporterRole::Publisher), &network),
            Ok(30)
        );
        assert!(matches!(
            begin_activation(&reporter(ReporterRole::Appraiser), &network),
            Err(RegistryError::InvalidState(_))
        ));
    }

    #[test]
    fn test_full_stake_cycle() {
        let network = network();
        let mut reporter = reporter(ReporterRole::Tracer);

        let amount = begin_activation(&reporter, &network).unwrap();
        complete_activation(&mut reporter, amount);
        assert_eq!(reporter.status, ReporterStatus::Active);
        assert_eq!(reporter.stake, 20);
        assert!(begin_activation(&reporter, &network).is_err());

        deactivate(&mut reporter, &network, 1_000).unwrap();
        assert_eq!(reporter.status, ReporterStatus::Unstaking);
        assert_eq!(reporter.unlock_timestamp, 1_100);

        assert_eq!(
            begin_unstake(&reporter, 1_099),
            Err(RegistryError::TooEarly {
                unlock_at: 1_100,
                now: 1_099
            })
        );
        assert_eq!(begin_unstake(&reporter, 1_100), Ok(20));

        complete_unstake(&mut reporter);
        assert_eq!(reporter.status, ReporterStatus::Inactive);
        assert_eq!(reporter.stake, 0);
    }

    #[test]
    fn test_deactivate_requires_active() {
        let network = network();
        let mut reporter = reporter(ReporterRole::Validator);
        assert!(deactivate(&mut reporter, &network, 0).is_err());
        assert_eq!(reporter.status, ReporterStatus::Inactive);
    }

    #[test]
    fn test_unstake_requires_unstaking() {
        let reporter = reporter(ReporterRole::Validator);
        assert!(matches!(
            begin_unstake(&reporter, u64::MAX),
            Err(RegistryError::InvalidState(_))
        ));
    }

    #[test]
    fn test_unlock_saturates() {
        let mut network = network();
        network.stake_configuration.unlock_duration = u64::MAX;
        let mut reporter = reporter(ReporterRole::Validator);
        complete_activation(&mut reporter, 10);
        deactivate(&mut reporter, &network, 5).unwrap();
        assert_eq!(reporter.unlock_timestamp, u64::MAX);
    }

    #[test]
    fn test_reward_amounts() {
        let config = RewardConfiguration {
            address_tracer_reward: 1,
            address_confirmation_reward: 2,
            asset_tracer_reward: 3,
            asset_confirmation_reward: 4,
        };
        assert_eq!(RewardKind::AddressTracer.amount(&config), 1);
        assert_eq!(RewardKind::AddressConfirmation.amount(&config), 2);
        assert_eq!(RewardKind::AssetTracer.amount(&config), 3);
        assert_eq!(RewardKind::AssetConfirmation.amount(&config), 4);
        assert_eq!(RewardKind::AssetTracer.to_string(), "asset_tracer");
    }
}
