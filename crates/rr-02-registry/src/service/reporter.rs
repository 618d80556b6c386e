//! Reporter administration and staking.

use super::RegistryService;
use crate::domain::entities::Reporter;
use crate::domain::ledger;
use crate::domain::policy;
use crate::domain::value_objects::{Identity, ReporterStatus};
use crate::errors::{RegistryError, RegistryResult};
use crate::events::RegistryEvent;
use crate::metrics;
use crate::ports::inbound::{CreateReporterRequest, ReporterUpdate};
use crate::ports::outbound::{EventSink, FundsTransfer, StorageSubstrate};
use crate::store::{Changeset, Versioned};
use rr_01_derivation::{encode_name, encode_url, Location};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

impl<S, F, E> RegistryService<S, F, E>
where
    S: StorageSubstrate,
    F: FundsTransfer,
    E: EventSink,
{
    #[instrument(skip(self, request), fields(reporter_id = %request.id, role = %request.role))]
    pub(super) async fn create_reporter_internal(
        &self,
        caller: Identity,
        name: &str,
        request: CreateReporterRequest,
    ) -> RegistryResult<Reporter> {
        let network = self.load_network(name).await?.value;
        policy::authorize_admin(caller, &network)?;
        encode_name(&request.name)?;
        encode_url(&request.url)?;

        let derivation = self
            .deriver
            .reporter_location(&network.location, request.id)?;
        let reporter = Reporter {
            id: request.id,
            network: network.location,
            account: request.account,
            role: request.role,
            name: request.name,
            url: request.url,
            status: ReporterStatus::Inactive,
            stake: 0,
            unlock_timestamp: 0,
            bump: derivation.bump,
        };
        self.store.create(derivation.location, &reporter).await?;

        self.publish(RegistryEvent::ReporterCreated {
            network: network.location,
            reporter_id: reporter.id,
            role: reporter.role,
            account: reporter.account,
        })
        .await;
        Ok(reporter)
    }

    #[instrument(skip(self, update))]
    pub(super) async fn update_reporter_internal(
        &self,
        caller: Identity,
        name: &str,
        reporter_id: Uuid,
        update: ReporterUpdate,
    ) -> RegistryResult<Reporter> {
        let network = self.load_network(name).await?.value;
        policy::authorize_admin(caller, &network)?;
        if let Some(display_name) = update.name.value() {
            encode_name(display_name)?;
        }
        if let Some(url) = update.url.value() {
            encode_url(url)?;
        }

        let location = self
            .deriver
            .reporter_location(&network.location, reporter_id)?
            .location;
        let ReporterUpdate {
            role,
            account,
            name: display_name,
            url,
        } = update;
        let reporter = self
            .store
            .update::<Reporter, _>(location, |reporter| {
                // Held stake was sized for the old role and returns to the old account.
                if reporter.status != ReporterStatus::Inactive {
                    if role.changes(&reporter.role) {
                        return Err(RegistryError::InvalidState(format!(
                            "reporter {} must be inactive to change role",
                            reporter.id
                        )));
                    }
                    if account.changes(&reporter.account) {
                        return Err(RegistryError::InvalidState(format!(
                            "reporter {} must be inactive to change account",
                            reporter.id
                        )));
                    }
                }
                role.apply(&mut reporter.role);
                account.apply(&mut reporter.account);
                display_name.apply(&mut reporter.name);
                url.apply(&mut reporter.url);
                Ok(())
            })
            .await?;

        self.publish(RegistryEvent::ReporterUpdated {
            network: network.location,
            reporter_id,
        })
        .await;
        Ok(reporter)
    }

    /// Stake moves in before the commit. A losing or failed commit is
    /// refunded out of escrow, which holds exactly the transferred amount.
    #[instrument(skip(self))]
    pub(super) async fn activate_reporter_internal(
        &self,
        caller: Identity,
        name: &str,
        reporter_id: Uuid,
    ) -> RegistryResult<Reporter> {
        let network = self.load_network(name).await?.value;
        let (location, Versioned { version, value }) =
            self.load_reporter(&network, reporter_id).await?;
        policy::authorize_self(caller, &value)?;
        let amount = ledger::begin_activation(&value, &network)?;

        self.transfer(network.stake_token, value.account, network.escrow(), amount)
            .await?;

        let mut reporter = value;
        ledger::complete_activation(&mut reporter, amount);
        let mut changeset = Changeset::new();
        changeset.replace(location, &reporter, version)?;
        if let Err(e) = self.store.commit(changeset).await {
            self.compensate(
                network.stake_token,
                network.escrow(),
                reporter.account,
                amount,
                "activate_reporter",
            )
            .await;
            return Err(e);
        }

        info!(stake = amount, "reporter activated");
        self.publish(RegistryEvent::ReporterActivated {
            network: network.location,
            reporter_id,
            stake: amount,
        })
        .await;
        Ok(reporter)
    }

    #[instrument(skip(self))]
    pub(super) async fn deactivate_reporter_internal(
        &self,
        caller: Identity,
        name: &str,
        reporter_id: Uuid,
    ) -> RegistryResult<Reporter> {
        let network = self.load_network(name).await?.value;
        let location = self
            .deriver
            .reporter_location(&network.location, reporter_id)?
            .location;
        let now = self.now();
        let reporter = self
            .store
            .update::<Reporter, _>(location, |reporter| {
                policy::authorize_self(caller, reporter)?;
                ledger::deactivate(reporter, &network, now)
            })
            .await?;

        info!(unlock_timestamp = reporter.unlock_timestamp, "reporter deactivated");
        self.publish(RegistryEvent::ReporterDeactivated {
            network: network.location,
            reporter_id,
            unlock_timestamp: reporter.unlock_timestamp,
        })
        .await;
        Ok(reporter)
    }

    #[instrument(skip(self))]
    pub(super) async fn unstake_internal(
        &self,
        caller: Identity,
        name: &str,
        reporter_id: Uuid,
    ) -> RegistryResult<Reporter> {
        let network = self.load_network(name).await?.value;
        let (location, Versioned { version, value }) =
            self.load_reporter(&network, reporter_id).await?;
        policy::authorize_self(caller, &value)?;
        let amount = ledger::begin_unstake(&value, self.now())?;

        // Claim the stake with a version-checked commit before paying it
        // out, so concurrent callers cannot both transfer.
        let mut reporter = value.clone();
        ledger::complete_unstake(&mut reporter);
        let mut changeset = Changeset::new();
        changeset.replace(location, &reporter, version)?;
        self.store.commit(changeset).await?;

        if amount > 0 {
            if let Err(e) = self
                .transfer(network.stake_token, network.escrow(), value.account, amount)
                .await
            {
                self.restore_unstaking(location, &value, version + 1).await;
                return Err(e);
            }
        }

        info!(amount, "reporter unstaked");
        self.publish(RegistryEvent::ReporterUnstaked {
            network: network.location,
            reporter_id,
            amount,
        })
        .await;
        Ok(reporter)
    }

    /// Undo a committed unstake whose payout failed.
    async fn restore_unstaking(&self, location: Location, prior: &Reporter, claimed_version: u64) {
        let mut changeset = Changeset::new();
        let result = match changeset.replace(location, prior, claimed_version) {
            Ok(()) => self.store.commit(changeset).await,
            Err(e) => Err(e),
        };
        metrics::record_compensation(result.is_ok());
        self.stats.write().compensations += 1;
        match result {
            Ok(()) => warn!(
                reporter_id = %prior.id,
                amount = prior.stake,
                "unstake reverted after failed payout"
            ),
            Err(e) => error!(
                reporter_id = %prior.id,
                amount = prior.stake,
                error = %e,
                "failed to revert unstake; manual reconciliation required"
            ),
        }
    }
}
