//! # Registry Service
//!
//! The lifecycle engine. Composes the deriver, entity store, authorization
//! policy and stake/reward ledger behind [`RegistryApi`] and
//! [`RegistryQueries`].
//!
//! ## Operation shape
//!
//! ```text
//! (network name, domain id)
//!     → Deriver          location
//!     → EntityStore      versioned snapshot
//!     → policy           role + identity + ownership
//!     → transition       pure mutation of the snapshot
//!     → EntityStore      atomic commit (expected prior state)
//!     → EventSink        event for the committed change
//!     → FundsTransfer    reward payout, best effort
//! ```
//!
//! Activation moves stake into escrow before its commit. If that commit
//! fails the amount is refunded out of escrow and the refund logged.
//! Unstake commits the claim first and pays out after; a failed payout
//! restores the `Unstaking` record.

mod case;
mod flagged;
mod network;
mod queries;
mod reporter;


use crate::config::RegistryConfig;
use crate::domain::entities::{
    Address, Asset, Case, EntityKind, Network, Page, Reporter, RewardConfiguration,
    StakeConfiguration,
};
use crate::domain::ledger::{RewardKind, RewardOutcome};
use crate::domain::value_objects::{CaseStatus, Identity, Patch, TokenId};
use crate::errors::{RegistryError, RegistryResult, TransferError};
use crate::events::RegistryEvent;
use crate::metrics;
use crate::ports::inbound::{
    CaseUpdate, CreateAddressRequest, CreateAssetRequest, CreateCaseRequest,
    CreateNetworkRequest, CreateReporterRequest, FlagUpdate, RegistryApi, RegistryQueries,
    Reported, ReporterSigner, ReporterUpdate,
};
use crate::ports::outbound::{
    EventSink, FundsTransfer, StorageSubstrate, SystemTimeSource, TimeSource,
};
use crate::store::{EntityStore, Versioned};
use async_trait::async_trait;
use parking_lot::RwLock;
use rr_01_derivation::{Deriver, Location};
use std::sync::Arc;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Operation counters, always available regardless of the `metrics` feature.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceStats {
    /// Committed mutations.
    pub mutations: u64,
    /// Mutations rejected for any reason other than a lost create race.
    pub rejections: u64,
    /// Creates that lost a race to an identical create.
    pub expected_races: u64,
    /// Rewards that could not be paid.
    pub reward_failures: u64,
    /// Stake movements reversed after a failed commit or payout.
    pub compensations: u64,
}

/// Dependencies for RegistryService
pub struct RegistryDependencies<S, F, E> {
    pub substrate: Arc<S>,
    pub funds: Arc<F>,
    pub events: Arc<E>,
    pub config: RegistryConfig,
}

/// Registry Service
pub struct RegistryService<S, F, E>
where
    S: StorageSubstrate,
    F: FundsTransfer,
    E: EventSink,
{
    store: EntityStore<S>,
    funds: Arc<F>,
    events: Arc<E>,
    deriver: Deriver,
    config: RegistryConfig,
    time_source: Box<dyn TimeSource>,
    stats: RwLock<ServiceStats>,
}

impl<S, F, E> RegistryService<S, F, E>
where
    S: StorageSubstrate,
    F: FundsTransfer,
    E: EventSink,
{
    /// Create a new RegistryService
    pub fn new(deps: RegistryDependencies<S, F, E>) -> Self {
        Self {
            store: EntityStore::new(deps.substrate, deps.config.collaborator_timeout()),
            funds: deps.funds,
            events: deps.events,
            deriver: Deriver::new(),
            config: deps.config,
            time_source: Box::new(SystemTimeSource),
            stats: RwLock::new(ServiceStats::default()),
        }
    }

    /// Set custom time source (for testing)
    pub fn with_time_source(mut self, time_source: Box<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    /// Current service statistics.
    pub fn stats(&self) -> ServiceStats {
        self.stats.read().clone()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // === LOADING ===

    async fn load_network(&self, name: &str) -> RegistryResult<Versioned<Network>> {
        let location = self.deriver.network_location(name)?.location;
        self.store
            .get_versioned::<Network>(&location)
            .await?
            .ok_or(RegistryError::NotFound {
                kind: EntityKind::Network,
                location,
            })
    }

    async fn load_reporter(
        &self,
        network: &Network,
        reporter_id: Uuid,
    ) -> RegistryResult<(Location, Versioned<Reporter>)> {
        let location = self
            .deriver
            .reporter_location(&network.location, reporter_id)?
            .location;
        let reporter = self
            .store
            .get_versioned::<Reporter>(&location)
            .await?
            .ok_or(RegistryError::NotFound {
                kind: EntityKind::Reporter,
                location,
            })?;
        Ok((location, reporter))
    }

    /// The reporter a signer acts as.
    async fn acting_reporter(
        &self,
        network: &Network,
        signer: ReporterSigner,
    ) -> RegistryResult<Reporter> {
        let (_, reporter) = self.load_reporter(network, signer.reporter_id).await?;
        Ok(reporter.value)
    }

    async fn load_case(
        &self,
        network: &Network,
        case_id: Uuid,
    ) -> RegistryResult<(Location, Option<Versioned<Case>>)> {
        let location = self.deriver.case_location(&network.location, case_id)?.location;
        let case = self.store.get_versioned::<Case>(&location).await?;
        Ok((location, case))
    }

    /// A case that flagged records may be attached to or confirmed under.
    async fn require_open_case(&self, network: &Network, case_id: Uuid) -> RegistryResult<Case> {
        match self.load_case(network, case_id).await? {
            (_, Some(case)) if case.value.status == CaseStatus::Open => Ok(case.value),
            (_, Some(_)) => Err(RegistryError::InvalidState(format!(
                "case {case_id} is closed"
            ))),
            (_, None) => Err(RegistryError::InvalidState(format!(
                "case {case_id} does not exist"
            ))),
        }
    }

    // === FUNDS ===

    async fn transfer(
        &self,
        token: TokenId,
        from: Identity,
        to: Identity,
        amount: u128,
    ) -> RegistryResult<()> {
        let timeout = self.config.collaborator_timeout();
        match tokio::time::timeout(timeout, self.funds.transfer(token, from, to, amount)).await {
            Ok(result) => result.map_err(RegistryError::from),
            Err(_) => Err(TransferError::Unavailable(format!(
                "transfer did not complete within {}ms",
                timeout.as_millis()
            ))
            .into()),
        }
    }

    /// Reverse a stake transfer whose commit failed.
    async fn compensate(
        &self,
        token: TokenId,
        from: Identity,
        to: Identity,
        amount: u128,
        operation: &'static str,
    ) {
        let result = self.transfer(token, from, to, amount).await;
        metrics::record_compensation(result.is_ok());
        self.stats.write().compensations += 1;
        match result {
            Ok(()) => warn!(operation, amount, %to, "stake transfer reversed after failed commit"),
            Err(e) => error!(
                operation,
                amount,
                %from,
                %to,
                error = %e,
                "failed to reverse stake transfer; manual reconciliation required"
            ),
        }
    }

    /// Pay a fixed reward from the network pool. Never fails the caller.
    async fn pay_reward(
        &self,
        network: &Network,
        reporter: &Reporter,
        kind: RewardKind,
    ) -> RewardOutcome {
        let amount = kind.amount(&network.reward_configuration);
        if amount == 0 {
            return RewardOutcome::Skipped;
        }
        match self
            .transfer(network.reward_token, network.escrow(), reporter.account, amount)
            .await
        {
            Ok(()) => {
                debug!(reward = %kind, amount, reporter_id = %reporter.id, "reward paid");
                RewardOutcome::Paid { amount }
            }
            Err(e) => {
                error!(
                    reward = %kind,
                    amount,
                    reporter_id = %reporter.id,
                    network = %network.name,
                    error = %e,
                    "reward payout failed"
                );
                metrics::record_reward_failure(kind.label());
                self.stats.write().reward_failures += 1;
                RewardOutcome::Failed {
                    amount,
                    reason: e.to_string(),
                }
            }
        }
    }

    // === BOOKKEEPING ===

    async fn publish(&self, event: RegistryEvent) {
        self.events.publish(event).await;
    }

    fn now(&self) -> u64 {
        self.time_source.now()
    }

    /// Record the outcome of a mutation in stats, metrics and logs.
    fn finish<T>(&self, operation: &'static str, result: RegistryResult<T>) -> RegistryResult<T> {
        match &result {
            Ok(_) => {
                metrics::record_mutation(operation);
                self.stats.write().mutations += 1;
            }
            Err(e) if e.is_expected_race() => {
                debug!(operation, error = %e, "create lost to a concurrent create");
                self.stats.write().expected_races += 1;
            }
            Err(e) => {
                warn!(operation, reason = e.label(), error = %e, "mutation rejected");
                metrics::record_rejection(e.label());
                self.stats.write().rejections += 1;
            }
        }
        result
    }
}

// =============================================================================
// API IMPLEMENTATION
// =============================================================================

#[async_trait]
impl<S, F, E> RegistryApi for RegistryService<S, F, E>
where
    S: StorageSubstrate,
    F: FundsTransfer,
    E: EventSink,
{
    async fn create_network(
        &self,
        caller: Identity,
        request: CreateNetworkRequest,
    ) -> RegistryResult<Network> {
        let result = self.create_network_internal(caller, request).await;
        self.finish("create_network", result)
    }

    async fn set_authority(
        &self,
        caller: Identity,
        network: &str,
        new_authority: Identity,
    ) -> RegistryResult<Network> {
        let result = self
            .set_authority_internal(caller, network, new_authority)
            .await;
        self.finish("set_authority", result)
    }

    async fn update_stake_configuration(
        &self,
        caller: Identity,
        network: &str,
        configuration: StakeConfiguration,
        stake_token: Patch<TokenId>,
    ) -> RegistryResult<Network> {
        let result = self
            .update_stake_configuration_internal(caller, network, configuration, stake_token)
            .await;
        self.finish("update_stake_configuration", result)
    }

    async fn update_reward_configuration(
        &self,
        caller: Identity,
        network: &str,
        configuration: RewardConfiguration,
        reward_token: Patch<TokenId>,
    ) -> RegistryResult<Network> {
        let result = self
            .update_reward_configuration_internal(caller, network, configuration, reward_token)
            .await;
        self.finish("update_reward_configuration", result)
    }

    async fn create_reporter(
        &self,
        caller: Identity,
        network: &str,
        request: CreateReporterRequest,
    ) -> RegistryResult<Reporter> {
        let result = self.create_reporter_internal(caller, network, request).await;
        self.finish("create_reporter", result)
    }

    async fn update_reporter(
        &self,
        caller: Identity,
        network: &str,
        reporter_id: Uuid,
        update: ReporterUpdate,
    ) -> RegistryResult<Reporter> {
        let result = self
            .update_reporter_internal(caller, network, reporter_id, update)
            .await;
        self.finish("update_reporter", result)
    }

    async fn activate_reporter(
        &self,
        caller: Identity,
        network: &str,
        reporter_id: Uuid,
    ) -> RegistryResult<Reporter> {
        let result = self
            .activate_reporter_internal(caller, network, reporter_id)
            .await;
        self.finish("activate_reporter", result)
    }

    async fn deactivate_reporter(
        &self,
        caller: Identity,
        network: &str,
        reporter_id: Uuid,
    ) -> RegistryResult<Reporter> {
        let result = self
            .deactivate_reporter_internal(caller, network, reporter_id)
            .await;
        self.finish("deactivate_reporter", result)
    }

    async fn unstake(
        &self,
        caller: Identity,
        network: &str,
        reporter_id: Uuid,
    ) -> RegistryResult<Reporter> {
        let result = self.unstake_internal(caller, network, reporter_id).await;
        self.finish("unstake", result)
    }

    async fn create_case(
        &self,
        signer: ReporterSigner,
        network: &str,
        request: CreateCaseRequest,
    ) -> RegistryResult<Case> {
        let result = self.create_case_internal(signer, network, request).await;
        self.finish("create_case", result)
    }

    async fn update_case(
        &self,
        signer: ReporterSigner,
        network: &str,
        case_id: Uuid,
        update: CaseUpdate,
    ) -> RegistryResult<Case> {
        let result = self
            .update_case_internal(signer, network, case_id, update)
            .await;
        self.finish("update_case", result)
    }

    async fn create_address(
        &self,
        signer: ReporterSigner,
        network: &str,
        request: CreateAddressRequest,
    ) -> RegistryResult<Reported<Address>> {
        let result = self.create_address_internal(signer, network, request).await;
        self.finish("create_address", result)
    }

    async fn update_address(
        &self,
        signer: ReporterSigner,
        network: &str,
        address: &[u8],
        update: FlagUpdate,
    ) -> RegistryResult<Address> {
        let result = self
            .update_address_internal(signer, network, address, update)
            .await;
        self.finish("update_address", result)
    }

    async fn confirm_address(
        &self,
        signer: ReporterSigner,
        network: &str,
        address: &[u8],
    ) -> RegistryResult<Reported<Address>> {
        let result = self.confirm_address_internal(signer, network, address).await;
        self.finish("confirm_address", result)
    }

    async fn create_asset(
        &self,
        signer: ReporterSigner,
        network: &str,
        request: CreateAssetRequest,
    ) -> RegistryResult<Reported<Asset>> {
        let result = self.create_asset_internal(signer, network, request).await;
        self.finish("create_asset", result)
    }

    async fn update_asset(
        &self,
        signer: ReporterSigner,
        network: &str,
        mint: &[u8],
        asset_id: &[u8],
        update: FlagUpdate,
    ) -> RegistryResult<Asset> {
        let result = self
            .update_asset_internal(signer, network, mint, asset_id, update)
            .await;
        self.finish("update_asset", result)
    }

    async fn confirm_asset(
        &self,
        signer: ReporterSigner,
        network: &str,
        mint: &[u8],
        asset_id: &[u8],
    ) -> RegistryResult<Reported<Asset>> {
        let result = self
            .confirm_asset_internal(signer, network, mint, asset_id)
            .await;
        self.finish("confirm_asset", result)
    }
}

// =============================================================================
// QUERY IMPLEMENTATION
// =============================================================================

#[async_trait]
impl<S, F, E> RegistryQueries for RegistryService<S, F, E>
where
    S: StorageSubstrate,
    F: FundsTransfer,
    E: EventSink,
{
    async fn get_network(&self, network: &str) -> RegistryResult<Network> {
        let location = self.deriver.network_location(network)?.location;
        self.get_or_default(&location).await
    }

    async fn get_reporter(&self, network: &str, reporter_id: Uuid) -> RegistryResult<Reporter> {
        let scope = self.deriver.network_location(network)?.location;
        let location = self.deriver.reporter_location(&scope, reporter_id)?.location;
        self.get_or_default(&location).await
    }

    async fn get_case(&self, network: &str, case_id: Uuid) -> RegistryResult<Case> {
        let scope = self.deriver.network_location(network)?.location;
        let location = self.deriver.case_location(&scope, case_id)?.location;
        self.get_or_default(&location).await
    }

    async fn get_address(&self, network: &str, address: &[u8]) -> RegistryResult<Address> {
        let scope = self.deriver.network_location(network)?.location;
        let location = self.deriver.address_location(&scope, address)?.location;
        self.get_or_default(&location).await
    }

    async fn get_asset(
        &self,
        network: &str,
        mint: &[u8],
        asset_id: &[u8],
    ) -> RegistryResult<Asset> {
        let scope = self.deriver.network_location(network)?.location;
        let location = self.deriver.asset_location(&scope, mint, asset_id)?.location;
        self.get_or_default(&location).await
    }

    async fn has_confirmed_address(
        &self,
        network: &str,
        address: &[u8],
        reporter_id: Uuid,
    ) -> RegistryResult<bool> {
        let scope = self.deriver.network_location(network)?.location;
        let target = self.deriver.address_location(&scope, address)?.location;
        self.is_confirmed(&target, reporter_id).await
    }

    async fn has_confirmed_asset(
        &self,
        network: &str,
        mint: &[u8],
        asset_id: &[u8],
        reporter_id: Uuid,
    ) -> RegistryResult<bool> {
        let scope = self.deriver.network_location(network)?.location;
        let target = self.deriver.asset_location(&scope, mint, asset_id)?.location;
        self.is_confirmed(&target, reporter_id).await
    }

    async fn list_reporters(
        &self,
        network: &str,
        limit: usize,
        offset: usize,
    ) -> RegistryResult<Page<Reporter>> {
        self.list_in_network(network, limit, offset, |r: &Reporter| r.network)
            .await
    }

    async fn list_cases(
        &self,
        network: &str,
        limit: usize,
        offset: usize,
    ) -> RegistryResult<Page<Case>> {
        self.list_in_network(network, limit, offset, |c: &Case| c.network)
            .await
    }

    async fn list_addresses(
        &self,
        network: &str,
        limit: usize,
        offset: usize,
    ) -> RegistryResult<Page<Address>> {
        self.list_in_network(network, limit, offset, |a: &Address| a.network)
            .await
    }

    async fn list_assets(
        &self,
        network: &str,
        limit: usize,
        offset: usize,
    ) -> RegistryResult<Page<Asset>> {
        self.list_in_network(network, limit, offset, |a: &Asset| a.network)
            .await
    }

    async fn count_reporters(&self, network: &str) -> RegistryResult<u64> {
        self.count_in_network(network, |r: &Reporter| r.network).await
    }

    async fn count_cases(&self, network: &str) -> RegistryResult<u64> {
        self.count_in_network(network, |c: &Case| c.network).await
    }

    async fn count_addresses(&self, network: &str) -> RegistryResult<u64> {
        self.count_in_network(network, |a: &Address| a.network)
            .await
    }

    async fn count_assets(&self, network: &str) -> RegistryResult<u64> {
        self.count_in_network(network, |a: &Asset| a.network).await
    }
}
