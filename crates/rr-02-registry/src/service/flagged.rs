//! Address and asset lifecycle.
//!
//! Both are the same machine over a [`RiskFlag`]: create into an open
//! case, update risk/category (and possibly the case), confirm once per
//! second reporter. [`Flagged`] captures the per-type differences.

use super::RegistryService;
use crate::domain::entities::{
    Address, Asset, Confirmation, Entity, Network, Reporter, RiskFlag,
};
use crate::domain::ledger::RewardKind;
use crate::domain::policy::{self, Action, Actor};
use crate::domain::value_objects::MAX_RISK_SCORE;
use crate::errors::{RegistryError, RegistryResult};
use crate::events::RegistryEvent;
use crate::ports::inbound::{
    CreateAddressRequest, CreateAssetRequest, FlagUpdate, Reported, ReporterSigner,
};
use crate::ports::outbound::{EventSink, FundsTransfer, StorageSubstrate};
use crate::store::{Changeset, Versioned};
use rr_01_derivation::Location;
use tracing::{debug, instrument};
use uuid::Uuid;

/// A record carrying a risk flag.
pub(super) trait Flagged: Entity {
    const CREATE: Action;
    const UPDATE: Action;
    const CONFIRM: Action;
    const TRACER_REWARD: RewardKind;
    const CONFIRMATION_REWARD: RewardKind;

    fn flag(&self) -> &RiskFlag;
    fn flag_mut(&mut self) -> &mut RiskFlag;
    fn created_event(&self) -> RegistryEvent;
    fn updated_event(&self) -> RegistryEvent;
    fn confirmed_event(&self, confirmer: Uuid) -> RegistryEvent;
}

impl Flagged for Address {
    const CREATE: Action = Action::CreateAddress;
    const UPDATE: Action = Action::UpdateAddress;
    const CONFIRM: Action = Action::ConfirmAddress;
    const TRACER_REWARD: RewardKind = RewardKind::AddressTracer;
    const CONFIRMATION_REWARD: RewardKind = RewardKind::AddressConfirmation;

    fn flag(&self) -> &RiskFlag {
        &self.flag
    }

    fn flag_mut(&mut self) -> &mut RiskFlag {
        &mut self.flag
    }

    fn created_event(&self) -> RegistryEvent {
        RegistryEvent::AddressCreated {
            network: self.network,
            address: self.address.clone(),
            case_id: self.flag.case_id,
            reporter_id: self.flag.reporter_id,
            risk_score: self.flag.risk_score,
            category: self.flag.category,
        }
    }

    fn updated_event(&self) -> RegistryEvent {
        RegistryEvent::AddressUpdated {
            network: self.network,
            address: self.address.clone(),
            case_id: self.flag.case_id,
            risk_score: self.flag.risk_score,
            category: self.flag.category,
        }
    }

    fn confirmed_event(&self, confirmer: Uuid) -> RegistryEvent {
        RegistryEvent::AddressConfirmed {
            network: self.network,
            address: self.address.clone(),
            reporter_id: confirmer,
            confirmations: self.flag.confirmations,
        }
    }
}

impl Flagged for Asset {
    const CREATE: Action = Action::CreateAsset;
    const UPDATE: Action = Action::UpdateAsset;
    const CONFIRM: Action = Action::ConfirmAsset;
    const TRACER_REWARD: RewardKind = RewardKind::AssetTracer;
    const CONFIRMATION_REWARD: RewardKind = RewardKind::AssetConfirmation;

    fn flag(&self) -> &RiskFlag {
        &self.flag
    }

    fn flag_mut(&mut self) -> &mut RiskFlag {
        &mut self.flag
    }

    fn created_event(&self) -> RegistryEvent {
        RegistryEvent::AssetCreated {
            network: self.network,
            mint: self.mint.clone(),
            asset_id: self.asset_id.clone(),
            case_id: self.flag.case_id,
            reporter_id: self.flag.reporter_id,
            risk_score: self.flag.risk_score,
            category: self.flag.category,
        }
    }

    fn updated_event(&self) -> RegistryEvent {
        RegistryEvent::AssetUpdated {
            network: self.network,
            mint: self.mint.clone(),
            asset_id: self.asset_id.clone(),
            case_id: self.flag.case_id,
            risk_score: self.flag.risk_score,
            category: self.flag.category,
        }
    }

    fn confirmed_event(&self, confirmer: Uuid) -> RegistryEvent {
        RegistryEvent::AssetConfirmed {
            network: self.network,
            mint: self.mint.clone(),
            asset_id: self.asset_id.clone(),
            reporter_id: confirmer,
            confirmations: self.flag.confirmations,
        }
    }
}

fn check_risk(score: u8) -> RegistryResult<()> {
    if score > MAX_RISK_SCORE {
        return Err(RegistryError::RiskOutOfRange(score));
    }
    Ok(())
}

impl<S, F, E> RegistryService<S, F, E>
where
    S: StorageSubstrate,
    F: FundsTransfer,
    E: EventSink,
{
    // === ADDRESSES ===

    #[instrument(skip(self, signer, request), fields(reporter_id = %signer.reporter_id, case_id = %request.case_id))]
    pub(super) async fn create_address_internal(
        &self,
        signer: ReporterSigner,
        name: &str,
        request: CreateAddressRequest,
    ) -> RegistryResult<Reported<Address>> {
        let network = self.load_network(name).await?.value;
        let derivation = self
            .deriver
            .address_location(&network.location, &request.address)?;
        let address = Address {
            network: network.location,
            address: request.address,
            flag: RiskFlag {
                case_id: request.case_id,
                reporter_id: signer.reporter_id,
                confirmations: 0,
                risk_score: request.risk_score,
                category: request.category,
            },
            bump: derivation.bump,
        };
        self.create_flagged(signer, &network, derivation.location, address)
            .await
    }

    #[instrument(skip(self, signer, address, update), fields(reporter_id = %signer.reporter_id))]
    pub(super) async fn update_address_internal(
        &self,
        signer: ReporterSigner,
        name: &str,
        address: &[u8],
        update: FlagUpdate,
    ) -> RegistryResult<Address> {
        let network = self.load_network(name).await?.value;
        let location = self
            .deriver
            .address_location(&network.location, address)?
            .location;
        self.update_flagged::<Address>(signer, &network, location, update)
            .await
    }

    #[instrument(skip(self, signer, address), fields(reporter_id = %signer.reporter_id))]
    pub(super) async fn confirm_address_internal(
        &self,
        signer: ReporterSigner,
        name: &str,
        address: &[u8],
    ) -> RegistryResult<Reported<Address>> {
        let network = self.load_network(name).await?.value;
        let location = self
            .deriver
            .address_location(&network.location, address)?
            .location;
        self.confirm_flagged::<Address>(signer, &network, location)
            .await
    }

    // === ASSETS ===

    #[instrument(skip(self, signer, request), fields(reporter_id = %signer.reporter_id, case_id = %request.case_id))]
    pub(super) async fn create_asset_internal(
        &self,
        signer: ReporterSigner,
        name: &str,
        request: CreateAssetRequest,
    ) -> RegistryResult<Reported<Asset>> {
        let network = self.load_network(name).await?.value;
        let derivation =
            self.deriver
                .asset_location(&network.location, &request.mint, &request.asset_id)?;
        let asset = Asset {
            network: network.location,
            mint: request.mint,
            asset_id: request.asset_id,
            flag: RiskFlag {
                case_id: request.case_id,
                reporter_id: signer.reporter_id,
                confirmations: 0,
                risk_score: request.risk_score,
                category: request.category,
            },
            bump: derivation.bump,
        };
        self.create_flagged(signer, &network, derivation.location, asset)
            .await
    }

    #[instrument(skip(self, signer, mint, asset_id, update), fields(reporter_id = %signer.reporter_id))]
    pub(super) async fn update_asset_internal(
        &self,
        signer: ReporterSigner,
        name: &str,
        mint: &[u8],
        asset_id: &[u8],
        update: FlagUpdate,
    ) -> RegistryResult<Asset> {
        let network = self.load_network(name).await?.value;
        let location = self
            .deriver
            .asset_location(&network.location, mint, asset_id)?
            .location;
        self.update_flagged::<Asset>(signer, &network, location, update)
            .await
    }

    #[instrument(skip(self, signer, mint, asset_id), fields(reporter_id = %signer.reporter_id))]
    pub(super) async fn confirm_asset_internal(
        &self,
        signer: ReporterSigner,
        name: &str,
        mint: &[u8],
        asset_id: &[u8],
    ) -> RegistryResult<Reported<Asset>> {
        let network = self.load_network(name).await?.value;
        let location = self
            .deriver
            .asset_location(&network.location, mint, asset_id)?
            .location;
        self.confirm_flagged::<Asset>(signer, &network, location)
            .await
    }

    // === SHARED MACHINE ===

    fn actor<'a>(
        &self,
        signer: ReporterSigner,
        reporter: &'a Reporter,
        network: &'a Network,
    ) -> Actor<'a> {
        Actor {
            caller: signer.caller,
            reporter,
            network,
        }
    }

    async fn create_flagged<T: Flagged>(
        &self,
        signer: ReporterSigner,
        network: &Network,
        location: Location,
        record: T,
    ) -> RegistryResult<Reported<T>> {
        let reporter = self.acting_reporter(network, signer).await?;
        policy::authorize(
            &self.actor(signer, &reporter, network),
            T::CREATE,
            None,
            self.config.require_active_reporter,
        )?;
        check_risk(record.flag().risk_score)?;
        self.require_open_case(network, record.flag().case_id).await?;

        self.store.create(location, &record).await?;
        debug!(kind = %T::KIND, %location, "flagged record created");

        self.publish(record.created_event()).await;
        let reward = self.pay_reward(network, &reporter, T::TRACER_REWARD).await;
        Ok(Reported { record, reward })
    }

    async fn update_flagged<T: Flagged>(
        &self,
        signer: ReporterSigner,
        network: &Network,
        location: Location,
        update: FlagUpdate,
    ) -> RegistryResult<T> {
        let reporter = self.acting_reporter(network, signer).await?;
        let Versioned { version, value } = self
            .store
            .get_versioned::<T>(&location)
            .await?
            .ok_or(RegistryError::NotFound {
                kind: T::KIND,
                location,
            })?;

        policy::authorize(
            &self.actor(signer, &reporter, network),
            T::UPDATE,
            Some(value.flag().reporter_id),
            self.config.require_active_reporter,
        )?;
        if let Some(score) = update.risk_score.value() {
            check_risk(*score)?;
        }
        if update.case_id.changes(&value.flag().case_id) {
            policy::check_role(reporter.role, Action::ReassignCase)?;
            if let Some(case_id) = update.case_id.value() {
                self.require_open_case(network, *case_id).await?;
            }
        }

        let mut record = value;
        let flag = record.flag_mut();
        update.risk_score.apply(&mut flag.risk_score);
        update.category.apply(&mut flag.category);
        update.case_id.apply(&mut flag.case_id);

        let mut changeset = Changeset::new();
        changeset.replace(location, &record, version)?;
        self.store.commit(changeset).await?;

        self.publish(record.updated_event()).await;
        Ok(record)
    }

    async fn confirm_flagged<T: Flagged>(
        &self,
        signer: ReporterSigner,
        network: &Network,
        location: Location,
    ) -> RegistryResult<Reported<T>> {
        let reporter = self.acting_reporter(network, signer).await?;
        let Versioned { version, value } = self
            .store
            .get_versioned::<T>(&location)
            .await?
            .ok_or(RegistryError::NotFound {
                kind: T::KIND,
                location,
            })?;

        policy::authorize(
            &self.actor(signer, &reporter, network),
            T::CONFIRM,
            None,
            self.config.require_active_reporter,
        )?;
        policy::check_not_self_confirmation(&reporter, value.flag().reporter_id)?;
        self.require_open_case(network, value.flag().case_id).await?;

        let derivation = self.deriver.confirmation_location(&location, reporter.id)?;
        let confirmation = Confirmation {
            network: network.location,
            account: location,
            reporter_id: reporter.id,
            bump: derivation.bump,
        };
        let mut record = value;
        let flag = record.flag_mut();
        flag.confirmations = flag.confirmations.saturating_add(1);

        // Confirmation first: a repeat confirmation reports AlreadyExists.
        let mut changeset = Changeset::new();
        changeset.create(derivation.location, &confirmation)?;
        changeset.replace(location, &record, version)?;
        self.store.commit(changeset).await?;
        debug!(kind = %T::KIND, %location, confirmations = record.flag().confirmations, "confirmed");

        self.publish(record.confirmed_event(reporter.id)).await;
        let reward = self
            .pay_reward(network, &reporter, T::CONFIRMATION_REWARD)
            .await;
        Ok(Reported { record, reward })
    }
}
