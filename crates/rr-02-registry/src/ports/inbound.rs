//! # Driving Ports (API - Inbound)
//!
//! - [`RegistryApi`]: every mutation, each carrying the caller identity
//!   asserted by the signing layer.
//! - [`RegistryQueries`]: read-only, unauthenticated lookups. Absent
//!   records come back as their `Default` value, never as an error.
//!
//! Networks are addressed by name; everything under a network by its
//! domain id (uuid, raw address bytes, mint and asset id).

use crate::domain::entities::{
    Address, Asset, Case, Network, Page, Reporter, RewardConfiguration, StakeConfiguration,
};
use crate::domain::ledger::RewardOutcome;
use crate::domain::value_objects::{
    CaseStatus, Category, Identity, Patch, ReporterRole, TokenId,
};
use crate::errors::RegistryResult;
use async_trait::async_trait;
use uuid::Uuid;

// =============================================================================
// REQUESTS
// =============================================================================

/// Caller identity plus the reporter it acts as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReporterSigner {
    pub caller: Identity,
    pub reporter_id: Uuid,
}

impl ReporterSigner {
    pub fn new(caller: Identity, reporter_id: Uuid) -> Self {
        Self {
            caller,
            reporter_id,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateNetworkRequest {
    pub name: String,
    pub stake_token: TokenId,
    pub reward_token: TokenId,
    pub stake_configuration: StakeConfiguration,
    pub reward_configuration: RewardConfiguration,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateReporterRequest {
    pub id: Uuid,
    pub role: ReporterRole,
    pub account: Identity,
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReporterUpdate {
    pub role: Patch<ReporterRole>,
    pub account: Patch<Identity>,
    pub name: Patch<String>,
    pub url: Patch<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateCaseRequest {
    pub id: Uuid,
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaseUpdate {
    pub name: Patch<String>,
    pub url: Patch<String>,
    pub status: Patch<CaseStatus>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateAddressRequest {
    /// Raw address bytes, at most 64.
    pub address: Vec<u8>,
    pub case_id: Uuid,
    pub risk_score: u8,
    pub category: Category,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateAssetRequest {
    pub mint: Vec<u8>,
    pub asset_id: Vec<u8>,
    pub case_id: Uuid,
    pub risk_score: u8,
    pub category: Category,
}

/// Partial update of a flagged address or asset.
///
/// A `case_id` that differs from the current one is a case reassignment
/// and needs its own capability.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlagUpdate {
    pub risk_score: Patch<u8>,
    pub category: Patch<Category>,
    pub case_id: Patch<Uuid>,
}

/// A committed record plus the reward attached to the operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reported<T> {
    pub record: T,
    pub reward: RewardOutcome,
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Primary API for registry mutations.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    // --- Network administration ---

    /// One-shot creation. The caller becomes the network authority.
    async fn create_network(
        &self,
        caller: Identity,
        request: CreateNetworkRequest,
    ) -> RegistryResult<Network>;

    async fn set_authority(
        &self,
        caller: Identity,
        network: &str,
        new_authority: Identity,
    ) -> RegistryResult<Network>;

    async fn update_stake_configuration(
        &self,
        caller: Identity,
        network: &str,
        configuration: StakeConfiguration,
        stake_token: Patch<TokenId>,
    ) -> RegistryResult<Network>;

    async fn update_reward_configuration(
        &self,
        caller: Identity,
        network: &str,
        configuration: RewardConfiguration,
        reward_token: Patch<TokenId>,
    ) -> RegistryResult<Network>;

    // --- Reporters ---

    async fn create_reporter(
        &self,
        caller: Identity,
        network: &str,
        request: CreateReporterRequest,
    ) -> RegistryResult<Reporter>;

    async fn update_reporter(
        &self,
        caller: Identity,
        network: &str,
        reporter_id: Uuid,
        update: ReporterUpdate,
    ) -> RegistryResult<Reporter>;

    /// Stake the role requirement from the reporter account into escrow.
    async fn activate_reporter(
        &self,
        caller: Identity,
        network: &str,
        reporter_id: Uuid,
    ) -> RegistryResult<Reporter>;

    async fn deactivate_reporter(
        &self,
        caller: Identity,
        network: &str,
        reporter_id: Uuid,
    ) -> RegistryResult<Reporter>;

    /// Return the stake once the unlock period has passed.
    async fn unstake(
        &self,
        caller: Identity,
        network: &str,
        reporter_id: Uuid,
    ) -> RegistryResult<Reporter>;

    // --- Cases ---

    async fn create_case(
        &self,
        signer: ReporterSigner,
        network: &str,
        request: CreateCaseRequest,
    ) -> RegistryResult<Case>;

    async fn update_case(
        &self,
        signer: ReporterSigner,
        network: &str,
        case_id: Uuid,
        update: CaseUpdate,
    ) -> RegistryResult<Case>;

    // --- Addresses ---

    async fn create_address(
        &self,
        signer: ReporterSigner,
        network: &str,
        request: CreateAddressRequest,
    ) -> RegistryResult<Reported<Address>>;

    async fn update_address(
        &self,
        signer: ReporterSigner,
        network: &str,
        address: &[u8],
        update: FlagUpdate,
    ) -> RegistryResult<Address>;

    async fn confirm_address(
        &self,
        signer: ReporterSigner,
        network: &str,
        address: &[u8],
    ) -> RegistryResult<Reported<Address>>;

    // --- Assets ---

    async fn create_asset(
        &self,
        signer: ReporterSigner,
        network: &str,
        request: CreateAssetRequest,
    ) -> RegistryResult<Reported<Asset>>;

    async fn update_asset(
        &self,
        signer: ReporterSigner,
        network: &str,
        mint: &[u8],
        asset_id: &[u8],
        update: FlagUpdate,
    ) -> RegistryResult<Asset>;

    async fn confirm_asset(
        &self,
        signer: ReporterSigner,
        network: &str,
        mint: &[u8],
        asset_id: &[u8],
    ) -> RegistryResult<Reported<Asset>>;
}

// =============================================================================
// QUERIES
// =============================================================================

/// Public read surface. No authorization.
#[async_trait]
pub trait RegistryQueries: Send + Sync {
    async fn get_network(&self, network: &str) -> RegistryResult<Network>;

    async fn get_reporter(&self, network: &str, reporter_id: Uuid) -> RegistryResult<Reporter>;

    async fn get_case(&self, network: &str, case_id: Uuid) -> RegistryResult<Case>;

    async fn get_address(&self, network: &str, address: &[u8]) -> RegistryResult<Address>;

    async fn get_asset(&self, network: &str, mint: &[u8], asset_id: &[u8])
        -> RegistryResult<Asset>;

    /// True if `reporter_id` has confirmed the address.
    async fn has_confirmed_address(
        &self,
        network: &str,
        address: &[u8],
        reporter_id: Uuid,
    ) -> RegistryResult<bool>;

    /// True if `reporter_id` has confirmed the asset.
    async fn has_confirmed_asset(
        &self,
        network: &str,
        mint: &[u8],
        asset_id: &[u8],
        reporter_id: Uuid,
    ) -> RegistryResult<bool>;

    async fn list_reporters(
        &self,
        network: &str,
        limit: usize,
        offset: usize,
    ) -> RegistryResult<Page<Reporter>>;

    async fn list_cases(&self, network: &str, limit: usize, offset: usize)
        -> RegistryResult<Page<Case>>;

    async fn list_addresses(
        &self,
        network: &str,
        limit: usize,
        offset: usize,
    ) -> RegistryResult<Page<Address>>;

    async fn list_assets(
        &self,
        network: &str,
        limit: usize,
        offset: usize,
    ) -> RegistryResult<Page<Asset>>;

    async fn count_reporters(&self, network: &str) -> RegistryResult<u64>;

    async fn count_cases(&self, network: &str) -> RegistryResult<u64>;

    async fn count_addresses(&self, network: &str) -> RegistryResult<u64>;

    async fn count_assets(&self, network: &str) -> RegistryResult<u64>;
}
