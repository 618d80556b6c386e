//! # rr-02-registry - Risk Intelligence Registry
//!
//! A multi-tenant registry of flagged addresses and assets. Staked
//! reporters open cases, flag addresses and assets with a risk score and
//! category, and corroborate each other's reports through confirmations.
//!
//! ## Entity Hierarchy
//!
//! ```text
//! Network ──┬── Reporter   (role, stake, status)
//!           ├── Case       (Open ⇄ Closed)
//!           ├── Address ──── Confirmation (one per confirming reporter)
//!           └── Asset   ──── Confirmation
//! ```
//!
//! Every record lives at a location derived by `rr-01-derivation` from its
//! tag, its network and its domain id.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | At most one record per derived location | `store.rs` - `Changeset::create` expects `Absent` |
//! | Multi-record transitions are atomic | `store.rs` - `EntityStore::commit` |
//! | Risk score ≤ 10 | `service/flagged.rs` - `check_risk()` |
//! | One confirmation per (target, reporter) | `service/flagged.rs` - `confirm_flagged()` |
//! | Role × action capability table | `domain/policy.rs` - `role_allows()` |
//! | Stake held while Active or Unstaking | `domain/ledger.rs` |
//!
//! ## Outbound Dependencies
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `StorageSubstrate` | Serializing key/value storage, atomic per commit |
//! | `FundsTransfer` | Stake escrow and reward payouts |
//! | `TimeSource` | Unlock timing |
//! | `EventSink` | Committed-mutation events |
//!
//! ## Usage Example
//!
//! ```ignore
//! use rr_02_registry::prelude::*;
//!
//! let service = RegistryService::new(RegistryDependencies {
//!     substrate: Arc::new(InMemorySubstrate::new()),
//!     funds: Arc::new(InMemoryLedger::new()),
//!     events: Arc::new(InMemoryEventBus::new()),
//!     config: RegistryConfig::default(),
//! });
//!
//! let network = service.create_network(authority, request).await?;
//! let address = service.get_address("N", &bytes).await?;
//! ```

// Crate-level lints
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod store;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::entities::{
        Address, Asset, Case, Confirmation, EntityKind, Network, Page, Reporter,
        RewardConfiguration, RiskFlag, StakeConfiguration,
    };
    pub use crate::domain::ledger::{RewardKind, RewardOutcome};
    pub use crate::domain::policy::Action;
    pub use crate::domain::value_objects::{
        CaseStatus, Category, Identity, Patch, ReporterRole, ReporterStatus, Timestamp, TokenId,
        MAX_RISK_SCORE,
    };

    // Ports
    pub use crate::ports::inbound::{
        CaseUpdate, CreateAddressRequest, CreateAssetRequest, CreateCaseRequest,
        CreateNetworkRequest, CreateReporterRequest, FlagUpdate, RegistryApi, RegistryQueries,
        Reported, ReporterSigner, ReporterUpdate,
    };
    pub use crate::ports::outbound::{
        EventSink, FundsTransfer, ManualTimeSource, StorageSubstrate, SystemTimeSource,
        TimeSource,
    };

    // Adapters
    pub use crate::adapters::{InMemoryEventBus, InMemoryLedger, InMemorySubstrate};

    // Service
    pub use crate::config::RegistryConfig;
    pub use crate::service::{RegistryDependencies, RegistryService, ServiceStats};

    // Events and errors
    pub use crate::errors::{RegistryError, RegistryResult};
    pub use crate::events::RegistryEvent;

    // Derivation
    pub use rr_01_derivation::{Deriver, Location};
}
