//! # Driven Ports (SPI - Outbound)
//!
//! Collaborators the registry depends on:
//! - Storage substrate (serializing, atomic per commit)
//! - Funds transfer (stake escrow and reward payouts)
//! - Clock
//! - Event sink
//!
//! Every async call made through these ports is wrapped in the configured
//! collaborator timeout by the service; expiry surfaces as `Unavailable`.

use crate::domain::entities::EntityKind;
use crate::domain::value_objects::{Identity, Timestamp, TokenId};
use crate::errors::{StorageError, TransferError};
use crate::events::RegistryEvent;
use async_trait::async_trait;
use rr_01_derivation::Location;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// =============================================================================
// STORAGE SUBSTRATE
// =============================================================================

/// Kind-tagged, versioned envelope around an encoded entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub kind: EntityKind,
    /// Starts at 1 on create, incremented on every replace.
    pub version: u64,
    /// bincode-encoded entity.
    pub payload: Vec<u8>,
}

/// Prior state a write requires at its location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpectedState {
    /// Location must be unoccupied.
    Absent,
    /// Location must hold a record at exactly this version.
    Version(u64),
}

/// A single write inside an atomic commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteOp {
    pub location: Location,
    pub record: StoredRecord,
    pub expected: ExpectedState,
}

/// Serializing key/value substrate.
///
/// `commit` applies every op or none: if any expectation fails the whole
/// batch is rejected with `StorageError::Conflict` naming the first
/// offending location.
#[async_trait]
pub trait StorageSubstrate: Send + Sync {
    /// Snapshot of the record at `location`.
    async fn read(&self, location: &Location) -> Result<Option<StoredRecord>, StorageError>;

    /// Atomically apply a batch of writes.
    async fn commit(&self, ops: Vec<WriteOp>) -> Result<(), StorageError>;

    /// All records of `kind` in insertion order.
    async fn scan(&self, kind: EntityKind) -> Result<Vec<(Location, StoredRecord)>, StorageError>;
}

// =============================================================================
// FUNDS TRANSFER
// =============================================================================

/// Moves fungible tokens between accounts.
#[async_trait]
pub trait FundsTransfer: Send + Sync {
    async fn transfer(
        &self,
        token: TokenId,
        from: Identity,
        to: Identity,
        amount: u128,
    ) -> Result<(), TransferError>;
}

// =============================================================================
// TIME SOURCE
// =============================================================================

/// Clock abstraction.
pub trait TimeSource: Send + Sync {
    /// Seconds since UNIX epoch.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Settable clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    time: Arc<AtomicU64>,
}

impl ManualTimeSource {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            time: Arc::new(AtomicU64::new(initial)),
        }
    }

    pub fn advance(&self, secs: u64) {
        self.time.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn set(&self, time: Timestamp) {
        self.time.store(time, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Timestamp {
        self.time.load(Ordering::SeqCst)
    }
}

// =============================================================================
// EVENT SINK
// =============================================================================

/// Destination for committed-mutation events.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Publish an event. Returns the number of receivers reached.
    async fn publish(&self, event: RegistryEvent) -> usize;
}
