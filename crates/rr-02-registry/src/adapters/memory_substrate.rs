//! In-memory storage substrate.
//!
//! A single write lock serializes commits, which makes each batch atomic:
//! every expectation is checked before any write is applied.

use crate::domain::entities::EntityKind;
use crate::errors::StorageError;
use crate::ports::outbound::{ExpectedState, StorageSubstrate, StoredRecord, WriteOp};
use async_trait::async_trait;
use parking_lot::RwLock;
use rr_01_derivation::Location;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tracing::trace;

#[derive(Default)]
struct SubstrateState {
    records: HashMap<Location, StoredRecord>,
    /// Locations in first-write order.
    order: Vec<Location>,
}

/// In-memory implementation of [`StorageSubstrate`].
#[derive(Default)]
pub struct InMemorySubstrate {
    state: RwLock<SubstrateState>,
    unavailable: AtomicBool,
    latency_ms: AtomicU64,
}

impl InMemorySubstrate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Delay every call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Number of occupied locations.
    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn gate(&self) -> Result<(), StorageError> {
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("substrate offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageSubstrate for InMemorySubstrate {
    async fn read(&self, location: &Location) -> Result<Option<StoredRecord>, StorageError> {
        self.gate().await?;
        Ok(self.state.read().records.get(location).cloned())
    }

    async fn commit(&self, ops: Vec<WriteOp>) -> Result<(), StorageError> {
        self.gate().await?;
        let mut state = self.state.write();

        for op in &ops {
            let current = state.records.get(&op.location).map(|r| r.version);
            let holds = match op.expected {
                ExpectedState::Absent => current.is_none(),
                ExpectedState::Version(version) => current == Some(version),
            };
            if !holds {
                trace!(location = %op.location, ?current, expected = ?op.expected, "commit rejected");
                return Err(StorageError::Conflict {
                    location: op.location,
                });
            }
        }

        for op in ops {
            if state.records.insert(op.location, op.record).is_none() {
                state.order.push(op.location);
            }
        }
        Ok(())
    }

    async fn scan(&self, kind: EntityKind) -> Result<Vec<(Location, StoredRecord)>, StorageError> {
        self.gate().await?;
        let state = self.state.read();
        Ok(state
            .order
            .iter()
            .filter_map(|location| {
                state
                    .records
                    .get(location)
                    .filter(|record| record.kind == kind)
                    .map(|record| (*location, record.clone()))
            })
            .collect())
    }
}
