//! # Entity Store
//!
//! Typed, keyed persistence over a [`StorageSubstrate`].
//!
//! ## Write discipline
//!
//! Every write carries the prior state it expects:
//!
//! | Operation | Expected | Substrate conflict becomes |
//! |-----------|----------|----------------------------|
//! | `create` | `Absent` | `AlreadyExists` |
//! | `update` / `replace` | `Version(n)` | `Conflict` (retryable) |
//!
//! Multi-record transitions are staged into a [`Changeset`] and committed
//! in one substrate call, so either every record changes or none does.
//!
//! Absence is not an error on read: `get` returns `None`.

use crate::domain::entities::{Entity, EntityKind};
use crate::errors::{RegistryError, RegistryResult, StorageError};
use crate::ports::outbound::{ExpectedState, StorageSubstrate, StoredRecord, WriteOp};
use rr_01_derivation::Location;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A decoded record with the version it was read at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Versioned<E> {
    pub version: u64,
    pub value: E,
}

// =============================================================================
// CHANGESET
// =============================================================================

#[derive(Clone, Debug)]
struct StagedWrite {
    kind: EntityKind,
    op: WriteOp,
}

/// Writes committed together or not at all.
#[derive(Clone, Debug, Default)]
pub struct Changeset {
    writes: Vec<StagedWrite>,
}

impl Changeset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage creation of `value` at an unoccupied `location`.
    pub fn create<E: Entity>(&mut self, location: Location, value: &E) -> RegistryResult<()> {
        let record = encode(location, value, 1)?;
        self.writes.push(StagedWrite {
            kind: E::KIND,
            op: WriteOp {
                location,
                record,
                expected: ExpectedState::Absent,
            },
        });
        Ok(())
    }

    /// Stage replacement of the record read at `prior_version`.
    pub fn replace<E: Entity>(
        &mut self,
        location: Location,
        value: &E,
        prior_version: u64,
    ) -> RegistryResult<()> {
        let record = encode(location, value, prior_version + 1)?;
        self.writes.push(StagedWrite {
            kind: E::KIND,
            op: WriteOp {
                location,
                record,
                expected: ExpectedState::Version(prior_version),
            },
        });
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Translate a substrate conflict into the caller-facing error.
    fn conflict_error(&self, location: Location) -> RegistryError {
        match self.writes.iter().find(|w| w.op.location == location) {
            Some(StagedWrite {
                kind,
                op:
                    WriteOp {
                        expected: ExpectedState::Absent,
                        ..
                    },
            }) => RegistryError::AlreadyExists {
                kind: *kind,
                location,
            },
            _ => RegistryError::Conflict { location },
        }
    }
}

// =============================================================================
// ENTITY STORE
// =============================================================================

/// Typed access to registry records.
pub struct EntityStore<S: StorageSubstrate> {
    substrate: Arc<S>,
    timeout: Duration,
}

impl<S: StorageSubstrate> EntityStore<S> {
    /// Store over `substrate`, bounding every call by `timeout`.
    pub fn new(substrate: Arc<S>, timeout: Duration) -> Self {
        Self { substrate, timeout }
    }

    /// Record at `location`, or `None` if unoccupied.
    pub async fn get<E: Entity>(&self, location: &Location) -> RegistryResult<Option<E>> {
        Ok(self
            .get_versioned::<E>(location)
            .await?
            .map(|versioned| versioned.value))
    }

    /// Record and version at `location`, or `None` if unoccupied.
    pub async fn get_versioned<E: Entity>(
        &self,
        location: &Location,
    ) -> RegistryResult<Option<Versioned<E>>> {
        let record = self.bounded(self.substrate.read(location)).await?;
        record
            .map(|record| {
                let version = record.version;
                decode::<E>(*location, record).map(|value| Versioned { version, value })
            })
            .transpose()
    }

    /// Persist a new record. Fails with `AlreadyExists` if occupied.
    pub async fn create<E: Entity>(&self, location: Location, value: &E) -> RegistryResult<()> {
        let mut changeset = Changeset::new();
        changeset.create(location, value)?;
        self.commit(changeset).await
    }

    /// Read-modify-write of an existing record.
    ///
    /// Fails with `NotFound` if absent. If `mutator` returns an error
    /// nothing is written. A concurrent writer surfaces as `Conflict`.
    pub async fn update<E, F>(&self, location: Location, mutator: F) -> RegistryResult<E>
    where
        E: Entity,
        F: FnOnce(&mut E) -> RegistryResult<()> + Send,
    {
        let Versioned { version, mut value } = self
            .get_versioned::<E>(&location)
            .await?
            .ok_or(RegistryError::NotFound {
                kind: E::KIND,
                location,
            })?;

        mutator(&mut value)?;

        let mut changeset = Changeset::new();
        changeset.replace(location, &value, version)?;
        self.commit(changeset).await?;
        Ok(value)
    }

    /// Atomically commit staged writes.
    pub async fn commit(&self, changeset: Changeset) -> RegistryResult<()> {
        if changeset.is_empty() {
            return Ok(());
        }
        let ops: Vec<WriteOp> = changeset.writes.iter().map(|w| w.op.clone()).collect();
        let count = ops.len();

        match self.bounded(self.substrate.commit(ops)).await {
            Ok(()) => {
                debug!(writes = count, "changeset committed");
                Ok(())
            }
            Err(RegistryError::Conflict { location }) => Err(changeset.conflict_error(location)),
            Err(other) => Err(other),
        }
    }

    /// Every record of type `E`, in insertion order.
    pub async fn scan<E: Entity>(&self) -> RegistryResult<Vec<(Location, E)>> {
        let records = self.bounded(self.substrate.scan(E::KIND)).await?;
        records
            .into_iter()
            .map(|(location, record)| decode::<E>(location, record).map(|value| (location, value)))
            .collect()
    }

    async fn bounded<T, Fut>(&self, call: Fut) -> RegistryResult<T>
    where
        Fut: Future<Output = Result<T, StorageError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(StorageError::Conflict { location })) => Err(RegistryError::Conflict { location }),
            Ok(Err(StorageError::Unavailable(reason))) => Err(RegistryError::Unavailable(reason)),
            Err(_) => Err(RegistryError::Unavailable(format!(
                "storage did not respond within {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}

fn encode<E: Entity>(location: Location, value: &E, version: u64) -> RegistryResult<StoredRecord> {
    let payload = bincode::serialize(value).map_err(|e| RegistryError::Corrupted {
        location,
        reason: e.to_string(),
    })?;
    Ok(StoredRecord {
        kind: E::KIND,
        version,
        payload,
    })
}

fn decode<E: Entity>(location: Location, record: StoredRecord) -> RegistryResult<E> {
    if record.kind != E::KIND {
        return Err(RegistryError::Corrupted {
            location,
            reason: format!("expected {} record, found {}", E::KIND, record.kind),
        });
    }
    bincode::deserialize(&record.payload).map_err(|e| RegistryError::Corrupted {
        location,
        reason: e.to_string(),
    })
}
