//! Read-side helpers behind `RegistryQueries`.

use super::RegistryService;
use crate::domain::entities::{Confirmation, Entity, Page};
use crate::errors::RegistryResult;
use crate::ports::outbound::{EventSink, FundsTransfer, StorageSubstrate};
use rr_01_derivation::Location;
use uuid::Uuid;

impl<S, F, E> RegistryService<S, F, E>
where
    S: StorageSubstrate,
    F: FundsTransfer,
    E: EventSink,
{
    /// Record at `location`, or its default when unoccupied.
    pub(super) async fn get_or_default<T>(&self, location: &Location) -> RegistryResult<T>
    where
        T: Entity + Default,
    {
        Ok(self.store.get::<T>(location).await?.unwrap_or_default())
    }

    pub(super) async fn is_confirmed(
        &self,
        target: &Location,
        reporter_id: Uuid,
    ) -> RegistryResult<bool> {
        let location = self
            .deriver
            .confirmation_location(target, reporter_id)?
            .location;
        Ok(self.store.get::<Confirmation>(&location).await?.is_some())
    }

    /// One page of the records of type `T` belonging to `network`.
    pub(super) async fn list_in_network<T, K>(
        &self,
        network: &str,
        limit: usize,
        offset: usize,
        network_of: K,
    ) -> RegistryResult<Page<T>>
    where
        T: Entity,
        K: Fn(&T) -> Location + Send,
    {
        let scope = self.deriver.network_location(network)?.location;
        let records: Vec<T> = self
            .store
            .scan::<T>()
            .await?
            .into_iter()
            .map(|(_, record)| record)
            .filter(|record| network_of(record) == scope)
            .collect();

        let total = records.len() as u64;
        let items = records
            .into_iter()
            .skip(offset)
            .take(self.config.page_size(limit))
            .collect();
        Ok(Page { items, total })
    }

    pub(super) async fn count_in_network<T, K>(
        &self,
        network: &str,
        network_of: K,
    ) -> RegistryResult<u64>
    where
        T: Entity,
        K: Fn(&T) -> Location + Send,
    {
        let scope = self.deriver.network_location(network)?.location;
        let count = self
            .store
            .scan::<T>()
            .await?
            .iter()
            .filter(|(_, record)| network_of(record) == scope)
            .count();
        Ok(count as u64)
    }
}
