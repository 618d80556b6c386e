//! Case lifecycle: `Open ⇄ Closed`.

use super::RegistryService;
use crate::domain::entities::{Case, EntityKind};
use crate::domain::policy::{self, Action, Actor};
use crate::domain::value_objects::CaseStatus;
use crate::errors::{RegistryError, RegistryResult};
use crate::events::RegistryEvent;
use crate::ports::inbound::{CaseUpdate, CreateCaseRequest, ReporterSigner};
use crate::ports::outbound::{EventSink, FundsTransfer, StorageSubstrate};
use crate::store::{Changeset, Versioned};
use rr_01_derivation::{encode_name, encode_url};
use tracing::instrument;
use uuid::Uuid;

impl<S, F, E> RegistryService<S, F, E>
where
    S: StorageSubstrate,
    F: FundsTransfer,
    E: EventSink,
{
    #[instrument(skip(self, signer, request), fields(reporter_id = %signer.reporter_id, case_id = %request.id))]
    pub(super) async fn create_case_internal(
        &self,
        signer: ReporterSigner,
        name: &str,
        request: CreateCaseRequest,
    ) -> RegistryResult<Case> {
        let network = self.load_network(name).await?.value;
        let reporter = self.acting_reporter(&network, signer).await?;
        let actor = Actor {
            caller: signer.caller,
            reporter: &reporter,
            network: &network,
        };
        policy::authorize(
            &actor,
            Action::CreateCase,
            None,
            self.config.require_active_reporter,
        )?;
        encode_name(&request.name)?;
        encode_url(&request.url)?;

        let derivation = self.deriver.case_location(&network.location, request.id)?;
        let case = Case {
            id: request.id,
            network: network.location,
            name: request.name,
            url: request.url,
            status: CaseStatus::Open,
            reporter_id: reporter.id,
            bump: derivation.bump,
        };
        self.store.create(derivation.location, &case).await?;

        self.publish(RegistryEvent::CaseCreated {
            network: network.location,
            case_id: case.id,
            reporter_id: reporter.id,
        })
        .await;
        Ok(case)
    }

    #[instrument(skip(self, signer, update), fields(reporter_id = %signer.reporter_id))]
    pub(super) async fn update_case_internal(
        &self,
        signer: ReporterSigner,
        name: &str,
        case_id: Uuid,
        update: CaseUpdate,
    ) -> RegistryResult<Case> {
        let network = self.load_network(name).await?.value;
        let reporter = self.acting_reporter(&network, signer).await?;
        let (location, Versioned { version, value }) = match self.load_case(&network, case_id).await? {
            (location, Some(case)) => (location, case),
            (location, None) => {
                return Err(RegistryError::NotFound {
                    kind: EntityKind::Case,
                    location,
                })
            }
        };

        let actor = Actor {
            caller: signer.caller,
            reporter: &reporter,
            network: &network,
        };
        policy::authorize(
            &actor,
            Action::UpdateCase,
            Some(value.reporter_id),
            self.config.require_active_reporter,
        )?;
        if let Some(case_name) = update.name.value() {
            encode_name(case_name)?;
        }
        if let Some(url) = update.url.value() {
            encode_url(url)?;
        }

        let mut case = value;
        update.name.apply(&mut case.name);
        update.url.apply(&mut case.url);
        update.status.apply(&mut case.status);

        let mut changeset = Changeset::new();
        changeset.replace(location, &case, version)?;
        self.store.commit(changeset).await?;

        self.publish(RegistryEvent::CaseUpdated {
            network: network.location,
            case_id,
            status: case.status,
        })
        .await;
        Ok(case)
    }
}
