//! Network creation and administration.

use super::RegistryService;
use crate::domain::entities::{Network, RewardConfiguration, StakeConfiguration};
use crate::domain::policy;
use crate::domain::value_objects::{Identity, Patch, TokenId};
use crate::errors::{RegistryError, RegistryResult};
use crate::events::RegistryEvent;
use crate::ports::inbound::CreateNetworkRequest;
use crate::ports::outbound::{EventSink, FundsTransfer, StorageSubstrate};
use tracing::{info, instrument};

impl<S, F, E> RegistryService<S, F, E>
where
    S: StorageSubstrate,
    F: FundsTransfer,
    E: EventSink,
{
    #[instrument(skip(self, request), fields(network = %request.name))]
    pub(super) async fn create_network_internal(
        &self,
        caller: Identity,
        request: CreateNetworkRequest,
    ) -> RegistryResult<Network> {
        if let Some(bootstrap) = self.config.bootstrap_authority {
            if caller != bootstrap {
                return Err(RegistryError::Forbidden(
                    "only the bootstrap authority may create networks".into(),
                ));
            }
        }

        let derivation = self.deriver.network_location(&request.name)?;
        let network = Network {
            name: request.name,
            location: derivation.location,
            authority: caller,
            stake_token: request.stake_token,
            reward_token: request.reward_token,
            stake_configuration: request.stake_configuration,
            reward_configuration: request.reward_configuration,
            bump: derivation.bump,
        };
        self.store.create(network.location, &network).await?;

        info!(location = %network.location, authority = %caller, "network created");
        self.publish(RegistryEvent::NetworkCreated {
            network: network.location,
            name: network.name.clone(),
            authority: caller,
        })
        .await;
        Ok(network)
    }

    #[instrument(skip(self))]
    pub(super) async fn set_authority_internal(
        &self,
        caller: Identity,
        name: &str,
        new_authority: Identity,
    ) -> RegistryResult<Network> {
        let location = self.deriver.network_location(name)?.location;
        let mut previous = Identity::ZERO;
        let network = self
            .store
            .update::<Network, _>(location, |network| {
                policy::authorize_admin(caller, network)?;
                previous = network.authority;
                network.authority = new_authority;
                Ok(())
            })
            .await?;

        info!(%previous, authority = %new_authority, "network authority changed");
        self.publish(RegistryEvent::AuthorityChanged {
            network: location,
            previous,
            authority: new_authority,
        })
        .await;
        Ok(network)
    }

    #[instrument(skip(self, configuration))]
    pub(super) async fn update_stake_configuration_internal(
        &self,
        caller: Identity,
        name: &str,
        configuration: StakeConfiguration,
        stake_token: Patch<TokenId>,
    ) -> RegistryResult<Network> {
        let location = self.deriver.network_location(name)?.location;
        let network = self
            .store
            .update::<Network, _>(location, |network| {
                policy::authorize_admin(caller, network)?;
                network.stake_configuration = configuration;
                stake_token.apply(&mut network.stake_token);
                Ok(())
            })
            .await?;

        self.publish(RegistryEvent::StakeConfigurationUpdated { network: location })
            .await;
        Ok(network)
    }

    #[instrument(skip(self, configuration))]
    pub(super) async fn update_reward_configuration_internal(
        &self,
        caller: Identity,
        name: &str,
        configuration: RewardConfiguration,
        reward_token: Patch<TokenId>,
    ) -> RegistryResult<Network> {
        let location = self.deriver.network_location(name)?.location;
        let network = self
            .store
            .update::<Network, _>(location, |network| {
                policy::authorize_admin(caller, network)?;
                network.reward_configuration = configuration;
                reward_token.apply(&mut network.reward_token);
                Ok(())
            })
            .await?;

        self.publish(RegistryEvent::RewardConfigurationUpdated { network: location })
            .await;
        Ok(network)
    }
}
