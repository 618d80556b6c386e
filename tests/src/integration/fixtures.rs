//! Shared setup for the integration flows.

use registry_telemetry::{init_telemetry, TelemetryConfig};
use rr_02_registry::prelude::*;
use std::sync::{Arc, Once};
use uuid::Uuid;

pub const AUTHORITY: Identity = Identity::new([0xAA; 32]);
pub const STAKE_TOKEN: TokenId = Identity::new([0x01; 32]);
pub const REWARD_TOKEN: TokenId = Identity::new([0x02; 32]);
pub const NETWORK: &str = "N";
pub const STAKE: u128 = 1_000;
pub const UNLOCK_SECS: u64 = 7 * 24 * 3_600;
pub const GENESIS: u64 = 1_700_000_000;

pub type Service = RegistryService<InMemorySubstrate, InMemoryLedger, InMemoryEventBus>;

static TELEMETRY: Once = Once::new();

/// A registry wired to in-memory collaborators with a manual clock.
pub struct Registry {
    pub service: Arc<Service>,
    pub substrate: Arc<InMemorySubstrate>,
    pub ledger: Arc<InMemoryLedger>,
    pub bus: Arc<InMemoryEventBus>,
    pub clock: ManualTimeSource,
}

impl Registry {
    pub fn new(config: RegistryConfig) -> Self {
        TELEMETRY.call_once(|| {
            let _ = init_telemetry(&TelemetryConfig {
                log_level: "warn".into(),
                console_output: false,
                ..TelemetryConfig::default()
            });
        });

        let substrate = Arc::new(InMemorySubstrate::new());
        let ledger = Arc::new(InMemoryLedger::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let clock = ManualTimeSource::new(GENESIS);
        let service = RegistryService::new(RegistryDependencies {
            substrate: substrate.clone(),
            funds: ledger.clone(),
            events: bus.clone(),
            config,
        })
        .with_time_source(Box::new(clock.clone()));

        Self {
            service: Arc::new(service),
            substrate,
            ledger,
            bus,
            clock,
        }
    }

    /// Network "N" owned by [`AUTHORITY`] with a funded reward pool.
    pub async fn with_network() -> Self {
        let registry = Self::new(RegistryConfig::default());
        let network = registry
            .service
            .create_network(
                AUTHORITY,
                CreateNetworkRequest {
                    name: NETWORK.into(),
                    stake_token: STAKE_TOKEN,
                    reward_token: REWARD_TOKEN,
                    stake_configuration: StakeConfiguration {
                        unlock_duration: UNLOCK_SECS,
                        validator_stake: STAKE,
                        tracer_stake: STAKE,
                        publisher_stake: STAKE,
                        authority_stake: STAKE,
                        appraiser_stake: STAKE,
                    },
                    reward_configuration: RewardConfiguration {
                        address_tracer_reward: 10,
                        address_confirmation_reward: 4,
                        asset_tracer_reward: 12,
                        asset_confirmation_reward: 6,
                    },
                },
            )
            .await
            .unwrap();
        registry
            .ledger
            .mint(REWARD_TOKEN, network.escrow(), 1_000_000);
        registry
    }

    /// Create, fund and activate reporter `n` with `role`.
    pub async fn active_reporter(&self, n: u8, role: ReporterRole) -> ReporterSigner {
        let id = reporter_id(n);
        self.service
            .create_reporter(
                AUTHORITY,
                NETWORK,
                CreateReporterRequest {
                    id,
                    role,
                    account: account(n),
                    name: format!("r{n}"),
                    url: format!("https://r{n}.example"),
                },
            )
            .await
            .unwrap();
        self.ledger.mint(STAKE_TOKEN, account(n), STAKE);
        self.service
            .activate_reporter(account(n), NETWORK, id)
            .await
            .unwrap();
        ReporterSigner::new(account(n), id)
    }

    pub async fn open_case(&self, signer: ReporterSigner, id: Uuid) -> Case {
        self.service
            .create_case(
                signer,
                NETWORK,
                CreateCaseRequest {
                    id,
                    name: format!("case {id}"),
                    url: "https://cases.example".into(),
                },
            )
            .await
            .unwrap()
    }
}

pub fn account(n: u8) -> Identity {
    Identity::new([n; 32])
}

pub fn reporter_id(n: u8) -> Uuid {
    Uuid::from_u128(0x1000 + n as u128)
}
