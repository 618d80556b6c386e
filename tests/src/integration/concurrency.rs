//! Racing writers and slow collaborators.

use super::fixtures::*;
use rr_02_registry::prelude::*;
use std::time::Duration;
use uuid::Uuid;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_address_creates_single_winner() {
    let registry = Registry::with_network().await;
    let publisher = registry.active_reporter(1, ReporterRole::Publisher).await;
    let tracer = registry.active_reporter(2, ReporterRole::Tracer).await;
    let case = Uuid::from_u128(1);
    registry.open_case(publisher, case).await;

    let attempts: Vec<_> = [publisher, tracer, publisher, tracer]
        .into_iter()
        .enumerate()
        .map(|(i, signer)| {
            let service = registry.service.clone();
            tokio::spawn(async move {
                service
                    .create_address(
                        signer,
                        NETWORK,
                        CreateAddressRequest {
                            address: vec![0xAB; 20],
                            case_id: case,
                            risk_score: i as u8,
                            category: Category::Theft,
                        },
                    )
                    .await
            })
        })
        .collect();

    let mut winners = 0;
    let mut losers = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            Ok(_) => winners += 1,
            Err(RegistryError::AlreadyExists { .. }) => losers += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(winners, 1);
    assert_eq!(losers, 3);
    assert_eq!(registry.service.count_addresses(NETWORK).await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_confirmations_counted_once_each() {
    let registry = Registry::with_network().await;
    let publisher = registry.active_reporter(1, ReporterRole::Publisher).await;
    let case = Uuid::from_u128(1);
    registry.open_case(publisher, case).await;
    let address = vec![0xCD; 20];
    registry
        .service
        .create_address(
            publisher,
            NETWORK,
            CreateAddressRequest {
                address: address.clone(),
                case_id: case,
                risk_score: 6,
                category: Category::Sanctions,
            },
        )
        .await
        .unwrap();

    let mut validators = Vec::new();
    for n in 10..16u8 {
        validators.push(registry.active_reporter(n, ReporterRole::Validator).await);
    }

    // Each validator confirms twice, concurrently. Version conflicts on the
    // address record are retried.
    let mut handles = Vec::new();
    for signer in validators.iter().chain(validators.iter()).copied() {
        let service = registry.service.clone();
        let address = address.clone();
        handles.push(tokio::spawn(async move {
            loop {
                match service.confirm_address(signer, NETWORK, &address).await {
                    Err(e) if matches!(e, RegistryError::Conflict { .. }) => {
                        tokio::task::yield_now().await
                    }
                    other => return other,
                }
            }
        }));
    }

    let mut confirmed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => confirmed += 1,
            Err(e) => assert!(e.is_expected_race(), "unexpected error: {e}"),
        }
    }
    assert_eq!(confirmed, validators.len());

    let stored = registry.service.get_address(NETWORK, &address).await.unwrap();
    assert_eq!(stored.flag.confirmations, validators.len() as u64);
    for signer in &validators {
        assert!(registry
            .service
            .has_confirmed_address(NETWORK, &address, signer.reporter_id)
            .await
            .unwrap());
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_storage_times_out() {
    let registry = Registry::new(RegistryConfig {
        collaborator_timeout_ms: 100,
        ..RegistryConfig::default()
    });
    registry.substrate.set_latency(Duration::from_secs(5));

    let err = registry.service.get_network(NETWORK).await.unwrap_err();
    assert!(err.is_retryable());

    registry.substrate.set_latency(Duration::ZERO);
    assert_eq!(
        registry.service.get_network(NETWORK).await.unwrap(),
        Network::default()
    );
}

#[tokio::test]
async fn test_events_reach_subscribers_in_commit_order() {
    let registry = Registry::new(RegistryConfig::default());
    let mut rx = registry.bus.subscribe();

    registry
        .service
        .create_network(
            AUTHORITY,
            CreateNetworkRequest {
                name: NETWORK.into(),
                ..CreateNetworkRequest::default()
            },
        )
        .await
        .unwrap();
    registry
        .service
        .set_authority(AUTHORITY, NETWORK, account(5))
        .await
        .unwrap();

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert_eq!(first.name(), "NetworkCreated");
    match second {
        RegistryEvent::AuthorityChanged {
            previous, authority, ..
        } => {
            assert_eq!(previous, AUTHORITY);
            assert_eq!(authority, account(5));
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(registry.bus.events_published(), 2);
}
