//! # Registry Flows
//!
//! End-to-end lifecycles across derivation, store, policy and ledger:
//!
//! 1. **Flag lifecycle**: network → reporter → case → address → update → confirm
//! 2. **Stake lifecycle**: activate → deactivate → locked → unstake
//! 3. **Asset lifecycle** with case reassignment rules
//! 4. **Degraded collaborators**: reward failures stay non-fatal

use super::fixtures::*;
use rr_01_derivation::Deriver;
use rr_02_registry::prelude::*;
use uuid::Uuid;

// =============================================================================
// FLAG LIFECYCLE
// =============================================================================

#[tokio::test]
async fn test_address_flag_lifecycle() {
    let registry = Registry::with_network().await;
    let service = &registry.service;
    let r1 = registry.active_reporter(1, ReporterRole::Publisher).await;
    let c1 = Uuid::from_u128(0xC1);
    registry.open_case(r1, c1).await;

    let a1 = vec![0xA1; 20];
    service
        .create_address(
            r1,
            NETWORK,
            CreateAddressRequest {
                address: a1.clone(),
                case_id: c1,
                risk_score: 5,
                category: Category::Hacker,
            },
        )
        .await
        .unwrap();

    let stored = service.get_address(NETWORK, &a1).await.unwrap();
    assert_eq!(stored.address, a1);
    assert_eq!(stored.flag.case_id, c1);
    assert_eq!(stored.flag.reporter_id, r1.reporter_id);
    assert_eq!(stored.flag.confirmations, 0);
    assert_eq!(stored.flag.risk_score, 5);
    assert_eq!(stored.flag.category, Category::Hacker);

    // The record sits at the location anyone can derive from its inputs.
    let deriver = Deriver::new();
    let network = service.get_network(NETWORK).await.unwrap();
    let derived = deriver.address_location(&network.location, &a1).unwrap();
    assert_eq!(stored.bump, derived.bump);
    assert_eq!(network.location, deriver.network_location(NETWORK).unwrap().location);

    let updated = service
        .update_address(
            r1,
            NETWORK,
            &a1,
            FlagUpdate {
                risk_score: Patch::Set(10),
                category: Patch::Set(Category::ChildAbuse),
                case_id: Patch::Set(c1),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.flag.risk_score, 10);
    assert_eq!(updated.flag.category, Category::ChildAbuse);
    assert_eq!(updated.flag.case_id, c1);

    let validator = registry.active_reporter(2, ReporterRole::Validator).await;
    let confirmed = service.confirm_address(validator, NETWORK, &a1).await.unwrap();
    assert_eq!(confirmed.record.flag.confirmations, 1);

    let again = service.confirm_address(validator, NETWORK, &a1).await;
    assert!(matches!(again, Err(RegistryError::AlreadyExists { .. })));
    assert_eq!(
        service.get_address(NETWORK, &a1).await.unwrap().flag.confirmations,
        1
    );

    // Rewards: tracer reward to r1, confirmation reward to the validator.
    assert_eq!(registry.ledger.balance_of(REWARD_TOKEN, account(1)), 10);
    assert_eq!(registry.ledger.balance_of(REWARD_TOKEN, account(2)), 4);
}

#[tokio::test]
async fn test_tracer_flags_but_cannot_reassign() {
    let registry = Registry::with_network().await;
    let service = &registry.service;
    let publisher = registry.active_reporter(1, ReporterRole::Publisher).await;
    let tracer = registry.active_reporter(2, ReporterRole::Tracer).await;
    let c1 = Uuid::from_u128(1);
    let c2 = Uuid::from_u128(2);
    registry.open_case(publisher, c1).await;
    registry.open_case(publisher, c2).await;

    let address = vec![0x42; 32];
    service
        .create_address(
            tracer,
            NETWORK,
            CreateAddressRequest {
                address: address.clone(),
                case_id: c1,
                risk_score: 3,
                category: Category::Scam,
            },
        )
        .await
        .unwrap();

    let err = service
        .update_address(
            tracer,
            NETWORK,
            &address,
            FlagUpdate {
                case_id: Patch::Set(c2),
                ..FlagUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::Forbidden("case reassignment not permitted for this role".into())
    );

    // A publisher may not rewrite a tracer's flag without authority...
    let err = service
        .update_address(
            publisher,
            NETWORK,
            &address,
            FlagUpdate {
                case_id: Patch::Set(c2),
                ..FlagUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Forbidden(_)));

    // ...but an Authority reporter may.
    let authority = registry.active_reporter(3, ReporterRole::Authority).await;
    let moved = service
        .update_address(
            authority,
            NETWORK,
            &address,
            FlagUpdate {
                case_id: Patch::Set(c2),
                ..FlagUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.flag.case_id, c2);
    assert_eq!(moved.flag.reporter_id, tracer.reporter_id);
}

// =============================================================================
// STAKE LIFECYCLE
// =============================================================================

#[tokio::test]
async fn test_stake_lifecycle() {
    let registry = Registry::with_network().await;
    let service = &registry.service;
    let network = service.get_network(NETWORK).await.unwrap();
    let signer = registry.active_reporter(7, ReporterRole::Appraiser).await;

    assert_eq!(registry.ledger.balance_of(STAKE_TOKEN, account(7)), 0);
    assert_eq!(registry.ledger.balance_of(STAKE_TOKEN, network.escrow()), STAKE);

    service
        .deactivate_reporter(signer.caller, NETWORK, signer.reporter_id)
        .await
        .unwrap();

    registry.clock.advance(UNLOCK_SECS - 1);
    let err = service
        .unstake(signer.caller, NETWORK, signer.reporter_id)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::TooEarly { .. }));

    registry.clock.advance(1);
    let reporter = service
        .unstake(signer.caller, NETWORK, signer.reporter_id)
        .await
        .unwrap();
    assert_eq!(reporter.status, ReporterStatus::Inactive);
    assert_eq!(registry.ledger.balance_of(STAKE_TOKEN, account(7)), STAKE);
    assert_eq!(registry.ledger.balance_of(STAKE_TOKEN, network.escrow()), 0);

    // Back to Inactive: the cycle may start again.
    let reactivated = service
        .activate_reporter(signer.caller, NETWORK, signer.reporter_id)
        .await
        .unwrap();
    assert_eq!(reactivated.status, ReporterStatus::Active);
}

#[tokio::test]
async fn test_unstaking_reporter_cannot_flag() {
    let registry = Registry::with_network().await;
    let publisher = registry.active_reporter(1, ReporterRole::Publisher).await;
    registry.open_case(publisher, Uuid::from_u128(1)).await;
    registry
        .service
        .deactivate_reporter(publisher.caller, NETWORK, publisher.reporter_id)
        .await
        .unwrap();

    let err = registry
        .service
        .create_address(
            publisher,
            NETWORK,
            CreateAddressRequest {
                address: vec![1; 20],
                case_id: Uuid::from_u128(1),
                risk_score: 1,
                category: Category::Mixer,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Forbidden(_)));
}

// =============================================================================
// ASSETS
// =============================================================================

#[tokio::test]
async fn test_asset_flag_lifecycle() {
    let registry = Registry::with_network().await;
    let service = &registry.service;
    let publisher = registry.active_reporter(1, ReporterRole::Publisher).await;
    let appraiser = registry.active_reporter(2, ReporterRole::Appraiser).await;
    let case = Uuid::from_u128(9);
    registry.open_case(publisher, case).await;

    let mint = vec![0x4D; 32];
    for token in 1..=3u8 {
        service
            .create_asset(
                publisher,
                NETWORK,
                CreateAssetRequest {
                    mint: mint.clone(),
                    asset_id: vec![token],
                    case_id: case,
                    risk_score: token,
                    category: Category::Counterfeit,
                },
            )
            .await
            .unwrap();
    }
    assert_eq!(service.count_assets(NETWORK).await.unwrap(), 3);

    let confirmed = service
        .confirm_asset(appraiser, NETWORK, &mint, &[2])
        .await
        .unwrap();
    assert_eq!(confirmed.record.flag.confirmations, 1);
    assert_eq!(confirmed.record.flag.risk_score, 2);
    assert!(!service
        .has_confirmed_asset(NETWORK, &mint, &[1], appraiser.reporter_id)
        .await
        .unwrap());

    let page = service.list_assets(NETWORK, 2, 0).await.unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);
}

// =============================================================================
// DEGRADED COLLABORATORS
// =============================================================================

#[tokio::test]
async fn test_reward_failure_is_not_fatal() {
    let registry = Registry::with_network().await;
    let service = &registry.service;
    let publisher = registry.active_reporter(1, ReporterRole::Publisher).await;
    let case = Uuid::from_u128(1);
    registry.open_case(publisher, case).await;

    registry.ledger.set_unavailable(true);
    let reported = service
        .create_address(
            publisher,
            NETWORK,
            CreateAddressRequest {
                address: vec![0xEE; 20],
                case_id: case,
                risk_score: 8,
                category: Category::Ransomware,
            },
        )
        .await
        .unwrap();
    assert!(reported.reward.is_failed());
    assert_eq!(
        service
            .get_address(NETWORK, &[0xEE; 20])
            .await
            .unwrap()
            .flag
            .risk_score,
        8
    );
    assert_eq!(service.stats().reward_failures, 1);
}

#[tokio::test]
async fn test_networks_are_isolated() {
    let registry = Registry::with_network().await;
    let service = &registry.service;
    let publisher = registry.active_reporter(1, ReporterRole::Publisher).await;

    // The reporter exists only in "N".
    service
        .create_network(
            AUTHORITY,
            CreateNetworkRequest {
                name: "M".into(),
                ..CreateNetworkRequest::default()
            },
        )
        .await
        .unwrap();
    let err = service
        .create_case(
            publisher,
            "M",
            CreateCaseRequest {
                id: Uuid::from_u128(1),
                ..CreateCaseRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::NotFound {
            kind: EntityKind::Reporter,
            ..
        }
    ));
    assert_eq!(service.count_reporters("M").await.unwrap(), 0);
    assert_eq!(service.count_reporters(NETWORK).await.unwrap(), 1);
}
