//! # Risk Registry Benchmarks
//!
//! | Component | Operation | Target |
//! |-----------|-----------|--------|
//! | rr-01 Derivation | location derivation | < 10µs |
//! | rr-01 Codec | fixed-width encode | < 1µs |
//! | rr-02 Registry | flag create (in-memory) | < 100µs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use rr_01_derivation::{encode_address, encode_name, Deriver};
use rr_02_registry::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

// ============================================================================
// RR-01: Derivation
// ============================================================================

fn bench_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("rr-01-derivation");
    group.measurement_time(Duration::from_secs(5));

    let deriver = Deriver::new();
    let network = deriver.network_location("bench").unwrap().location;

    group.bench_function("network_location", |b| {
        b.iter(|| black_box(deriver.network_location(black_box("bench")).unwrap()))
    });

    let mut rng = rand::thread_rng();
    let addresses: Vec<Vec<u8>> = (0..1_000)
        .map(|_| (0..32).map(|_| rng.gen()).collect())
        .collect();

    group.throughput(Throughput::Elements(addresses.len() as u64));
    group.bench_function("address_location_batch", |b| {
        b.iter(|| {
            for address in &addresses {
                black_box(deriver.address_location(&network, address).unwrap());
            }
        })
    });
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("rr-01-codec");
    for len in [4usize, 16, 32] {
        let name = "n".repeat(len);
        group.bench_with_input(BenchmarkId::new("encode_name", len), &name, |b, name| {
            b.iter(|| black_box(encode_name(name).unwrap()))
        });
    }
    let address = vec![0xAB; 64];
    group.bench_function("encode_address_full_width", |b| {
        b.iter(|| black_box(encode_address(&address).unwrap()))
    });
    group.finish();
}

// ============================================================================
// RR-02: Registry
// ============================================================================

fn bench_flag_create(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let authority = Identity::new([0xAA; 32]);
    let publisher_account = Identity::new([0x01; 32]);
    let publisher = ReporterSigner::new(publisher_account, Uuid::from_u128(1));
    let case_id = Uuid::from_u128(2);

    let ledger = Arc::new(InMemoryLedger::new());
    let service = RegistryService::new(RegistryDependencies {
        substrate: Arc::new(InMemorySubstrate::new()),
        funds: ledger.clone(),
        events: Arc::new(InMemoryEventBus::new()),
        config: RegistryConfig::default(),
    });

    runtime.block_on(async {
        service
            .create_network(
                authority,
                CreateNetworkRequest {
                    name: "bench".into(),
                    ..CreateNetworkRequest::default()
                },
            )
            .await
            .unwrap();
        service
            .update_stake_configuration(
                authority,
                "bench",
                StakeConfiguration {
                    publisher_stake: 1,
                    ..StakeConfiguration::default()
                },
                Patch::Keep,
            )
            .await
            .unwrap();
        service
            .create_reporter(
                authority,
                "bench",
                CreateReporterRequest {
                    id: publisher.reporter_id,
                    role: ReporterRole::Publisher,
                    account: publisher_account,
                    ..CreateReporterRequest::default()
                },
            )
            .await
            .unwrap();
        ledger.mint(TokenId::ZERO, publisher_account, 1);
        service
            .activate_reporter(publisher_account, "bench", publisher.reporter_id)
            .await
            .unwrap();
        service
            .create_case(
                publisher,
                "bench",
                CreateCaseRequest {
                    id: case_id,
                    name: "bench".into(),
                    url: String::new(),
                },
            )
            .await
            .unwrap();
    });

    let mut group = c.benchmark_group("rr-02-registry");
    let mut next: u64 = 0;
    group.bench_function("create_address", |b| {
        b.iter(|| {
            next += 1;
            let request = CreateAddressRequest {
                address: next.to_be_bytes().to_vec(),
                case_id,
                risk_score: 5,
                category: Category::Scam,
            };
            runtime
                .block_on(service.create_address(publisher, "bench", request))
                .unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_derivation, bench_codec, bench_flag_create);
criterion_main!(benches);
