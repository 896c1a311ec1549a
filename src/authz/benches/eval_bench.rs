//! Access engine benchmarks
//!
//! The decision path is synchronous and allocation-light; these runs
//! track the cost of a full evaluate call against the registry lookup
//! and raw matrix probe it is built from.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use haven_authz::{AccessEngine, EngineConfig, MemorySink, PermissionMatrix, PolicyRegistry};
use haven_core::{Action, Identity, Module, Role};

fn quiet_engine() -> AccessEngine {
    // Metrics off and a zero-capacity log so the runs measure the
    // decision path itself.
    let config = EngineConfig {
        enable_metrics: false,
    };
    AccessEngine::with_sink(
        PermissionMatrix::builtin(),
        config,
        Arc::new(MemorySink::new(0)),
    )
    .unwrap()
}

fn bench_evaluate_paths(c: &mut Criterion) {
    let engine = quiet_engine();

    c.bench_function("evaluate_grant", |b| {
        let identity = Identity::new("bench-user", "Bench User").with_claim("IncidentManager");
        b.iter(|| {
            let decision = engine
                .evaluate(black_box("incident.create"), black_box(&identity))
                .unwrap();
            black_box(decision);
        });
    });

    c.bench_function("evaluate_deny", |b| {
        let identity = Identity::new("bench-user", "Bench User").with_claim("Employee");
        b.iter(|| {
            let decision = engine
                .evaluate(black_box("security.configure"), black_box(&identity))
                .unwrap();
            black_box(decision);
        });
    });

    c.bench_function("evaluate_anonymous", |b| {
        let identity = Identity::anonymous();
        b.iter(|| {
            let decision = engine
                .evaluate(black_box("incident.read"), black_box(&identity))
                .unwrap();
            black_box(decision);
        });
    });
}

fn bench_claim_scan(c: &mut Criterion) {
    let engine = quiet_engine();

    let mut group = c.benchmark_group("claim_scan");

    // Only the final claim satisfies the policy, so each run walks the
    // whole claim list before granting.
    let fillers = [
        Role::Employee,
        Role::TrainingManager,
        Role::PpeManager,
        Role::WasteManager,
        Role::IncidentManager,
        Role::HazardManager,
        Role::AuditManager,
    ];

    for claim_count in [1usize, 4, 8] {
        let mut identity = Identity::new("bench-user", "Bench User");
        for role in fillers.iter().take(claim_count - 1) {
            identity = identity.with_claim(role.as_str());
        }
        identity = identity.with_claim(Role::SecurityManager.as_str());

        group.bench_with_input(
            BenchmarkId::new("claims", claim_count),
            &claim_count,
            |b, _| {
                b.iter(|| {
                    let decision = engine
                        .evaluate(black_box("security.configure"), black_box(&identity))
                        .unwrap();
                    black_box(decision);
                });
            },
        );
    }

    group.finish();
}

fn bench_registry_lookup(c: &mut Criterion) {
    let registry = PolicyRegistry::build().unwrap();

    c.bench_function("registry_lookup", |b| {
        b.iter(|| {
            let requirement = registry.get(black_box("incident.create"));
            black_box(requirement);
        });
    });
}

fn bench_matrix_probe(c: &mut Criterion) {
    let matrix = PermissionMatrix::builtin();

    c.bench_function("matrix_probe", |b| {
        b.iter(|| {
            let held = matrix.has_permission(
                black_box(Role::IncidentManager),
                black_box(Module::Incident),
                black_box(Action::Create),
            );
            black_box(held);
        });
    });
}

criterion_group!(
    benches,
    bench_evaluate_paths,
    bench_claim_scan,
    bench_registry_lookup,
    bench_matrix_probe
);
criterion_main!(benches);
