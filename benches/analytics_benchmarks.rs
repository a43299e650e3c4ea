//! Performance benchmarks for the analytics pipeline
//!
//! Targets:
//! - Concept aggregation: <1ms for a 1k-attempt ledger
//! - Snapshot computation: <5ms for 1k attempts across realms
//! - Path construction: <1ms against the built-in curriculum

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use paideia::analytics::{aggregate_concepts, compute_metrics};
use paideia::adaptive::build_path;
use paideia::{
    AttemptId, AttemptMetadata, AttemptRecord, ChallengeId, CurriculumConfig, UserId,
};
use std::collections::HashMap;

/// Build a synthetic ledger cycling through the built-in curriculum
fn synthetic_ledger(size: usize) -> Vec<AttemptRecord> {
    let config = CurriculumConfig::default();
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

    (0..size)
        .map(|i| {
            let category = &config.categories[i % config.categories.len()];
            let concept = &category.concepts[i % category.concepts.len()];
            let completed = base + Duration::minutes(i as i64);
            AttemptRecord {
                id: AttemptId::new(),
                user_id: UserId::new("bench"),
                challenge_id: ChallengeId::new(format!("ch-{}", i % 50)),
                started_at: completed - Duration::seconds(40),
                completed_at: completed,
                is_correct: i % 3 != 0,
                score: if i % 3 != 0 { 85.0 } else { 25.0 },
                hints_used: (i % 4) as u32,
                time_elapsed: 30.0 + (i % 60) as f64,
                metadata: AttemptMetadata {
                    realm_id: category.realm_id.clone(),
                    challenge_type: "drill".to_string(),
                    concepts: vec![concept.clone()],
                    ..Default::default()
                },
            }
        })
        .collect()
}

fn bench_concept_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("concept_aggregation");
    for size in [100, 1_000] {
        let ledger = synthetic_ledger(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &ledger, |b, ledger| {
            b.iter(|| aggregate_concepts(black_box(ledger)));
        });
    }
    group.finish();
}

fn bench_snapshot_computation(c: &mut Criterion) {
    let config = CurriculumConfig::default();
    let ledger = synthetic_ledger(1_000);
    let user = UserId::new("bench");
    let now = Utc.with_ymd_and_hms(2025, 3, 2, 9, 0, 0).unwrap();

    c.bench_function("snapshot_1k_attempts", |b| {
        b.iter(|| {
            compute_metrics(
                black_box(&user),
                black_box(&ledger),
                &[],
                &config,
                now,
            )
        });
    });
}

fn bench_path_construction(c: &mut Criterion) {
    let config = CurriculumConfig::default();
    let ledger = synthetic_ledger(1_000);
    let concepts = aggregate_concepts(&ledger);
    let user = UserId::new("bench");
    let now = Utc.with_ymd_and_hms(2025, 3, 2, 9, 0, 0).unwrap();

    c.bench_function("path_construction", |b| {
        b.iter(|| {
            build_path(
                black_box(&user),
                &config,
                &HashMap::new(),
                black_box(&concepts),
                &[],
                4,
                now,
            )
        });
    });
}

criterion_group!(
    benches,
    bench_concept_aggregation,
    bench_snapshot_computation,
    bench_path_construction
);
criterion_main!(benches);
