//! Benchmarks for hashing, bucketing and rollout decisions

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use rollgate::bucket::default_user_bucket;
use rollgate::prelude::*;
use rollgate::{hash, murmur3_utf16};

fn hash_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash");

    for len in [8usize, 32, 128, 1024] {
        let key = "k".repeat(len);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("ascii", len), &key, |b, key| {
            b.iter(|| hash(black_box(key)))
        });
    }

    let unicode = "日本語のキー😀".repeat(16);
    group.bench_function("unicode_seeded", |b| {
        b.iter(|| murmur3_utf16(black_box(&unicode), black_box(42)))
    });

    group.finish();
}

fn bucket_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucket");
    group.throughput(Throughput::Elements(1));

    group.bench_function("default_salt", |b| {
        b.iter(|| default_user_bucket(black_box("user-123456"), black_box("new-dashboard")))
    });

    group.finish();
}

fn decision_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("decision");
    group.throughput(Throughput::Elements(1));

    let whitelist: Vec<String> = (0..1_000).map(|i| format!("vip-{}", i)).collect();
    let table = FeatureTable::new()
        .with_feature_everywhere(
            "auth",
            FeatureConfig::rollout(50.0).with_whitelisted(whitelist),
        )
        .with_feature_everywhere("legacy", FeatureConfig::default_deny());
    let engine = RolloutEngine::new(table, Environment::Production);

    let rollout_user = FeatureCheckContext::new().with_user_id("user-123");
    let vip_user = FeatureCheckContext::new().with_user_id("vip-500");

    group.bench_function("rollout", |b| {
        b.iter(|| engine.is_feature_enabled(black_box("auth"), black_box(&rollout_user)))
    });

    group.bench_function("whitelisted", |b| {
        b.iter(|| engine.is_feature_enabled(black_box("auth"), black_box(&vip_user)))
    });

    group.bench_function("disabled", |b| {
        b.iter(|| engine.is_feature_enabled(black_box("legacy"), black_box(&rollout_user)))
    });

    group.bench_function("unknown_feature", |b| {
        b.iter(|| engine.is_feature_enabled(black_box("ghost"), black_box(&rollout_user)))
    });

    group.bench_function("batch_of_3", |b| {
        b.iter(|| engine.evaluate_all(black_box(["auth", "legacy", "ghost"]), &rollout_user))
    });

    group.finish();
}

criterion_group!(benches, hash_benchmark, bucket_benchmark, decision_benchmark);
criterion_main!(benches);
