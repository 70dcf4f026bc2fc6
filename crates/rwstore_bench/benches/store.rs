//! Rewriter store benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rwstore_bench::utils::{config_with_rules, put_request};
use rwstore_core::{load_definition, RawRecord, RewriterStore};
use rwstore_storage::InMemoryIndex;
use serde_json::Value;

/// Benchmark saving rewriters of different config sizes.
fn bench_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("put_rewriter");

    for size in [1_000, 100_000] {
        let request = put_request(size);
        let store = RewriterStore::new(InMemoryIndex::new());
        group.bench_with_input(BenchmarkId::from_parameter(size), &request, |b, request| {
            b.iter(|| {
                let outcome = store.put_request("bench", black_box(request)).unwrap();
                black_box(outcome);
            });
        });
    }

    group.finish();
}

/// Benchmark loading a saved rewriter.
fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_rewriter");

    for size in [1_000, 100_000] {
        let store = RewriterStore::new(InMemoryIndex::new());
        store.put_request("bench", &put_request(size)).unwrap();
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            b.iter(|| {
                let definition = store.get_rewriter(black_box("bench")).unwrap();
                black_box(definition);
            });
        });
    }

    group.finish();
}

/// Benchmark reading legacy and current records.
fn bench_load_definition(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_definition");
    let config = Value::Object(config_with_rules(10_000));

    let mut legacy = RawRecord::new();
    legacy.insert("class".into(), Value::from("CommonRules"));
    legacy.insert("config".into(), Value::from(config.to_string()));

    let current = put_request(10_000).to_stored_form().unwrap();

    group.bench_function("legacy", |b| {
        b.iter(|| black_box(load_definition("bench", black_box(&legacy)).unwrap()));
    });
    group.bench_function("current", |b| {
        b.iter(|| black_box(load_definition("bench", black_box(&current)).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_put, bench_get, bench_load_definition);
criterion_main!(benches);
