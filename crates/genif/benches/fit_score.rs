//! Fit and score throughput across measures and thread counts.

use std::num::NonZeroUsize;
use std::time::Duration;

use genif::measure::{Euclidean, Levenshtein};
use genif::testing::{cluster_with_outlier, mutated_strings};
use genif::{GenIFConfig, GenIFModel};

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

const THREAD_COUNTS: &[usize] = &[1, 2, 4, 8];

fn bench_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(5))
        .sample_size(10)
}

fn config(n_threads: usize) -> GenIFConfig {
    GenIFConfig::builder()
        .maybe_n_threads(NonZeroUsize::new(n_threads))
        .build()
        .unwrap()
}

fn bench_fit(c: &mut Criterion) {
    let items = cluster_with_outlier(10_000, 8, 6.0, 42);

    let mut group = c.benchmark_group("fit/euclidean/10k_x_8");
    group.throughput(Throughput::Elements(100));
    for &n_threads in THREAD_COUNTS {
        group.bench_with_input(BenchmarkId::from_parameter(n_threads), &items, |b, items| {
            b.iter(|| black_box(GenIFModel::fit(black_box(items), Euclidean, config(n_threads))))
        });
    }
    group.finish();
}

fn bench_score(c: &mut Criterion) {
    let items = cluster_with_outlier(10_000, 8, 6.0, 42);
    let batch = cluster_with_outlier(20_000, 8, 6.0, 7);

    let mut group = c.benchmark_group("score/euclidean/10k_x_8");
    group.throughput(Throughput::Elements(batch.len() as u64));
    for &n_threads in THREAD_COUNTS {
        let model = GenIFModel::fit(&items, Euclidean, config(n_threads)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n_threads), &batch, |b, batch| {
            b.iter(|| black_box(model.score(black_box(batch))))
        });
    }
    group.finish();
}

fn bench_strings(c: &mut Criterion) {
    let items = mutated_strings("authentication-service-eu", 5_000, 4, 42);
    let model = GenIFModel::fit(&items, Levenshtein, config(0)).unwrap();

    let mut group = c.benchmark_group("levenshtein/5k");
    group.bench_function("fit", |b| {
        b.iter(|| black_box(GenIFModel::fit(black_box(&items), Levenshtein, config(0))))
    });
    group.throughput(Throughput::Elements(items.len() as u64));
    group.bench_function("score", |b| b.iter(|| black_box(model.score(black_box(&items)))));
    group.finish();
}

criterion_group! {
    name = benches;
    config = bench_criterion();
    targets = bench_fit, bench_score, bench_strings
}
criterion_main!(benches);
