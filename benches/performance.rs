use criterion::{
    AxisScale, BenchmarkId, Criterion, PlotConfiguration, Throughput, criterion_group,
    criterion_main,
};
use rand::prelude::{Rng, SeedableRng};
use rand::rngs::StdRng;
use skipdict::{DEFAULT_P, Geometric, MAX_LEVELS, SkipDict};
use std::collections::BTreeMap;
use std::hint::black_box;

const DATASET_SIZES: [u64; 3] = [1_000, 10_000, 100_000];

fn seeded_dict(seed: u64) -> SkipDict<u64, u64, Geometric<StdRng>> {
    let generator = Geometric::with_rng(MAX_LEVELS, DEFAULT_P, StdRng::seed_from_u64(seed)).unwrap();
    SkipDict::with_generator(generator)
}

/// Pre-populates a map with the keys `1..size`.
fn setup_dict(size: u64) -> SkipDict<u64, u64, Geometric<StdRng>> {
    let mut dict = seeded_dict(42);
    for i in 1..size {
        dict.set(i, i).unwrap();
    }
    dict
}

/// --- Sequential Inserts Benchmark ---
fn bench_inserts(c: &mut Criterion) {
    let mut group = c.benchmark_group("Sequential Inserts (Set)");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in &DATASET_SIZES {
        group.throughput(Throughput::Elements(size));

        group.bench_with_input(BenchmarkId::new("SkipDict", size), &size, |b, &size| {
            b.iter(|| black_box(setup_dict(size)));
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |b, &size| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for i in 1..size {
                    map.insert(i, i);
                }
                black_box(map)
            });
        });
    }
    group.finish();
}

/// --- Point Lookups Benchmark ---
fn bench_lookups(c: &mut Criterion) {
    let mut group = c.benchmark_group("Point Lookups (Get)");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in &DATASET_SIZES {
        let dict = setup_dict(size);
        let map: BTreeMap<u64, u64> = (1..size).map(|i| (i, i)).collect();
        group.throughput(Throughput::Elements(1_000));

        group.bench_with_input(BenchmarkId::new("SkipDict", size), &size, |b, &size| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| {
                for _ in 0..1_000 {
                    let key = rng.random_range(1..size);
                    black_box(dict.get(&key).unwrap());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |b, &size| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| {
                for _ in 0..1_000 {
                    let key = rng.random_range(1..size);
                    black_box(map.get(&key).unwrap());
                }
            });
        });
    }
    group.finish();
}

/// --- Insert Then Sort Benchmark ---
///
/// Inserts random keys with many duplicates and reads them back in order.
fn bench_insert_and_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("Insert And Sort (Keys)");

    for &size in &DATASET_SIZES {
        let mut rng = StdRng::seed_from_u64(size);
        let pairs: Vec<(u64, u64)> = (0..size)
            .map(|_| {
                let n = rng.random_range(0..=100);
                (n, n)
            })
            .collect();
        group.throughput(Throughput::Elements(size));

        group.bench_with_input(BenchmarkId::new("SkipDict", size), &pairs, |b, pairs| {
            b.iter(|| {
                let mut dict = seeded_dict(1);
                dict.try_extend(pairs.iter().copied()).unwrap();
                black_box(dict.keys())
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &pairs, |b, pairs| {
            b.iter(|| {
                let map: BTreeMap<u64, u64> = pairs.iter().copied().collect();
                black_box(map.keys().copied().collect::<Vec<_>>())
            });
        });
    }
    group.finish();
}

/// --- Mixed Workload Benchmark ---
fn bench_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("Mixed (80% Read, 20% Write)");
    let size = 10_000;
    group.throughput(Throughput::Elements(1_000));

    group.bench_function("SkipDict", |b| {
        let mut dict = setup_dict(size);
        let mut rng = StdRng::seed_from_u64(99);
        b.iter(|| {
            for _ in 0..1_000 {
                let key = rng.random_range(1..size * 2);
                if rng.random_bool(0.8) {
                    let _ = black_box(dict.get(&key));
                } else if rng.random_bool(0.5) {
                    black_box(dict.set(key, key).unwrap());
                } else {
                    let _ = black_box(dict.delete(&key));
                }
            }
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_inserts,
    bench_lookups,
    bench_insert_and_sort,
    bench_mixed
);
criterion_main!(benches);
