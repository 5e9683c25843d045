//! Benchmark for TreeMap vs standard BTreeMap.
//!
//! Covers the core map operations plus the order statistics and
//! copy-on-write paths that BTreeMap has no direct counterpart for.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use llrb_treemap::tree::TreeMap;
use std::collections::BTreeMap;
use std::hint::black_box;

const SIZES: [i64; 3] = [100, 1000, 10000];

/// Keys in a scattered but deterministic order.
fn scattered(size: i64) -> impl Iterator<Item = i64> {
    (0..size).map(move |index| (index * 7919) % size)
}

fn build_tree_map(size: i64) -> TreeMap<i64, i64> {
    scattered(size).map(|key| (key, key * 2)).collect()
}

fn build_btree_map(size: i64) -> BTreeMap<i64, i64> {
    scattered(size).map(|key| (key, key * 2)).collect()
}

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for size in SIZES {
        group.bench_with_input(BenchmarkId::new("TreeMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut map = TreeMap::new();
                for key in scattered(size) {
                    map.insert(black_box(key), black_box(key * 2));
                }
                black_box(map)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut map = BTreeMap::new();
                for key in scattered(size) {
                    map.insert(black_box(key), black_box(key * 2));
                }
                black_box(map)
            });
        });
    }

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in SIZES {
        let tree_map = build_tree_map(size);
        let btree_map = build_btree_map(size);

        group.bench_with_input(BenchmarkId::new("TreeMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                for key in 0..size {
                    black_box(tree_map.get(black_box(&key)));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                for key in 0..size {
                    black_box(btree_map.get(black_box(&key)));
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// remove Benchmark
// =============================================================================

fn benchmark_remove(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("remove");

    for size in SIZES {
        let tree_map = build_tree_map(size);
        let btree_map = build_btree_map(size);

        group.bench_with_input(BenchmarkId::new("TreeMap", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || tree_map.duplicate_with(|key| *key, |value| *value),
                |mut map| {
                    for key in 0..size {
                        black_box(map.remove(&key));
                    }
                    map
                },
                criterion::BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || btree_map.clone(),
                |mut map| {
                    for key in 0..size {
                        black_box(map.remove(&key));
                    }
                    map
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// Order Statistics Benchmark
// =============================================================================

fn benchmark_order_statistics(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("order_statistics");

    for size in SIZES {
        let tree_map = build_tree_map(size);
        let btree_map = build_btree_map(size);
        let half = usize::try_from(size / 2).unwrap_or(0);

        group.bench_with_input(BenchmarkId::new("TreeMap::select", size), &size, |bencher, _| {
            bencher.iter(|| black_box(tree_map.select(black_box(half))));
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap::nth", size), &size, |bencher, _| {
            bencher.iter(|| black_box(btree_map.iter().nth(black_box(half))));
        });

        group.bench_with_input(BenchmarkId::new("TreeMap::rank", size), &size, |bencher, &size| {
            bencher.iter(|| black_box(tree_map.rank(black_box(&(size / 2)))));
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap::range_count", size), &size, |bencher, &size| {
            bencher.iter(|| black_box(btree_map.range(..black_box(size / 2)).count()));
        });
    }

    group.finish();
}

// =============================================================================
// Iteration Benchmark
// =============================================================================

fn benchmark_iteration(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("iteration");

    for size in SIZES {
        let tree_map = build_tree_map(size);
        let btree_map = build_btree_map(size);

        group.bench_with_input(BenchmarkId::new("TreeMap", size), &size, |bencher, _| {
            bencher.iter(|| black_box(tree_map.iter().map(|(_, value)| *value).sum::<i64>()));
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, _| {
            bencher.iter(|| black_box(btree_map.iter().map(|(_, value)| *value).sum::<i64>()));
        });
    }

    group.finish();
}

// =============================================================================
// Copy-on-Write Benchmark
// =============================================================================

fn benchmark_write_after_clone(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("write_after_clone");

    for size in SIZES {
        let tree_map = build_tree_map(size);
        let btree_map = build_btree_map(size);

        group.bench_with_input(BenchmarkId::new("TreeMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut copy = tree_map.clone();
                copy.insert(black_box(size), 0);
                black_box(copy)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut copy = btree_map.clone();
                copy.insert(black_box(size), 0);
                black_box(copy)
            });
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Group and Main
// =============================================================================

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_get,
    benchmark_remove,
    benchmark_order_statistics,
    benchmark_iteration,
    benchmark_write_after_clone
);

criterion_main!(benches);
