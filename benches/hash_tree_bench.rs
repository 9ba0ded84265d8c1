//! Benchmark for HashTree vs standard BTreeMap.
//!
//! A single hash tree is the bucket type of the table; these benchmarks
//! measure it directly, including the cost of heavy collision chains.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use imhash::persistent::HashTree;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::hint::black_box;

/// A key that hashes to one of a few codes, forcing long collision chains.
#[derive(Clone, PartialEq, Eq)]
struct Colliding(u32);

impl Hash for Colliding {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.0 % 8).hash(state);
    }
}

// =============================================================================
// add Benchmark
// =============================================================================

fn benchmark_add(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("tree_add");

    for size in [1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("HashTree", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut tree = HashTree::new();
                for index in 0..size {
                    tree = tree.add(black_box(index), black_box(index));
                }
                black_box(tree)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut map = BTreeMap::new();
                for index in 0..size {
                    map.insert(black_box(index), black_box(index));
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
    let mut group = criterion.benchmark_group("tree_get");

    for size in [100, 1_000, 10_000] {
        let tree: HashTree<u32, u32> = (0..size).map(|index| (index, index)).collect();
        let standard_map: BTreeMap<u32, u32> = (0..size).map(|index| (index, index)).collect();

        group.bench_with_input(BenchmarkId::new("HashTree", size), &size, |bencher, &size| {
            bencher.iter(|| {
                for index in 0..size {
                    black_box(tree.get(&black_box(index)));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                for index in 0..size {
                    black_box(standard_map.get(&black_box(index)));
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// collision Benchmark
// =============================================================================

fn benchmark_collisions(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("tree_collisions");

    for size in [64, 256, 1_024] {
        let tree: HashTree<Colliding, u32> =
            (0..size).map(|index| (Colliding(index), index)).collect();

        group.bench_with_input(BenchmarkId::new("get_last", size), &size, |bencher, &size| {
            let last = Colliding(size - 1);
            bencher.iter(|| black_box(tree.get(black_box(&last))));
        });

        group.bench_with_input(BenchmarkId::new("iterate", size), &size, |bencher, _| {
            bencher.iter(|| black_box(tree.iter().count()));
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Group and Main
// =============================================================================

criterion_group!(benches, benchmark_add, benchmark_get, benchmark_collisions);

criterion_main!(benches);
