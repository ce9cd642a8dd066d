//! Benchmark for HashTrieMap vs standard HashMap.
//!
//! Compares the performance of the persistent HashTrieMap against Rust's
//! standard HashMap for common operations.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hash_trie_map::HashTrieMap;
use std::collections::HashMap;
use std::hint::black_box;

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for size in [1_000, 10_000, 100_000] {
        // HashTrieMap insert
        group.bench_with_input(
            BenchmarkId::new("HashTrieMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = HashTrieMap::new();
                    for index in 0..size {
                        map = map.insert(black_box(index), black_box(index * 2));
                    }
                    black_box(map)
                });
            },
        );

        // Standard HashMap insert
        group.bench_with_input(
            BenchmarkId::new("HashMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = HashMap::new();
                    for index in 0..size {
                        map.insert(black_box(index), black_box(index * 2));
                    }
                    black_box(map)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in [1_000, 10_000, 100_000] {
        let trie_map: HashTrieMap<i64, i64> = (0..size).map(|index| (index, index * 2)).collect();
        let hash_map: HashMap<i64, i64> = (0..size).map(|index| (index, index * 2)).collect();

        group.bench_with_input(
            BenchmarkId::new("HashTrieMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    for index in 0..size {
                        black_box(trie_map.get(black_box(&index)));
                    }
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("HashMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    for index in 0..size {
                        black_box(hash_map.get(black_box(&index)));
                    }
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// remove Benchmark
// =============================================================================

fn benchmark_remove(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("remove");

    for size in [1_000, 10_000] {
        let trie_map: HashTrieMap<i64, i64> = (0..size).map(|index| (index, index * 2)).collect();

        group.bench_with_input(
            BenchmarkId::new("HashTrieMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = trie_map.clone();
                    for index in 0..size {
                        map = map.discard(black_box(&index));
                    }
                    black_box(map)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// iterate Benchmark
// =============================================================================

fn benchmark_iterate(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("iterate");

    for size in [1_000, 10_000, 100_000] {
        let trie_map: HashTrieMap<i64, i64> = (0..size).map(|index| (index, index * 2)).collect();
        let hash_map: HashMap<i64, i64> = (0..size).map(|index| (index, index * 2)).collect();

        group.bench_with_input(BenchmarkId::new("HashTrieMap", size), &size, |bencher, _| {
            bencher.iter(|| {
                let sum: i64 = trie_map.values().sum();
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("HashMap", size), &size, |bencher, _| {
            bencher.iter(|| {
                let sum: i64 = hash_map.values().sum();
                black_box(sum)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_get,
    benchmark_remove,
    benchmark_iterate
);
criterion_main!(benches);
