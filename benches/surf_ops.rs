//! Benchmarks for SuRF build, point lookup and seek against a BTreeSet.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::BTreeSet;
use surf_rs::{uint64_to_key, Config, SuffixType, Surf};

fn generate_sequential_keys(n: usize) -> Vec<Vec<u8>> {
    (0..n).map(|i| format!("key:{:08}", i).into_bytes()).collect()
}

fn generate_url_like_keys(n: usize) -> Vec<Vec<u8>> {
    let domains = ["example.com", "test.org", "demo.net", "sample.io"];
    let paths = ["users", "posts", "comments", "api/v1", "api/v2"];

    let mut keys: Vec<Vec<u8>> = (0..n)
        .map(|i| {
            let domain = domains[i % domains.len()];
            let path = paths[(i / domains.len()) % paths.len()];
            let id = i / (domains.len() * paths.len());
            format!("{}/{}/{}", domain, path, id).into_bytes()
        })
        .collect();
    keys.sort();
    keys.dedup();
    keys
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for size in [1_000, 10_000, 100_000] {
        let keys = generate_sequential_keys(size);

        group.bench_with_input(BenchmarkId::new("Surf", size), &keys, |b, keys| {
            b.iter(|| black_box(Surf::new(keys).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("BTreeSet", size), &keys, |b, keys| {
            b.iter(|| black_box(keys.iter().cloned().collect::<BTreeSet<_>>()));
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [10_000, 100_000] {
        let keys = generate_url_like_keys(size);
        let set: BTreeSet<Vec<u8>> = keys.iter().cloned().collect();

        for suffix in [SuffixType::None, SuffixType::Hash, SuffixType::Real] {
            let surf = Surf::with_config(&keys, Config::default().with_suffix(suffix)).unwrap();
            group.bench_with_input(
                BenchmarkId::new(format!("Surf/{suffix:?}"), size),
                &keys,
                |b, keys| {
                    b.iter(|| {
                        for key in keys {
                            black_box(surf.lookup_key(key));
                        }
                    });
                },
            );
        }

        group.bench_with_input(BenchmarkId::new("BTreeSet", size), &keys, |b, keys| {
            b.iter(|| {
                for key in keys {
                    black_box(set.contains(key));
                }
            });
        });
    }

    group.finish();
}

fn bench_seek(c: &mut Criterion) {
    let mut group = c.benchmark_group("seek");

    let keys: Vec<[u8; 8]> = (0..1_000_000u64).step_by(10).map(uint64_to_key).collect();
    let queries: Vec<[u8; 8]> = (0..10_000u64).map(|i| uint64_to_key(i * 97 + 3)).collect();
    let surf = Surf::new(&keys).unwrap();
    let set: BTreeSet<[u8; 8]> = keys.iter().copied().collect();

    group.bench_function("Surf", |b| {
        b.iter(|| {
            for query in &queries {
                black_box(surf.move_to_key_greater_than(query, true).is_valid());
            }
        });
    });

    group.bench_function("BTreeSet", |b| {
        b.iter(|| {
            for query in &queries {
                black_box(set.range(*query..).next().is_some());
            }
        });
    });

    group.finish();
}

fn bench_memory(c: &mut Criterion) {
    let keys = generate_url_like_keys(100_000);
    let surf = Surf::new(&keys).unwrap();
    let stats = surf.stats();
    println!(
        "surf: {} keys, {} bytes, {:.2} bits/key ({} dense levels of {})",
        stats.num_keys,
        stats.total_bytes(),
        stats.bits_per_key,
        stats.dense_levels,
        stats.height
    );

    c.bench_function("stats", |b| b.iter(|| black_box(surf.stats())));
}

criterion_group!(benches, bench_build, bench_lookup, bench_seek, bench_memory);
criterion_main!(benches);
