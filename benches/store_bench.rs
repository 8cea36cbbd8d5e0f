//! Benchmarks for the waitlist store
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;
use stellar_forge::store::*;
use tempfile::tempdir;

fn seed(count: usize) -> Vec<NewEntry> {
    (0..count)
        .map(|i| {
            NewEntry::new(
                format!("Pilot {}", i),
                format!("pilot{}@example.com", i),
                "Love space sims",
            )
        })
        .collect()
}

fn bench_writes(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("writes");

    group.bench_function("create_in_memory", |b| {
        b.iter_custom(|iters| {
            rt.block_on(async {
                let store = WaitlistStore::open_in_memory().unwrap();
                let entries = seed(iters as usize);

                let start = std::time::Instant::now();
                for entry in entries {
                    store.create(black_box(entry)).await.unwrap();
                }
                start.elapsed()
            })
        });
    });

    group.bench_function("create_on_disk", |b| {
        b.iter_custom(|iters| {
            rt.block_on(async {
                let dir = tempdir().unwrap();
                let store = WaitlistStore::open(&StoreConfig::new(dir.path())).unwrap();
                let entries = seed(iters as usize);

                let start = std::time::Instant::now();
                for entry in entries {
                    store.create(black_box(entry)).await.unwrap();
                }
                start.elapsed()
            })
        });
    });

    group.bench_function("mark_ready", |b| {
        b.iter_custom(|iters| {
            rt.block_on(async {
                let store = WaitlistStore::open_in_memory().unwrap();
                let mut ids = Vec::with_capacity(iters as usize);
                for entry in seed(iters as usize) {
                    ids.push(store.create(entry).await.unwrap().id);
                }

                let start = std::time::Instant::now();
                for id in &ids {
                    store.mark_ready(black_box(id)).await.unwrap();
                }
                start.elapsed()
            })
        });
    });

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("queries");

    for size in [100, 1000] {
        let store = rt.block_on(async {
            let store = WaitlistStore::open_in_memory().unwrap();
            for entry in seed(size) {
                store.create(entry).await.unwrap();
            }
            Arc::new(store)
        });

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("list_{}", size), |b| {
            b.iter(|| rt.block_on(store.list()).unwrap())
        });

        group.bench_function(format!("correlated_{}", size), |b| {
            b.iter(|| {
                rt.block_on(store.correlated(black_box("pilot42@example.com")))
                    .unwrap()
            })
        });

        group.bench_function(format!("watch_all_snapshot_{}", size), |b| {
            b.iter(|| {
                rt.block_on(async {
                    let mut sub = store.watch(LiveQuery::All);
                    sub.next().await.unwrap().unwrap()
                })
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_writes, bench_queries);
criterion_main!(benches);
