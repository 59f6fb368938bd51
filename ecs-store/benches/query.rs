// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Benchmarks for group queries
//!
//! These benchmarks measure:
//! - The one-time cost of seeding a group by full scan
//! - Cached query throughput once the group exists
//! - Tag query throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ecs_store::ecs::components::{Position, Velocity};
use ecs_store::{EntityManager, ManagerConfig};

fn populated(entity_count: usize) -> EntityManager {
    let mut manager = EntityManager::with_config(ManagerConfig::new(entity_count));
    for i in 0..entity_count {
        let e = manager.create_entity();
        manager.add_component::<Position>(e).unwrap();
        if i % 2 == 0 {
            manager.add_component::<Velocity>(e).unwrap();
        }
        if i % 10 == 0 {
            manager.add_tag(e, "enemy").unwrap();
        }
    }
    manager
}

/// Benchmark: first query of a component set (full scan)
fn bench_group_seed(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_seed");

    for entity_count in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*entity_count as u64));
        group.bench_with_input(
            BenchmarkId::new("scan", entity_count),
            entity_count,
            |b, &count| {
                b.iter_batched(
                    || populated(count),
                    |mut manager| {
                        black_box(manager.query::<(Position, Velocity)>().unwrap().len());
                    },
                    criterion::BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

/// Benchmark: repeated query of an already cached set
fn bench_cached_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_query");

    for entity_count in [100, 1000, 10000].iter() {
        let mut manager = populated(*entity_count);
        manager.query::<(Position, Velocity)>().unwrap();

        group.bench_with_input(
            BenchmarkId::new("components", entity_count),
            entity_count,
            |b, _| {
                b.iter(|| black_box(manager.query::<(Velocity, Position)>().unwrap().len()));
            },
        );

        group.bench_with_input(BenchmarkId::new("tag", entity_count), entity_count, |b, _| {
            b.iter(|| black_box(manager.query_tag("enemy").len()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_group_seed, bench_cached_query);
criterion_main!(benches);
