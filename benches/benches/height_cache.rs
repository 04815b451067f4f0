// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_height_cache`.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use understory_height_cache::{CategoryCache, RangeSet};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }
}

/// A list where roughly one row in `tall_every` uses a taller height.
fn build_cache(rows: usize, tall_every: u32, seed: u64) -> CategoryCache<u32> {
    let mut rng = Lcg::new(seed);
    let mut cache = CategoryCache::new();
    for row in 0..rows {
        let height = match rng.next_u32() % tall_every {
            0 => 62,
            1 => 42,
            _ => 22,
        };
        cache.put(row, height);
    }
    cache
}

fn bench_range_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_height_cache/range_set");

    for &n in &[1_000_usize, 100_000] {
        group.bench_function(format!("insert_sequential/n={n}"), |b| {
            b.iter(|| {
                let set: RangeSet = (0..n).collect();
                black_box(set.run_count());
            });
        });

        group.bench_function(format!("insert_interleaved/n={n}"), |b| {
            b.iter(|| {
                let mut set = RangeSet::new();
                set.extend((0..n).step_by(2));
                set.extend((1..n).step_by(2));
                black_box(set.run_count());
            });
        });
    }

    group.finish();
}

fn bench_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_height_cache/cache");
    group.sample_size(50);

    for &(rows, tall_every) in &[(10_000_usize, 1_000_u32), (10_000, 20), (100_000, 1_000)] {
        let cache = build_cache(rows, tall_every, 0x5eed);
        let end = cache.total_extent();

        group.bench_function(format!("offset_of/rows={rows}/tall_every={tall_every}"), |b| {
            let mut row = 0;
            b.iter(|| {
                row = (row + 7919) % rows;
                black_box(cache.offset_of(row));
            });
        });

        group.bench_function(
            format!("position_at_offset/rows={rows}/tall_every={tall_every}"),
            |b| {
                let mut offset = 0;
                b.iter(|| {
                    offset = (offset + 104_729) % end;
                    black_box(cache.position_at_offset(offset));
                });
            },
        );

        group.bench_function(format!("truncate/rows={rows}/tall_every={tall_every}"), |b| {
            b.iter_batched(
                || cache.clone(),
                |mut cache| {
                    cache.truncate(rows / 2);
                    black_box(cache.len());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_range_set, bench_cache);
criterion_main!(benches);
