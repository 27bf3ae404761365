//! Benchmarks for the triangle oracle, the selection gate and batch commits.
//!
//! 1. **Oracle queries**: `apexes_of` / `is_flippable` over every edge of a grid
//! 2. **Triangle enumeration**: `triangles()` and `is_valid_triangulation()`
//! 3. **Greedy selection**: admitting shuffled grid diagonals one at a time
//! 4. **Batch commit**: planning and applying the admitted selection
//!
//! Grid sizes are square; the number of edges grows as roughly `3 * side^2`.

#![allow(missing_docs)] // Criterion macros generate undocumented functions

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use std::hint::black_box;
use std::sync::OnceLock;
use triflip::prelude::*;

const GRID_SIDES: [usize; 3] = [8, 16, 32];

/// Reads `TRIFLIP_BENCH_SEED` (decimal or 0x-hex). Defaults to 0xF11F.
fn get_benchmark_seed() -> u64 {
    static SEED: OnceLock<u64> = OnceLock::new();
    *SEED.get_or_init(|| {
        std::env::var("TRIFLIP_BENCH_SEED")
            .ok()
            .and_then(|s| {
                let s = s.trim();
                s.strip_prefix("0x")
                    .or_else(|| s.strip_prefix("0X"))
                    .map_or_else(|| s.parse().ok(), |hex| u64::from_str_radix(hex, 16).ok())
            })
            .unwrap_or(0xF11F)
    })
}

fn grid_diagonals(side: usize) -> Vec<EdgeKey> {
    let id = |r: usize, c: usize| (r * side + c + 1) as u64;
    (0..side - 1)
        .flat_map(|r| (0..side - 1).map(move |c| EdgeKey::from((id(r, c), id(r + 1, c + 1)))))
        .collect()
}

fn shuffled_diagonals(side: usize) -> Vec<EdgeKey> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(get_benchmark_seed());
    let mut diagonals = grid_diagonals(side);
    diagonals.shuffle(&mut rng);
    diagonals
}

fn benchmark_oracle(c: &mut Criterion) {
    let mut group = c.benchmark_group("oracle");
    for side in GRID_SIDES {
        let graph = samples::grid(side, side).unwrap();
        let edges = graph.sorted_edges();
        group.throughput(Throughput::Elements(edges.len() as u64));

        group.bench_with_input(BenchmarkId::new("apexes_of", side), &edges, |b, edges| {
            b.iter(|| {
                for edge in edges {
                    black_box(graph.apexes_of(edge.v0(), edge.v1()));
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("is_flippable", side), &edges, |b, edges| {
            b.iter(|| {
                edges
                    .iter()
                    .filter(|edge| graph.is_flippable(edge.v0(), edge.v1()))
                    .count()
            });
        });
        group.bench_function(BenchmarkId::new("triangles", side), |b| {
            b.iter(|| black_box(graph.triangles()));
        });
        group.bench_function(BenchmarkId::new("is_valid_triangulation", side), |b| {
            b.iter(|| black_box(graph.is_valid_triangulation()));
        });
    }
    group.finish();
}

fn benchmark_selection_and_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_flip");
    for side in GRID_SIDES {
        let diagonals = shuffled_diagonals(side);
        group.throughput(Throughput::Elements(diagonals.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("greedy_selection", side),
            &diagonals,
            |b, diagonals| {
                b.iter_batched(
                    || samples::grid(side, side).unwrap(),
                    |mut graph| {
                        for &edge in diagonals {
                            let _ = graph.try_add_to_selection(edge);
                        }
                        black_box(graph.selection().len())
                    },
                    BatchSize::LargeInput,
                );
            },
        );

        group.bench_with_input(
            BenchmarkId::new("commit", side),
            &diagonals,
            |b, diagonals| {
                b.iter_batched(
                    || {
                        let mut graph = samples::grid(side, side).unwrap();
                        for &edge in diagonals {
                            let _ = graph.try_add_to_selection(edge);
                        }
                        graph
                    },
                    |mut graph| black_box(graph.commit_batch_flip().unwrap()),
                    BatchSize::LargeInput,
                );
            },
        );
    }
    group.finish();
}

fn bench_config() -> Criterion {
    use std::time::Duration;
    let mut c = Criterion::default();

    if let Some(v) = std::env::var("CRIT_SAMPLE_SIZE")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
    {
        c = c.sample_size(v);
    }
    if let Some(v) = std::env::var("CRIT_MEASUREMENT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
    {
        c = c.measurement_time(Duration::from_millis(v));
    }
    c
}

criterion_group!(
    name = benches;
    config = bench_config();
    targets = benchmark_oracle, benchmark_selection_and_commit
);
criterion_main!(benches);
