//! 路径与最大流算法基准
//!
//! 在 n×n 网格路网上比较各算法，边权为相邻节点间的大圆距离。

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pathflow::{Algorithm, Coordinate, Graph, NodeId, NullSink, PathFinder};
use std::sync::Arc;

/// 网格间距（度）
const STEP: f64 = 0.001;

fn grid(n: u32) -> Arc<Graph> {
    let mut b = Graph::builder();
    let mut ids = Vec::with_capacity((n * n) as usize);
    for row in 0..n {
        for col in 0..n {
            let coord = Coordinate::new(37.9 + row as f64 * STEP, 23.6 + col as f64 * STEP);
            ids.push(b.add_node(format!("{}-{}", row, col), coord));
        }
    }
    let at = |row: u32, col: u32| ids[(row * n + col) as usize];
    for row in 0..n {
        for col in 0..n {
            let here = at(row, col);
            for (r, c) in [(row + 1, col), (row, col + 1)] {
                if r < n && c < n {
                    let there = at(r, c);
                    let (Some(p), Some(q)) = (b.coordinate(here), b.coordinate(there)) else {
                        continue;
                    };
                    b.add_undirected_edge(here, there, p.haversine(&q))
                        .expect("grid edge");
                }
            }
        }
    }
    b.build()
}

fn bench_path_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_search");
    for n in [10u32, 30] {
        let finder = PathFinder::new(grid(n));
        let start = NodeId::new(0);
        let end = NodeId::new(n * n - 1);
        for algorithm in Algorithm::PATH_ALGORITHMS {
            group.bench_with_input(BenchmarkId::new(algorithm.command(), n), &n, |b, _| {
                b.iter(|| {
                    black_box(finder.run(algorithm, start, end, &mut NullSink).expect("run"));
                });
            });
        }
    }
    group.finish();
}

fn bench_max_flow(c: &mut Criterion) {
    let finder = PathFinder::new(grid(10));
    c.bench_function("max_flow_grid_10", |b| {
        b.iter(|| black_box(finder.max_flow(NodeId::new(0), NodeId::new(99), &mut NullSink)));
    });
}

fn bench_batch(c: &mut Criterion) {
    let finder = PathFinder::new(grid(20));
    let queries: Vec<(NodeId, NodeId)> = (0..64).map(|i| (NodeId::new(0), NodeId::new(399 - i))).collect();
    c.bench_function("dijkstra_batch_64", |b| {
        b.iter(|| black_box(finder.run_batch(Algorithm::Dijkstra, &queries)));
    });
}

criterion_group!(benches, bench_path_algorithms, bench_max_flow, bench_batch);
criterion_main!(benches);
