//! 测试用图与暴力求解器

use crate::graph::Graph;
use crate::types::{Coordinate, NodeId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

pub fn named(graph: &Graph, name: &str) -> NodeId {
    graph.lookup(name).expect("fixture node")
}

/// 环 A-B-C-D-A，权重 AB=1, BC=2, CD=1, DA=4（无向）
pub fn cycle4() -> Arc<Graph> {
    let mut b = Graph::builder();
    let a = b.add_node("A", Coordinate::new(0.0, 0.0));
    let bn = b.add_node("B", Coordinate::new(0.0, 0.0));
    let c = b.add_node("C", Coordinate::new(0.0, 0.0));
    let d = b.add_node("D", Coordinate::new(0.0, 0.0));
    b.add_undirected_edge(a, bn, 1.0).unwrap();
    b.add_undirected_edge(bn, c, 2.0).unwrap();
    b.add_undirected_edge(c, d, 1.0).unwrap();
    b.add_undirected_edge(d, a, 4.0).unwrap();
    b.build()
}

pub fn single_node() -> Arc<Graph> {
    let mut b = Graph::builder();
    b.add_node("only", Coordinate::new(0.0, 0.0));
    b.build()
}

/// 随机无向地理图：坐标落在约 1km 见方内，边权 = 大圆距离 × [1, 2)，
/// 因此 haversine 启发式可采纳
pub fn random_graph(seed: u64, nodes: usize, edge_probability: f64) -> Arc<Graph> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut b = Graph::builder();
    let ids: Vec<NodeId> = (0..nodes)
        .map(|i| {
            let coord = Coordinate::new(
                37.94 + rng.gen_range(0.0..0.01),
                23.67 + rng.gen_range(0.0..0.01),
            );
            b.add_node(format!("n{}", i), coord)
        })
        .collect();

    for i in 0..nodes {
        for j in (i + 1)..nodes {
            if rng.gen_bool(edge_probability) {
                let factor: f64 = rng.gen_range(1.0..2.0);
                let weight = geodesic(&b, ids[i], ids[j]) * factor;
                b.add_undirected_edge(ids[i], ids[j], weight.max(1.0)).unwrap();
            }
        }
    }
    b.build()
}

fn geodesic(b: &crate::graph::GraphBuilder, u: NodeId, v: NodeId) -> f64 {
    let a = b.coordinate(u).expect("fixture node");
    let c = b.coordinate(v).expect("fixture node");
    a.haversine(&c)
}

/// 枚举所有简单路径求最短距离
pub fn brute_force_distance(graph: &Graph, start: NodeId, end: NodeId) -> Option<f64> {
    let mut best: Option<f64> = None;
    let mut visited = vec![false; graph.node_count()];
    visited[start.index()] = true;
    walk(graph, start, end, 0.0, 0, &mut visited, &mut |dist: f64, _hops: usize| {
        best = Some(best.map_or(dist, |b: f64| b.min(dist)));
    });
    best
}

/// 枚举所有简单路径求最少边数
pub fn brute_force_hops(graph: &Graph, start: NodeId, end: NodeId) -> Option<usize> {
    let mut best: Option<usize> = None;
    let mut visited = vec![false; graph.node_count()];
    visited[start.index()] = true;
    walk(graph, start, end, 0.0, 0, &mut visited, &mut |_dist: f64, hops: usize| {
        best = Some(best.map_or(hops, |b: usize| b.min(hops)));
    });
    best
}

fn walk(
    graph: &Graph,
    current: NodeId,
    end: NodeId,
    dist: f64,
    hops: usize,
    visited: &mut Vec<bool>,
    found: &mut dyn FnMut(f64, usize),
) {
    if current == end {
        found(dist, hops);
        return;
    }
    for nb in graph.neighbors(current) {
        if visited[nb.node.index()] {
            continue;
        }
        visited[nb.node.index()] = true;
        walk(graph, nb.node, end, dist + nb.weight, hops + 1, visited, found);
        visited[nb.node.index()] = false;
    }
}
