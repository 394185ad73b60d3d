//! 无权遍历：BFS 与 DFS
//!
//! 两者忽略边权，只在前沿的出队顺序上不同。节点在入队（压栈）时即标记为已访问，
//! 避免前沿中出现重复条目；目标节点出队时结束。

use super::path::{reconstruct, PathFinder, PathResult, SearchOutcome};
use super::run::Run;
use crate::error::Result;
use crate::events::{EventSink, NullSink};
use crate::types::NodeId;
use std::collections::{HashSet, VecDeque};

/// 前沿的出队方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frontier {
    /// 先进先出（BFS）
    Fifo,
    /// 后进先出（DFS）
    Lifo,
}

impl PathFinder {
    /// 广度优先搜索，得到边数最少的路径
    pub fn bfs(&self, start: NodeId, end: NodeId, events: &mut dyn EventSink) -> Result<SearchOutcome> {
        self.traverse("BFS", Frontier::Fifo, start, end, events)
    }

    /// 深度优先搜索，只保证找到某一条路径
    pub fn dfs(&self, start: NodeId, end: NodeId, events: &mut dyn EventSink) -> Result<SearchOutcome> {
        self.traverse("DFS", Frontier::Lifo, start, end, events)
    }

    fn traverse(
        &self,
        name: &'static str,
        kind: Frontier,
        start: NodeId,
        end: NodeId,
        events: &mut dyn EventSink,
    ) -> Result<SearchOutcome> {
        self.check_endpoints(start, end)?;
        let mut run = Run::start(name, events, self.config.max_iterations);
        if start == end {
            return Ok(run.conclude(SearchOutcome::Found(PathResult::trivial(start))));
        }

        let node_count = self.graph.node_count();
        let mut visited = vec![false; node_count];
        let mut parent: Vec<Option<NodeId>> = vec![None; node_count];
        let mut depth = vec![0usize; node_count];
        let mut frontier = VecDeque::new();

        visited[start.index()] = true;
        frontier.push_back(start);
        let mut found = false;

        loop {
            let next = match kind {
                Frontier::Fifo => frontier.pop_front(),
                Frontier::Lifo => frontier.pop_back(),
            };
            let Some(current) = next else {
                break;
            };

            run.tick()?;
            run.visit(current);

            if current == end {
                found = true;
                break;
            }

            for nb in self.graph.neighbors(current) {
                let v = nb.node;
                if !visited[v.index()] {
                    visited[v.index()] = true;
                    parent[v.index()] = Some(current);
                    depth[v.index()] = depth[current.index()] + 1;
                    run.relax(current, v, depth[v.index()] as f64);
                    frontier.push_back(v);
                }
            }
        }

        let outcome = if found {
            match reconstruct(&parent, start, end) {
                Some(nodes) => {
                    let distance = self.graph.path_weight(&nodes).unwrap_or(f64::INFINITY);
                    SearchOutcome::Found(PathResult::new(nodes, distance))
                }
                None => SearchOutcome::NoPath,
            }
        } else {
            SearchOutcome::NoPath
        };

        Ok(run.conclude(outcome))
    }

    /// 判断两点是否连通
    pub fn is_reachable(&self, start: NodeId, end: NodeId) -> Result<bool> {
        Ok(self.bfs(start, end, &mut NullSink)?.is_found())
    }

    /// 获取恰好 n 跳可达的邻居
    pub fn n_hop_neighbors(&self, start: NodeId, n: usize) -> Result<HashSet<NodeId>> {
        self.graph.check_node(start)?;

        let mut current_level = HashSet::new();
        current_level.insert(start);

        let mut visited = HashSet::new();
        visited.insert(start);

        for _ in 0..n {
            let mut next_level = HashSet::new();
            for &node in &current_level {
                for nb in self.graph.neighbors(node) {
                    if visited.insert(nb.node) {
                        next_level.insert(nb.node);
                    }
                }
            }
            current_level = next_level;
        }

        Ok(current_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::fixtures::{brute_force_hops, named, random_graph};
    use crate::events::{Event, RecordingSink};
    use crate::graph::Graph;
    use crate::types::Coordinate;
    use std::sync::Arc;

    /// 1 -> 2 -> 3 -> 4
    ///  \-> 5 -> 4
    fn create_test_graph() -> Arc<Graph> {
        let mut b = Graph::builder();
        let ids: Vec<NodeId> = (1..=5)
            .map(|i| b.add_node(i.to_string(), Coordinate::new(0.0, 0.0)))
            .collect();
        let (v1, v2, v3, v4, v5) = (ids[0], ids[1], ids[2], ids[3], ids[4]);
        b.add_edge(v1, v2, 1.0).unwrap();
        b.add_edge(v2, v3, 1.0).unwrap();
        b.add_edge(v3, v4, 1.0).unwrap();
        b.add_edge(v1, v5, 10.0).unwrap();
        b.add_edge(v5, v4, 10.0).unwrap();
        b.build()
    }

    #[test]
    fn test_bfs_minimises_hops_not_weight() {
        let g = create_test_graph();
        let finder = PathFinder::new(g.clone());
        let path = finder
            .bfs(named(&g, "1"), named(&g, "4"), &mut NullSink)
            .unwrap()
            .into_path()
            .unwrap();
        assert_eq!(path.nodes, vec![named(&g, "1"), named(&g, "5"), named(&g, "4")]);
        assert_eq!(path.hops(), 2);
        assert_eq!(path.distance, 20.0);
    }

    #[test]
    fn test_dfs_finds_some_path() {
        let g = create_test_graph();
        let finder = PathFinder::new(g.clone());
        let path = finder
            .dfs(named(&g, "1"), named(&g, "4"), &mut NullSink)
            .unwrap()
            .into_path()
            .unwrap();
        assert_eq!(path.start(), Some(named(&g, "1")));
        assert_eq!(path.end(), Some(named(&g, "4")));
        assert!(g.path_weight(&path.nodes).is_some());
    }

    #[test]
    fn test_dfs_pops_latest_neighbor_first() {
        let g = create_test_graph();
        let finder = PathFinder::new(g.clone());
        let mut sink = RecordingSink::new();
        finder.dfs(named(&g, "1"), named(&g, "4"), &mut sink).unwrap();
        let visits: Vec<NodeId> = sink
            .events()
            .iter()
            .filter_map(|e| match e {
                Event::NodeVisited { node } => Some(*node),
                _ => None,
            })
            .collect();
        // 1 压入 2、5；先弹出 5，再由 5 压入 4
        assert_eq!(visits, vec![named(&g, "1"), named(&g, "5"), named(&g, "4")]);
    }

    #[test]
    fn test_frontier_has_no_duplicates() {
        // z 有两个父节点 x、y，二者同时位于前沿；t 不可达，遍历会走完整个分量
        let mut b = Graph::builder().directed(true);
        for name in ["s", "x", "y", "z", "t"] {
            b.add_node(name, Coordinate::new(0.0, 0.0));
        }
        for (u, v) in [("s", "x"), ("s", "y"), ("x", "z"), ("y", "z")] {
            b.add_edge_by_name(u, v, 1.0).unwrap();
        }
        let g = b.build();
        let finder = PathFinder::new(g.clone());
        let z = named(&g, "z");

        let runs: [fn(&PathFinder, NodeId, NodeId, &mut dyn EventSink) -> Result<SearchOutcome>; 2] =
            [PathFinder::bfs, PathFinder::dfs];
        for run in runs {
            let mut sink = RecordingSink::new();
            let outcome = run(&finder, named(&g, "s"), named(&g, "t"), &mut sink).unwrap();
            assert_eq!(outcome, SearchOutcome::NoPath);

            // 每个节点最多被访问一次，z 只入队一次
            let mut seen = HashSet::new();
            for e in sink.events() {
                if let Event::NodeVisited { node } = e {
                    assert!(seen.insert(*node), "{} visited twice", node);
                }
            }
            assert_eq!(seen.len(), 4);
            assert_eq!(
                sink.count(|e| matches!(e, Event::EdgeRelaxed { to, .. } if *to == z)),
                1
            );
        }
    }

    #[test]
    fn test_traversal_no_path() {
        let mut b = Graph::builder();
        let x = b.add_node("x", Coordinate::new(0.0, 0.0));
        let y = b.add_node("y", Coordinate::new(0.0, 0.0));
        let finder = PathFinder::new(b.build());

        let runs: [fn(&PathFinder, NodeId, NodeId, &mut dyn EventSink) -> Result<SearchOutcome>; 2] =
            [PathFinder::bfs, PathFinder::dfs];
        for run in runs {
            let mut sink = RecordingSink::new();
            let outcome = run(&finder, x, y, &mut sink).unwrap();
            assert_eq!(outcome, SearchOutcome::NoPath);
            assert_eq!(sink.events().last(), Some(&Event::NoPathFound));
        }
        assert!(!finder.is_reachable(x, y).unwrap());
    }

    #[test]
    fn test_bfs_matches_brute_force_hops() {
        for seed in 0..20 {
            let g = random_graph(seed, 7, 0.35);
            let finder = PathFinder::new(g.clone());
            let start = NodeId::new(0);
            for end in g.nodes() {
                let expected = brute_force_hops(&g, start, end);
                let got = finder
                    .bfs(start, end, &mut NullSink)
                    .unwrap()
                    .path()
                    .map(|p| p.hops());
                assert_eq!(got, expected, "seed {} end {}", seed, end);
            }
        }
    }

    #[test]
    fn test_n_hop_neighbors() {
        let g = create_test_graph();
        let finder = PathFinder::new(g.clone());

        let one_hop = finder.n_hop_neighbors(named(&g, "1"), 1).unwrap();
        assert_eq!(one_hop.len(), 2); // 2 和 5

        let two_hop = finder.n_hop_neighbors(named(&g, "1"), 2).unwrap();
        assert_eq!(two_hop.len(), 2); // 3 和 4
    }
}
