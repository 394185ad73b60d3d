//! 单源最短路径：Dijkstra 与 Bellman-Ford
//!
//! 两者共享"松弛 + 前驱链回溯"的结构。Dijkstra 要求边权非负且不做校验；
//! Bellman-Ford 允许负权并检测负权环。

use super::path::{reconstruct, PathFinder, PathResult, SearchOutcome};
use super::queue::MinQueue;
use super::run::Run;
use crate::error::Result;
use crate::events::EventSink;
use crate::types::NodeId;
use serde::{Deserialize, Serialize};

/// 单源最短路径表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceTable {
    source: NodeId,
    /// 到各节点的最短距离，不可达为正无穷
    distances: Vec<f64>,
    /// 最短路径树上的前驱
    predecessors: Vec<Option<NodeId>>,
}

impl DistanceTable {
    fn new(source: NodeId, node_count: usize) -> Self {
        let mut distances = vec![f64::INFINITY; node_count];
        distances[source.index()] = 0.0;
        Self {
            source,
            distances,
            predecessors: vec![None; node_count],
        }
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    /// 到节点的距离，不可达时为 None
    pub fn distance(&self, node: NodeId) -> Option<f64> {
        self.distances
            .get(node.index())
            .copied()
            .filter(|d| d.is_finite())
    }

    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.predecessors.get(node.index()).copied().flatten()
    }

    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.distance(node).is_some()
    }

    /// 从源点到节点的路径
    pub fn path_to(&self, node: NodeId) -> Option<PathResult> {
        let distance = self.distance(node)?;
        let nodes = reconstruct(&self.predecessors, self.source, node)?;
        Some(PathResult::new(nodes, distance))
    }

    /// 所有可达节点及其距离
    pub fn reachable(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.distances
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_finite())
            .map(|(i, d)| (NodeId::new(i as u32), *d))
    }

    fn relax(&mut self, from: NodeId, to: NodeId, weight: f64) -> Option<f64> {
        let alt = self.distances[from.index()] + weight;
        if alt < self.distances[to.index()] {
            self.distances[to.index()] = alt;
            self.predecessors[to.index()] = Some(from);
            Some(alt)
        } else {
            None
        }
    }

    fn outcome(&self, end: NodeId) -> SearchOutcome {
        match self.path_to(end) {
            Some(path) => SearchOutcome::Found(path),
            None => SearchOutcome::NoPath,
        }
    }
}

impl PathFinder {
    /// Dijkstra 最短路径
    pub fn dijkstra(
        &self,
        start: NodeId,
        end: NodeId,
        events: &mut dyn EventSink,
    ) -> Result<SearchOutcome> {
        self.check_endpoints(start, end)?;
        let mut run = Run::start("Dijkstra", events, self.config.max_iterations);
        if start == end {
            return Ok(run.conclude(SearchOutcome::Found(PathResult::trivial(start))));
        }

        let table = self.dijkstra_table(start, Some(end), &mut run)?;
        Ok(run.conclude(table.outcome(end)))
    }

    /// 从 start 出发到所有节点的 Dijkstra 最短距离
    pub fn shortest_distances(
        &self,
        start: NodeId,
        events: &mut dyn EventSink,
    ) -> Result<DistanceTable> {
        self.graph.check_node(start)?;
        let mut run = Run::start("Dijkstra", events, self.config.max_iterations);
        let table = self.dijkstra_table(start, None, &mut run)?;
        run.end();
        Ok(table)
    }

    fn dijkstra_table(
        &self,
        start: NodeId,
        target: Option<NodeId>,
        run: &mut Run<'_>,
    ) -> Result<DistanceTable> {
        let mut table = DistanceTable::new(start, self.graph.node_count());
        let mut settled = vec![false; self.graph.node_count()];
        let mut queue = MinQueue::new();
        queue.insert(start, 0.0);

        while let Some((current, _)) = queue.extract_min() {
            run.tick()?;
            settled[current.index()] = true;
            run.visit(current);

            if Some(current) == target {
                break;
            }

            for nb in self.graph.neighbors(current) {
                // 已确定的节点不再入队，负权输入下也能终止
                if settled[nb.node.index()] {
                    continue;
                }
                if let Some(alt) = table.relax(current, nb.node, nb.weight) {
                    run.relax(current, nb.node, alt);
                    queue.insert(nb.node, alt);
                }
            }
        }

        Ok(table)
    }

    /// Bellman-Ford 最短路径，允许负权边
    pub fn bellman_ford(
        &self,
        start: NodeId,
        end: NodeId,
        events: &mut dyn EventSink,
    ) -> Result<SearchOutcome> {
        self.check_endpoints(start, end)?;
        let mut run = Run::start("Bellman-Ford", events, self.config.max_iterations);
        if start == end {
            return Ok(run.conclude(SearchOutcome::Found(PathResult::trivial(start))));
        }

        let outcome = match self.bellman_ford_table(start, &mut run)? {
            Some(table) => table.outcome(end),
            None => SearchOutcome::NegativeCycle,
        };
        Ok(run.conclude(outcome))
    }

    /// 从 start 出发的 Bellman-Ford 距离表；存在可达负权环时返回 None
    pub fn bellman_ford_distances(
        &self,
        start: NodeId,
        events: &mut dyn EventSink,
    ) -> Result<Option<DistanceTable>> {
        self.graph.check_node(start)?;
        let mut run = Run::start("Bellman-Ford", events, self.config.max_iterations);
        let table = self.bellman_ford_table(start, &mut run)?;
        match table {
            Some(table) => {
                run.end();
                Ok(Some(table))
            }
            None => {
                run.conclude(SearchOutcome::NegativeCycle);
                Ok(None)
            }
        }
    }

    fn bellman_ford_table(&self, start: NodeId, run: &mut Run<'_>) -> Result<Option<DistanceTable>> {
        let node_count = self.graph.node_count();
        let mut table = DistanceTable::new(start, node_count);

        for pass in 1..node_count {
            run.tick()?;
            let mut updated = false;

            for u in self.graph.nodes() {
                if !table.distances[u.index()].is_finite() {
                    continue;
                }
                for nb in self.graph.neighbors(u) {
                    if let Some(alt) = table.relax(u, nb.node, nb.weight) {
                        run.relax(u, nb.node, alt);
                        updated = true;
                    }
                }
            }

            if !updated {
                tracing::trace!(pass, "本轮无更新，提前结束");
                break;
            }
        }

        // 再做一轮检查：仍可松弛说明存在负权环
        let has_cycle = self.graph.edges().any(|(u, v, w)| {
            let du = table.distances[u.index()];
            du.is_finite() && du + w < table.distances[v.index()]
        });
        if has_cycle {
            tracing::debug!(start = %start, "检测到负权环");
            return Ok(None);
        }

        Ok(Some(table))
    }
}
