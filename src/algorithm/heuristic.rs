//! A* 启发式搜索
//!
//! 前沿按 f = g + h 排序，h 为到终点的大圆距离。
//! 只有当每条边的权重不小于其两端点的大圆距离时启发式才可采纳，
//! 这一点由构图方保证，这里不做校验。

use super::path::{reconstruct, PathFinder, PathResult, SearchOutcome};
use super::queue::MinQueue;
use super::run::Run;
use crate::error::Result;
use crate::events::EventSink;
use crate::types::NodeId;

impl PathFinder {
    /// A* 最短路径，使用 haversine 距离作为启发式
    pub fn a_star(&self, start: NodeId, end: NodeId, events: &mut dyn EventSink) -> Result<SearchOutcome> {
        let goal = self.graph.coordinate(end);
        let graph = &self.graph;
        let heuristic = |node: NodeId| match (graph.coordinate(node), goal) {
            (Some(c), Some(g)) => c.haversine(&g),
            _ => f64::INFINITY,
        };
        self.a_star_with(start, end, &heuristic, events)
    }

    /// 使用自定义启发式的 A*；启发式恒为 0 时等价于 Dijkstra
    pub fn a_star_with(
        &self,
        start: NodeId,
        end: NodeId,
        heuristic: &dyn Fn(NodeId) -> f64,
        events: &mut dyn EventSink,
    ) -> Result<SearchOutcome> {
        self.check_endpoints(start, end)?;
        let mut run = Run::start("A*", events, self.config.max_iterations);
        if start == end {
            return Ok(run.conclude(SearchOutcome::Found(PathResult::trivial(start))));
        }

        let node_count = self.graph.node_count();
        let mut g_score = vec![f64::INFINITY; node_count];
        let mut came_from: Vec<Option<NodeId>> = vec![None; node_count];
        let mut open = MinQueue::new();

        g_score[start.index()] = 0.0;
        open.insert(start, heuristic(start));

        while let Some((current, f_score)) = open.extract_min() {
            run.tick()?;
            run.visit(current);
            tracing::trace!(node = %current, f_score, "A* 出队");

            if current == end {
                let outcome = match reconstruct(&came_from, start, end) {
                    Some(nodes) => SearchOutcome::Found(PathResult::new(nodes, g_score[end.index()])),
                    None => SearchOutcome::NoPath,
                };
                return Ok(run.conclude(outcome));
            }

            let current_g = g_score[current.index()];
            for nb in self.graph.neighbors(current) {
                let v = nb.node;
                let tentative_g = current_g + nb.weight;
                if tentative_g < g_score[v.index()] {
                    came_from[v.index()] = Some(current);
                    g_score[v.index()] = tentative_g;
                    run.relax(current, v, tentative_g);
                    // 已出队的节点在找到更优 g 时会重新打开
                    open.insert(v, tentative_g + heuristic(v));
                }
            }
        }

        Ok(run.conclude(SearchOutcome::NoPath))
    }
}
