//! 双向 Dijkstra
//!
//! 正向搜索沿出边从起点扩展，反向搜索沿入边从终点扩展，两侧交替各走一步。
//! 两侧暂定距离之和的最小值记为 best，当两个队首优先级之和不小于 best 时停止。

use super::path::{reconstruct, PathFinder, PathResult, SearchOutcome};
use super::queue::MinQueue;
use super::run::Run;
use crate::error::Result;
use crate::events::{Event, EventSink};
use crate::graph::{Graph, Neighbor};
use crate::types::NodeId;

/// 搜索方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// 单侧搜索状态
struct Side {
    direction: Direction,
    dist: Vec<f64>,
    pred: Vec<Option<NodeId>>,
    processed: Vec<bool>,
    queue: MinQueue<NodeId>,
}

/// 当前最优相遇点
struct Meeting {
    node: Option<NodeId>,
    distance: f64,
}

impl Meeting {
    fn offer(&mut self, node: NodeId, distance: f64, run: &mut Run<'_>) {
        if distance < self.distance {
            self.node = Some(node);
            self.distance = distance;
            run.emit(Event::MeetingNodeFound { node, distance });
        }
    }
}

impl Side {
    fn new(direction: Direction, origin: NodeId, node_count: usize) -> Self {
        let mut dist = vec![f64::INFINITY; node_count];
        dist[origin.index()] = 0.0;
        let mut queue = MinQueue::new();
        queue.insert(origin, 0.0);
        Self {
            direction,
            dist,
            pred: vec![None; node_count],
            processed: vec![false; node_count],
            queue,
        }
    }

    fn adjacent<'g>(&self, graph: &'g Graph, node: NodeId) -> &'g [Neighbor] {
        match self.direction {
            Direction::Forward => graph.neighbors(node),
            Direction::Backward => graph.reverse_neighbors(node),
        }
    }

    /// 扩展一步：取出队首并松弛其邻边
    fn step(&mut self, other: &Side, graph: &Graph, run: &mut Run<'_>, meeting: &mut Meeting) {
        let Some((u, _)) = self.queue.extract_min() else {
            return;
        };
        self.processed[u.index()] = true;
        run.visit(u);

        if other.processed[u.index()] {
            meeting.offer(u, self.dist[u.index()] + other.dist[u.index()], run);
        }

        let du = self.dist[u.index()];
        for nb in self.adjacent(graph, u) {
            let v = nb.node;
            if self.processed[v.index()] {
                continue;
            }
            let candidate = du + nb.weight;
            if candidate < self.dist[v.index()] {
                self.dist[v.index()] = candidate;
                self.pred[v.index()] = Some(u);
                match self.direction {
                    Direction::Forward => run.relax(u, v, candidate),
                    Direction::Backward => run.relax(v, u, candidate),
                }
                self.queue.insert(v, candidate);

                let across = other.dist[v.index()];
                if across.is_finite() {
                    meeting.offer(v, candidate + across, run);
                }
            }
        }
    }
}

impl PathFinder {
    /// 双向 Dijkstra 最短路径（要求边权非负）
    pub fn bidirectional_dijkstra(
        &self,
        start: NodeId,
        end: NodeId,
        events: &mut dyn EventSink,
    ) -> Result<SearchOutcome> {
        self.check_endpoints(start, end)?;
        let mut run = Run::start("Bidirectional Dijkstra", events, self.config.max_iterations);
        if start == end {
            return Ok(run.conclude(SearchOutcome::Found(PathResult::trivial(start))));
        }

        let node_count = self.graph.node_count();
        let mut forward = Side::new(Direction::Forward, start, node_count);
        let mut backward = Side::new(Direction::Backward, end, node_count);
        let mut meeting = Meeting {
            node: None,
            distance: f64::INFINITY,
        };

        while !forward.queue.is_empty() && !backward.queue.is_empty() {
            run.tick()?;
            forward.step(&backward, &self.graph, &mut run, &mut meeting);
            backward.step(&forward, &self.graph, &mut run, &mut meeting);

            let bound = forward.queue.peek_min_priority() + backward.queue.peek_min_priority();
            if meeting.node.is_some() && bound >= meeting.distance {
                tracing::trace!(bound, best = meeting.distance, "双向搜索满足停止条件");
                break;
            }
        }

        let outcome = match meeting.node {
            Some(mid) => match join(&forward, &backward, start, mid, end) {
                Some(nodes) => SearchOutcome::Found(PathResult::new(nodes, meeting.distance)),
                None => SearchOutcome::NoPath,
            },
            None => SearchOutcome::NoPath,
        };
        Ok(run.conclude(outcome))
    }
}

/// 拼接 start -> mid 的正向链与 mid -> end 的反向链
fn join(forward: &Side, backward: &Side, start: NodeId, mid: NodeId, end: NodeId) -> Option<Vec<NodeId>> {
    let mut nodes = reconstruct(&forward.pred, start, mid)?;
    let mut tail = reconstruct(&backward.pred, end, mid)?;
    tail.reverse();
    nodes.extend(tail.into_iter().skip(1));
    Some(nodes)
}
