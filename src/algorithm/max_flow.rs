//! 最大流算法
//!
//! 实现 Edmonds-Karp 算法（基于 BFS 的 Ford-Fulkerson）
//! 边容量由容量策略从边权推导，默认按距离反比归一化：越短的路段容量越大

use super::path::{reconstruct, PathFinder};
use super::run::Run;
use crate::error::{Error, Result};
use crate::events::{Event, EventSink};
use crate::graph::Graph;
use crate::types::NodeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet, VecDeque};

/// 饱和判定的相对容差
const SATURATION_TOLERANCE: f64 = 1e-9;

/// 容量策略
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CapacityPolicy {
    /// 按边权线性映射到 [min_capacity, max_capacity]，最短边得到最大容量；
    /// 所有边权相同时统一取 max_capacity
    InverseDistance { min_capacity: f64, max_capacity: f64 },
    /// 直接以边权为容量（负权按 0 处理）
    EdgeWeight,
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        CapacityPolicy::InverseDistance {
            min_capacity: 10.0,
            max_capacity: 100.0,
        }
    }
}

impl CapacityPolicy {
    /// 校验策略参数
    pub fn validate(&self) -> Result<()> {
        match *self {
            CapacityPolicy::InverseDistance {
                min_capacity,
                max_capacity,
            } => {
                if !min_capacity.is_finite() || !max_capacity.is_finite() {
                    return Err(Error::InvalidConfig("容量上下限必须是有限数".to_string()));
                }
                if min_capacity < 0.0 {
                    return Err(Error::InvalidConfig(format!(
                        "min_capacity 不能为负: {}",
                        min_capacity
                    )));
                }
                if min_capacity > max_capacity {
                    return Err(Error::InvalidConfig(format!(
                        "min_capacity ({}) 大于 max_capacity ({})",
                        min_capacity, max_capacity
                    )));
                }
                Ok(())
            }
            CapacityPolicy::EdgeWeight => Ok(()),
        }
    }

    /// 计算每个有序节点对的容量，同一节点对的多条边容量累加
    pub fn capacities(&self, graph: &Graph) -> IndexMap<(NodeId, NodeId), f64> {
        let bounds = graph.weight_bounds();
        let mut capacity = IndexMap::new();
        for (u, v, w) in graph.edges() {
            let cap = match (*self, bounds) {
                (
                    CapacityPolicy::InverseDistance {
                        min_capacity,
                        max_capacity,
                    },
                    Some((lo, hi)),
                ) => {
                    let range = hi - lo;
                    if range == 0.0 {
                        max_capacity
                    } else {
                        min_capacity + (max_capacity - min_capacity) * (1.0 - (w - lo) / range)
                    }
                }
                (CapacityPolicy::InverseDistance { max_capacity, .. }, None) => max_capacity,
                (CapacityPolicy::EdgeWeight, _) => w.max(0.0),
            };
            *capacity.entry((u, v)).or_insert(0.0) += cap;
        }
        capacity
    }
}

/// 最大流结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxFlow {
    /// 最大流量值
    pub value: f64,
    /// 流量分配（边 -> 净正流量）
    #[serde(with = "edge_map")]
    pub flow: HashMap<(NodeId, NodeId), f64>,
    /// 边容量
    #[serde(with = "edge_map")]
    pub capacity: HashMap<(NodeId, NodeId), f64>,
    /// 最小割的源侧顶点集
    pub source_side: HashSet<NodeId>,
    /// 增广路径条数
    pub augmenting_paths: usize,
}

impl MaxFlow {
    fn empty(source: NodeId) -> Self {
        Self {
            value: 0.0,
            flow: HashMap::new(),
            capacity: HashMap::new(),
            source_side: HashSet::from([source]),
            augmenting_paths: 0,
        }
    }

    /// 边上的流量
    pub fn flow_on(&self, from: NodeId, to: NodeId) -> f64 {
        self.flow.get(&(from, to)).copied().unwrap_or(0.0)
    }

    /// 边的容量
    pub fn capacity_of(&self, from: NodeId, to: NodeId) -> f64 {
        self.capacity.get(&(from, to)).copied().unwrap_or(0.0)
    }

    /// 有流量的边，按 (from, to) 排序
    pub fn flow_edges(&self) -> Vec<(NodeId, NodeId, f64)> {
        let mut edges: Vec<_> = self.flow.iter().map(|(&(u, v), &f)| (u, v, f)).collect();
        edges.sort_by_key(|&(u, v, _)| (u, v));
        edges
    }

    /// 饱和边（流量等于容量），即限制流量的瓶颈边
    pub fn saturated_edges(&self) -> Vec<(NodeId, NodeId, f64)> {
        self.flow_edges()
            .into_iter()
            .filter(|&(u, v, f)| {
                let cap = self.capacity_of(u, v);
                (cap - f).abs() <= SATURATION_TOLERANCE * cap.abs().max(1.0)
            })
            .map(|(u, v, _)| (u, v, self.capacity_of(u, v)))
            .collect()
    }

    /// 最小割容量：源侧指向汇侧的边容量之和
    pub fn cut_capacity(&self) -> f64 {
        self.capacity
            .iter()
            .filter(|((u, v), _)| self.source_side.contains(u) && !self.source_side.contains(v))
            .map(|(_, c)| c)
            .sum()
    }
}

/// 以边为键的表在 JSON 中写成按 (from, to) 排序的记录列表
mod edge_map {
    use crate::types::NodeId;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::HashMap;

    #[derive(Serialize, Deserialize)]
    struct EdgeValue {
        from: NodeId,
        to: NodeId,
        value: f64,
    }

    pub fn serialize<S: Serializer>(
        map: &HashMap<(NodeId, NodeId), f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut records: Vec<EdgeValue> = map
            .iter()
            .map(|(&(from, to), &value)| EdgeValue { from, to, value })
            .collect();
        records.sort_by_key(|r| (r.from, r.to));
        records.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<(NodeId, NodeId), f64>, D::Error> {
        let records = Vec::<EdgeValue>::deserialize(deserializer)?;
        Ok(records.into_iter().map(|r| ((r.from, r.to), r.value)).collect())
    }
}

/// 残余网络
struct Residual {
    arcs: HashMap<(NodeId, NodeId), f64>,
    /// 每个节点的残余弧终点，按首次出现顺序
    adjacency: Vec<Vec<NodeId>>,
}

impl Residual {
    fn new(capacity: &IndexMap<(NodeId, NodeId), f64>, node_count: usize) -> Self {
        let mut residual = Self {
            arcs: HashMap::new(),
            adjacency: vec![Vec::new(); node_count],
        };
        for (&(u, v), &cap) in capacity {
            residual.open(u, v, cap);
            // 反向弧初始为 0，除非图中本身有反向边
            residual.open(v, u, 0.0);
        }
        residual
    }

    fn open(&mut self, u: NodeId, v: NodeId, cap: f64) {
        match self.arcs.entry((u, v)) {
            Entry::Occupied(mut e) => *e.get_mut() += cap,
            Entry::Vacant(e) => {
                e.insert(cap);
                self.adjacency[u.index()].push(v);
            }
        }
    }

    fn get(&self, u: NodeId, v: NodeId) -> f64 {
        self.arcs.get(&(u, v)).copied().unwrap_or(0.0)
    }

    fn push(&mut self, u: NodeId, v: NodeId, amount: f64) {
        if let Some(r) = self.arcs.get_mut(&(u, v)) {
            *r -= amount;
        }
        if let Some(r) = self.arcs.get_mut(&(v, u)) {
            *r += amount;
        }
    }

    /// BFS 找增广路径，只走残余容量严格为正的弧
    fn augmenting_path(&self, source: NodeId, sink: NodeId, run: &mut Run<'_>) -> Option<Vec<NodeId>> {
        let mut parent: Vec<Option<NodeId>> = vec![None; self.adjacency.len()];
        let mut visited = vec![false; self.adjacency.len()];
        let mut queue = VecDeque::new();

        visited[source.index()] = true;
        queue.push_back(source);

        'search: while let Some(u) = queue.pop_front() {
            run.visit(u);
            for &v in &self.adjacency[u.index()] {
                if !visited[v.index()] && self.get(u, v) > 0.0 {
                    visited[v.index()] = true;
                    parent[v.index()] = Some(u);
                    queue.push_back(v);
                    if v == sink {
                        break 'search;
                    }
                }
            }
        }

        if !visited[sink.index()] {
            return None;
        }
        reconstruct(&parent, source, sink)
    }

    /// 从源点出发沿正残余容量可达的顶点
    fn reachable_from(&self, source: NodeId) -> HashSet<NodeId> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        visited.insert(source);
        queue.push_back(source);

        while let Some(u) = queue.pop_front() {
            for &v in &self.adjacency[u.index()] {
                if self.get(u, v) > 0.0 && visited.insert(v) {
                    queue.push_back(v);
                }
            }
        }

        visited
    }
}

impl PathFinder {
    /// 计算从 source 到 sink 的最大流
    pub fn max_flow(&self, source: NodeId, sink: NodeId, events: &mut dyn EventSink) -> Result<MaxFlow> {
        self.check_endpoints(source, sink)?;
        let mut run = Run::start("Edmonds-Karp", events, self.config.max_iterations);
        if source == sink {
            tracing::debug!(node = %source, "源点与汇点相同，最大流为 0");
            run.end();
            return Ok(MaxFlow::empty(source));
        }

        let capacity = self.config.capacity_policy.capacities(&self.graph);
        let mut residual = Residual::new(&capacity, self.graph.node_count());
        let mut value = 0.0;
        let mut augmenting_paths = 0;

        // Edmonds-Karp: 重复 BFS 找增广路径
        loop {
            run.tick()?;
            let Some(path) = residual.augmenting_path(source, sink, &mut run) else {
                break;
            };

            let bottleneck = path
                .windows(2)
                .map(|w| residual.get(w[0], w[1]))
                .fold(f64::INFINITY, f64::min);

            for w in path.windows(2) {
                residual.push(w[0], w[1], bottleneck);
            }

            value += bottleneck;
            augmenting_paths += 1;
            tracing::trace!(hops = path.len() - 1, bottleneck, "增广路径");
            run.emit(Event::AugmentingPath {
                nodes: path,
                bottleneck,
            });
        }

        // 只保留净正流量；残余容量非负，因此流量不超过容量
        let flow: HashMap<(NodeId, NodeId), f64> = capacity
            .iter()
            .filter_map(|(&(u, v), &cap)| {
                let f = cap - residual.get(u, v);
                (f > 0.0).then_some(((u, v), f))
            })
            .collect();

        let result = MaxFlow {
            value,
            flow,
            capacity: capacity.into_iter().collect(),
            source_side: residual.reachable_from(source),
            augmenting_paths,
        };

        run.end();
        if augmenting_paths == 0 {
            run.emit(Event::NoPathFound);
        }
        for (from, to, flow) in result.flow_edges() {
            run.emit(Event::EdgeFlow {
                from,
                to,
                flow,
                capacity: result.capacity_of(from, to),
            });
        }

        tracing::debug!(value, augmenting_paths, "最大流计算完成");
        Ok(result)
    }
}
