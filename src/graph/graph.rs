//! 图数据结构
//!
//! 构建完成后只读，可通过 Arc 在多个查询间共享

use super::edge::{EdgeKey, Neighbor};
use super::index::NodeIndex;
use crate::error::{Error, Result};
use crate::types::{Coordinate, NodeId};
use smallvec::SmallVec;
use std::collections::HashSet;
use std::sync::Arc;

/// 单个节点的邻接表（道路网络的度数通常很小）
type Adjacency = SmallVec<[Neighbor; 4]>;

/// 只读图
#[derive(Debug, Clone)]
pub struct Graph {
    /// 节点名索引
    index: NodeIndex,
    /// 节点坐标，按 NodeId 下标
    coords: Vec<Coordinate>,
    /// 出边邻接表
    adjacency: Vec<Adjacency>,
    /// 入边邻接表（build 时生成）
    reverse: Vec<Adjacency>,
    /// 边数（有向邻接条目数）
    edge_count: usize,
    /// 构图方是否声明为有向图
    directed: bool,
}

impl Graph {
    /// 创建构建器
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    // ==================== 节点 ====================

    /// 节点数量
    pub fn node_count(&self) -> usize {
        self.coords.len()
    }

    /// 所有节点 ID（按插入顺序）
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.coords.len() as u32).map(NodeId::new)
    }

    /// 节点是否存在
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.coords.len()
    }

    /// 校验节点存在，否则返回 UnknownNode
    pub fn check_node(&self, id: NodeId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(Error::UnknownNode(id.to_string()))
        }
    }

    /// 获取节点坐标
    pub fn coordinate(&self, id: NodeId) -> Option<Coordinate> {
        self.coords.get(id.index()).copied()
    }

    /// 获取节点外部名称
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.index.name(id)
    }

    /// 节点显示名，缺失时退化为 #id
    pub fn label(&self, id: NodeId) -> String {
        self.name(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    }

    /// 通过外部名称查找节点
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.index.get(name)
    }

    /// 通过外部名称解析节点，不存在时返回 UnknownNode
    pub fn resolve(&self, name: &str) -> Result<NodeId> {
        self.index.resolve(name)
    }

    /// 节点名索引
    pub fn node_index(&self) -> &NodeIndex {
        &self.index
    }

    // ==================== 边 ====================

    /// 边数量（有向邻接条目）
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// 构图方是否声明为有向图
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// 出边邻居
    pub fn neighbors(&self, id: NodeId) -> &[Neighbor] {
        self.adjacency
            .get(id.index())
            .map(|a| a.as_slice())
            .unwrap_or(&[])
    }

    /// 入边邻居（neighbor.node 为边的起点）
    pub fn reverse_neighbors(&self, id: NodeId) -> &[Neighbor] {
        self.reverse
            .get(id.index())
            .map(|a| a.as_slice())
            .unwrap_or(&[])
    }

    /// 出度
    pub fn out_degree(&self, id: NodeId) -> usize {
        self.neighbors(id).len()
    }

    /// 入度
    pub fn in_degree(&self, id: NodeId) -> usize {
        self.reverse_neighbors(id).len()
    }

    /// 遍历所有有向边 (from, to, weight)，按节点顺序与邻接表顺序
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, f64)> + '_ {
        self.nodes().flat_map(move |u| {
            self.neighbors(u)
                .iter()
                .map(move |n| (u, n.node, n.weight))
        })
    }

    /// 两节点间的边权（多重边取最小值）
    pub fn weight(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.neighbors(from)
            .iter()
            .filter(|n| n.node == to)
            .map(|n| n.weight)
            .reduce(f64::min)
    }

    /// 路径总权重，相邻节点间无边时返回 None
    pub fn path_weight(&self, path: &[NodeId]) -> Option<f64> {
        path.windows(2)
            .map(|w| self.weight(w[0], w[1]))
            .sum::<Option<f64>>()
    }

    /// 最小与最大边权
    pub fn weight_bounds(&self) -> Option<(f64, f64)> {
        self.edges().fold(None, |acc, (_, _, w)| match acc {
            None => Some((w, w)),
            Some((lo, hi)) => Some((lo.min(w), hi.max(w))),
        })
    }

    /// 是否存在负权边
    pub fn has_negative_weights(&self) -> bool {
        self.edges().any(|(_, _, w)| w < 0.0)
    }
}

/// 图构建器
#[derive(Debug, Default)]
pub struct GraphBuilder {
    index: NodeIndex,
    coords: Vec<Coordinate>,
    adjacency: Vec<Adjacency>,
    /// 已插入的无向边
    undirected: HashSet<EdgeKey>,
    edge_count: usize,
    directed: bool,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 声明图是否有向（仅作元数据，算法不依赖此标志）
    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// 添加节点；名称已存在时更新坐标并返回原 ID
    pub fn add_node(&mut self, name: impl Into<String>, coord: Coordinate) -> NodeId {
        let (id, inserted) = self.index.intern(name);
        if inserted {
            self.coords.push(coord);
            self.adjacency.push(Adjacency::new());
        } else {
            self.coords[id.index()] = coord;
        }
        id
    }

    /// 按名称查找已添加的节点
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.index.get(name)
    }

    pub fn node_count(&self) -> usize {
        self.coords.len()
    }

    /// 已添加节点的坐标
    pub fn coordinate(&self, id: NodeId) -> Option<Coordinate> {
        self.coords.get(id.index()).copied()
    }

    /// 添加有向边
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: f64) -> Result<()> {
        self.check_edge(from, to, weight)?;
        self.adjacency[from.index()].push(Neighbor::new(to, weight));
        self.edge_count += 1;
        Ok(())
    }

    /// 添加无向边（双向插入），同一节点对只插入一次，返回是否插入
    pub fn add_undirected_edge(&mut self, a: NodeId, b: NodeId, weight: f64) -> Result<bool> {
        // 先校验，失败时不记录该节点对
        self.check_edge(a, b, weight)?;
        if !self.undirected.insert(EdgeKey::new(a, b)) {
            return Ok(false);
        }
        self.add_edge(a, b, weight)?;
        if a != b {
            self.add_edge(b, a, weight)?;
        }
        Ok(true)
    }

    /// 通过节点名添加有向边
    pub fn add_edge_by_name(&mut self, from: &str, to: &str, weight: f64) -> Result<()> {
        let u = self.named_endpoint(from)?;
        let v = self.named_endpoint(to)?;
        self.add_edge(u, v, weight)
    }

    /// 生成只读图，同时构建入边邻接表
    pub fn build(self) -> Arc<Graph> {
        let mut reverse: Vec<Adjacency> = vec![Adjacency::new(); self.coords.len()];
        for (u, list) in self.adjacency.iter().enumerate() {
            for n in list {
                reverse[n.node.index()].push(Neighbor::new(NodeId::new(u as u32), n.weight));
            }
        }

        Arc::new(Graph {
            index: self.index,
            coords: self.coords,
            adjacency: self.adjacency,
            reverse,
            edge_count: self.edge_count,
            directed: self.directed,
        })
    }

    fn check_edge(&self, from: NodeId, to: NodeId, weight: f64) -> Result<()> {
        self.check_endpoint(from)?;
        self.check_endpoint(to)?;
        if !weight.is_finite() {
            return Err(Error::MalformedGraph(format!(
                "边 {} -> {} 的权重不是有限数: {}",
                from, to, weight
            )));
        }
        Ok(())
    }

    fn check_endpoint(&self, id: NodeId) -> Result<()> {
        if id.index() < self.coords.len() {
            Ok(())
        } else {
            Err(Error::MalformedGraph(format!("边引用了不存在的节点 {}", id)))
        }
    }

    fn named_endpoint(&self, name: &str) -> Result<NodeId> {
        self.index
            .get(name)
            .ok_or_else(|| Error::MalformedGraph(format!("边引用了不存在的节点 {}", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Arc<Graph> {
        let mut b = Graph::builder();
        let x = b.add_node("x", Coordinate::new(0.0, 0.0));
        let y = b.add_node("y", Coordinate::new(0.0, 1.0));
        let z = b.add_node("z", Coordinate::new(1.0, 0.0));
        b.add_undirected_edge(x, y, 2.0).unwrap();
        b.add_undirected_edge(y, z, 3.0).unwrap();
        b.add_edge(z, x, 7.0).unwrap();
        b.build()
    }

    #[test]
    fn test_counts_and_lookup() {
        let g = triangle();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 5);
        assert_eq!(g.lookup("y"), Some(NodeId::new(1)));
        assert_eq!(g.name(NodeId::new(2)), Some("z"));
        assert!(matches!(g.resolve("w"), Err(Error::UnknownNode(_))));
    }

    #[test]
    fn test_reverse_adjacency() {
        let g = triangle();
        let x = NodeId::new(0);
        let incoming: Vec<NodeId> = g.reverse_neighbors(x).iter().map(|n| n.node).collect();
        assert_eq!(incoming, vec![NodeId::new(1), NodeId::new(2)]);
        assert_eq!(g.in_degree(x), 2);
        assert_eq!(g.out_degree(x), 1);
    }

    #[test]
    fn test_undirected_edge_dedup() {
        let mut b = Graph::builder();
        let p = b.add_node("p", Coordinate::new(0.0, 0.0));
        let q = b.add_node("q", Coordinate::new(0.0, 0.0));
        assert!(b.add_undirected_edge(p, q, 1.0).unwrap());
        assert!(!b.add_undirected_edge(q, p, 1.0).unwrap());
        assert_eq!(b.build().edge_count(), 2);
    }

    #[test]
    fn test_edge_to_missing_node_is_rejected() {
        let mut b = Graph::builder();
        let p = b.add_node("p", Coordinate::new(0.0, 0.0));
        let err = b.add_edge(p, NodeId::new(9), 1.0).unwrap_err();
        assert!(matches!(err, Error::MalformedGraph(_)));
        let err = b.add_edge_by_name("p", "ghost", 1.0).unwrap_err();
        assert!(matches!(err, Error::MalformedGraph(_)));
    }

    #[test]
    fn test_non_finite_weight_is_rejected() {
        let mut b = Graph::builder();
        let p = b.add_node("p", Coordinate::new(0.0, 0.0));
        let q = b.add_node("q", Coordinate::new(0.0, 0.0));
        for w in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(b.add_edge(p, q, w), Err(Error::MalformedGraph(_))));
            assert!(matches!(b.add_undirected_edge(p, q, w), Err(Error::MalformedGraph(_))));
        }
        assert_eq!(b.build().edge_count(), 0);
    }

    #[test]
    fn test_failed_undirected_edge_can_be_retried() {
        let mut b = Graph::builder();
        let p = b.add_node("p", Coordinate::new(0.0, 0.0));
        let q = b.add_node("q", Coordinate::new(0.0, 0.0));
        assert!(b.add_undirected_edge(p, q, f64::INFINITY).is_err());
        assert!(b.add_undirected_edge(p, q, 3.0).unwrap());

        // r 尚未添加时引用它会失败，添加后同一节点对可以重试
        let r = NodeId::new(2);
        assert!(b.add_undirected_edge(p, r, 1.0).is_err());
        assert_eq!(b.add_node("r", Coordinate::new(0.0, 0.0)), r);
        assert!(b.add_undirected_edge(p, r, 1.0).unwrap());

        let g = b.build();
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.weight(q, p), Some(3.0));
    }

    #[test]
    fn test_weights() {
        let g = triangle();
        let (x, y, z) = (NodeId::new(0), NodeId::new(1), NodeId::new(2));
        assert_eq!(g.weight(x, y), Some(2.0));
        assert_eq!(g.weight(x, z), None);
        assert_eq!(g.path_weight(&[x, y, z]), Some(5.0));
        assert_eq!(g.path_weight(&[x, z]), None);
        assert_eq!(g.weight_bounds(), Some((2.0, 7.0)));
        assert!(!g.has_negative_weights());
    }
}
