//! 路径结果与路径查找器

use crate::config::EngineConfig;
use crate::error::Result;
use crate::graph::Graph;
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 路径结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    /// 路径上的节点序列（含起点和终点）
    pub nodes: Vec<NodeId>,
    /// 路径总权重
    pub distance: f64,
}

impl PathResult {
    pub fn new(nodes: Vec<NodeId>, distance: f64) -> Self {
        Self { nodes, distance }
    }

    /// 只包含起点的零长度路径
    pub fn trivial(start: NodeId) -> Self {
        Self::new(vec![start], 0.0)
    }

    /// 边数
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// 路径上的边 (from, to)
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn start(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn end(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }
}

/// 路径搜索的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchOutcome {
    /// 找到路径
    Found(PathResult),
    /// 终点不可达
    NoPath,
    /// 存在负权环（仅 Bellman-Ford）
    NegativeCycle,
}

impl SearchOutcome {
    pub fn path(&self) -> Option<&PathResult> {
        match self {
            SearchOutcome::Found(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<PathResult> {
        match self {
            SearchOutcome::Found(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    pub fn distance(&self) -> Option<f64> {
        self.path().map(|p| p.distance)
    }
}

/// 沿前驱链从终点回溯到起点；链断开或成环时返回 None
pub(crate) fn reconstruct(
    predecessors: &[Option<NodeId>],
    start: NodeId,
    end: NodeId,
) -> Option<Vec<NodeId>> {
    let mut path = vec![end];
    let mut current = end;

    while current != start {
        // 前驱链长度不可能超过节点数
        if path.len() > predecessors.len() {
            return None;
        }
        current = predecessors.get(current.index()).copied().flatten()?;
        path.push(current);
    }

    path.reverse();
    Some(path)
}

/// 路径查找器
///
/// 持有只读图与引擎配置；每次调用各自创建运行状态，
/// 因此同一个查找器可以在多个线程上并发查询。
#[derive(Debug, Clone)]
pub struct PathFinder {
    pub(crate) graph: Arc<Graph>,
    pub(crate) config: EngineConfig,
}

impl PathFinder {
    /// 创建路径查找器
    pub fn new(graph: Arc<Graph>) -> Self {
        Self::with_config(graph, EngineConfig::default())
    }

    /// 使用指定配置创建
    pub fn with_config(graph: Arc<Graph>, config: EngineConfig) -> Self {
        Self { graph, config }
    }

    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 校验查询端点都在图中
    pub(crate) fn check_endpoints(&self, start: NodeId, end: NodeId) -> Result<()> {
        self.graph.check_node(start)?;
        self.graph.check_node(end)
    }
}
