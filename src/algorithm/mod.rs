//! 图算法模块
//!
//! 包含最短路径、无权遍历、A*、双向 Dijkstra 与最大流算法，
//! 以及按算法名分派的统一入口

mod bidirectional;
mod heuristic;
mod max_flow;
mod path;
mod queue;
mod run;
mod shortest_path;
mod traversal;

#[cfg(test)]
mod fixtures;

pub use max_flow::{CapacityPolicy, MaxFlow};
pub use path::{PathFinder, PathResult, SearchOutcome};
pub use queue::MinQueue;
pub use shortest_path::DistanceTable;

use crate::error::{Error, Result};
use crate::events::{EventSink, NullSink};
use crate::types::NodeId;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 可运行的算法
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Dijkstra,
    BellmanFord,
    Bfs,
    Dfs,
    #[value(name = "astar")]
    #[serde(rename = "astar")]
    AStar,
    Bidirectional,
    #[value(name = "maxflow")]
    #[serde(rename = "maxflow")]
    MaxFlow,
}

impl Algorithm {
    /// 全部算法
    pub const ALL: [Algorithm; 7] = [
        Algorithm::Dijkstra,
        Algorithm::BellmanFord,
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::AStar,
        Algorithm::Bidirectional,
        Algorithm::MaxFlow,
    ];

    /// 求路径的算法（不含最大流）
    pub const PATH_ALGORITHMS: [Algorithm; 6] = [
        Algorithm::Dijkstra,
        Algorithm::BellmanFord,
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::AStar,
        Algorithm::Bidirectional,
    ];

    /// 事件中使用的算法名
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "Dijkstra",
            Algorithm::BellmanFord => "Bellman-Ford",
            Algorithm::Bfs => "BFS",
            Algorithm::Dfs => "DFS",
            Algorithm::AStar => "A*",
            Algorithm::Bidirectional => "Bidirectional Dijkstra",
            Algorithm::MaxFlow => "Edmonds-Karp",
        }
    }

    /// 命令行中使用的短名
    pub fn command(&self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::BellmanFord => "bellman-ford",
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::AStar => "astar",
            Algorithm::Bidirectional => "bidirectional",
            Algorithm::MaxFlow => "maxflow",
        }
    }

    /// 是否为求路径的算法
    pub fn is_path_search(&self) -> bool {
        !matches!(self, Algorithm::MaxFlow)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect();
        match normalized.as_str() {
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "bellmanford" | "bf" => Ok(Algorithm::BellmanFord),
            "bfs" => Ok(Algorithm::Bfs),
            "dfs" => Ok(Algorithm::Dfs),
            "astar" | "a*" => Ok(Algorithm::AStar),
            "bidirectional" | "bidirectionaldijkstra" | "bidi" => Ok(Algorithm::Bidirectional),
            "maxflow" | "edmondskarp" | "flow" => Ok(Algorithm::MaxFlow),
            _ => Err(Error::ParseError(format!("未知算法: {}", s))),
        }
    }
}

/// 一次运行的输出
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutput {
    /// 路径算法的结果
    Path(SearchOutcome),
    /// 最大流结果
    Flow(MaxFlow),
}

impl RunOutput {
    pub fn as_path(&self) -> Option<&SearchOutcome> {
        match self {
            RunOutput::Path(outcome) => Some(outcome),
            RunOutput::Flow(_) => None,
        }
    }

    pub fn as_flow(&self) -> Option<&MaxFlow> {
        match self {
            RunOutput::Flow(flow) => Some(flow),
            RunOutput::Path(_) => None,
        }
    }
}

impl PathFinder {
    /// 按算法分派运行
    pub fn run(
        &self,
        algorithm: Algorithm,
        start: NodeId,
        end: NodeId,
        events: &mut dyn EventSink,
    ) -> Result<RunOutput> {
        tracing::debug!(algorithm = algorithm.name(), %start, %end, "开始运行");
        let outcome = match algorithm {
            Algorithm::Dijkstra => self.dijkstra(start, end, events)?,
            Algorithm::BellmanFord => self.bellman_ford(start, end, events)?,
            Algorithm::Bfs => self.bfs(start, end, events)?,
            Algorithm::Dfs => self.dfs(start, end, events)?,
            Algorithm::AStar => self.a_star(start, end, events)?,
            Algorithm::Bidirectional => self.bidirectional_dijkstra(start, end, events)?,
            Algorithm::MaxFlow => return Ok(RunOutput::Flow(self.max_flow(start, end, events)?)),
        };
        Ok(RunOutput::Path(outcome))
    }

    /// 并行执行一批互相独立的查询，每个查询各自持有运行状态
    pub fn run_batch(&self, algorithm: Algorithm, queries: &[(NodeId, NodeId)]) -> Vec<Result<RunOutput>> {
        queries
            .par_iter()
            .map(|&(start, end)| self.run(algorithm, start, end, &mut NullSink))
            .collect()
    }
}
