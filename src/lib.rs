//! pathflow - 路网图上的路径与流量算法引擎
//!
//! 在只读的地理路网图上运行：
//! - 最短路径（Dijkstra、Bellman-Ford、A*、双向 Dijkstra）
//! - 无权遍历（BFS、DFS）
//! - 最大流（Edmonds-Karp）
//!
//! 每个算法在关键步骤发出事件，由调用方提供的接收器消费。

pub mod algorithm;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod graph;
pub mod import;
pub mod metrics;
pub mod types;

// 重导出常用类型
pub use algorithm::{
    Algorithm, CapacityPolicy, DistanceTable, MaxFlow, MinQueue, PathFinder, PathResult,
    RunOutput, SearchOutcome,
};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use events::{Event, EventSink, NullSink, RecordingSink, TracingSink};
pub use graph::{Graph, GraphBuilder, Neighbor};
pub use metrics::RunStats;
pub use types::{Coordinate, NodeId};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
