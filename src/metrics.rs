//! 运行统计模块
//!
//! 从事件流中收集单次算法运行的统计数据（算法名、迭代数、耗时等）

use crate::events::{Event, EventSink};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 单次运行的统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// 算法名
    pub algorithm: String,
    /// 主循环迭代次数
    pub iterations: u64,
    /// 访问的节点数
    pub nodes_visited: u64,
    /// 松弛的边数
    pub edges_relaxed: u64,
    /// 增广路径数（最大流）
    pub augmenting_paths: u64,
    /// 最终路径边数
    pub path_edges: u64,
    /// 耗时
    pub elapsed: Duration,
    /// 是否未找到路径
    pub no_path: bool,
    /// 是否检测到负权环
    pub negative_cycle: bool,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 耗时（毫秒）
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// 每毫秒迭代数
    pub fn iterations_per_ms(&self) -> f64 {
        let ms = self.elapsed_ms();
        if ms > 0.0 {
            self.iterations as f64 / ms
        } else {
            0.0
        }
    }

    /// 清空，准备下一次运行
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl EventSink for RunStats {
    fn emit(&mut self, event: Event) {
        match event {
            Event::AlgorithmStarted { name } => {
                self.reset();
                self.algorithm = name.to_string();
            }
            Event::NodeVisited { .. } => self.nodes_visited += 1,
            Event::EdgeRelaxed { .. } => self.edges_relaxed += 1,
            Event::AugmentingPath { .. } => self.augmenting_paths += 1,
            Event::PathEdgeFinalized { .. } => self.path_edges += 1,
            Event::AlgorithmEnded {
                elapsed,
                iterations,
            } => {
                self.elapsed = elapsed;
                self.iterations = iterations;
            }
            Event::NoPathFound => self.no_path = true,
            Event::NegativeCycleDetected => self.negative_cycle = true,
            Event::IterationTick { .. }
            | Event::MeetingNodeFound { .. }
            | Event::EdgeFlow { .. } => {}
        }
    }
}
