//! 单次运行的事件发射与迭代计数

use super::path::SearchOutcome;
use crate::error::{Error, Result};
use crate::events::{Event, EventSink};
use crate::types::NodeId;
use std::time::Instant;

/// 一次算法运行的上下文，负责按固定顺序发出事件
pub(crate) struct Run<'a> {
    name: &'static str,
    sink: &'a mut dyn EventSink,
    started: Instant,
    iterations: u64,
    limit: Option<u64>,
}

impl<'a> Run<'a> {
    /// 开始运行，发出 AlgorithmStarted
    pub fn start(name: &'static str, sink: &'a mut dyn EventSink, limit: Option<u64>) -> Self {
        sink.emit(Event::AlgorithmStarted { name });
        Self {
            name,
            sink,
            started: Instant::now(),
            iterations: 0,
            limit,
        }
    }

    /// 主循环迭代一次；超过迭代上限时中止运行
    pub fn tick(&mut self) -> Result<()> {
        self.iterations += 1;
        if let Some(limit) = self.limit {
            if self.iterations > limit {
                tracing::warn!(algorithm = self.name, limit, "超出迭代上限，运行中止");
                return Err(Error::IterationLimit(limit));
            }
        }
        self.sink.emit(Event::IterationTick {
            iteration: self.iterations,
        });
        Ok(())
    }

    pub fn visit(&mut self, node: NodeId) {
        self.sink.emit(Event::NodeVisited { node });
    }

    pub fn relax(&mut self, from: NodeId, to: NodeId, new_distance: f64) {
        self.sink.emit(Event::EdgeRelaxed {
            from,
            to,
            new_distance,
        });
    }

    pub fn emit(&mut self, event: Event) {
        self.sink.emit(event);
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// 发出 AlgorithmEnded
    pub fn end(&mut self) {
        let elapsed = self.started.elapsed();
        tracing::debug!(
            algorithm = self.name,
            iterations = self.iterations,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "运行结束"
        );
        self.sink.emit(Event::AlgorithmEnded {
            elapsed,
            iterations: self.iterations,
        });
    }

    /// 结束运行并报告结果：路径边、不可达或负权环
    pub fn conclude(mut self, outcome: SearchOutcome) -> SearchOutcome {
        self.end();
        match &outcome {
            SearchOutcome::Found(path) => {
                for (from, to) in path.edges() {
                    self.sink.emit(Event::PathEdgeFinalized { from, to });
                }
            }
            SearchOutcome::NoPath => self.sink.emit(Event::NoPathFound),
            SearchOutcome::NegativeCycle => self.sink.emit(Event::NegativeCycleDetected),
        }
        outcome
    }
}
