//! 算法事件与事件接收器
//!
//! 算法在每个关键步骤（访问节点、松弛边、确定路径边）发出事件，
//! 由调用方提供的接收器消费。接收器可以很慢也可以不存在，
//! 事件只发不收，不需要任何确认。

use crate::graph::Graph;
use crate::types::NodeId;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// 算法事件
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// 算法开始
    AlgorithmStarted { name: &'static str },
    /// 主循环迭代一次
    IterationTick { iteration: u64 },
    /// 节点出队并被处理
    NodeVisited { node: NodeId },
    /// 边被松弛（BFS/DFS 中 new_distance 为跳数）
    EdgeRelaxed {
        from: NodeId,
        to: NodeId,
        new_distance: f64,
    },
    /// 双向搜索找到更优的相遇节点
    MeetingNodeFound { node: NodeId, distance: f64 },
    /// 最大流找到一条增广路径
    AugmentingPath { nodes: Vec<NodeId>, bottleneck: f64 },
    /// 最大流结束后每条有流量的边
    EdgeFlow {
        from: NodeId,
        to: NodeId,
        flow: f64,
        capacity: f64,
    },
    /// 最终路径上的一条边
    PathEdgeFinalized { from: NodeId, to: NodeId },
    /// 算法结束
    AlgorithmEnded { elapsed: Duration, iterations: u64 },
    /// 终点不可达
    NoPathFound,
    /// 检测到负权环
    NegativeCycleDetected,
}

impl Event {
    /// 去掉耗时信息，便于比较两次运行的事件序列
    pub fn without_timing(&self) -> Event {
        match self {
            Event::AlgorithmEnded { iterations, .. } => Event::AlgorithmEnded {
                elapsed: Duration::ZERO,
                iterations: *iterations,
            },
            other => other.clone(),
        }
    }
}

/// 事件接收器
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: Event) {
        (**self).emit(event)
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, event: Event) {
        (**self).emit(event)
    }
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

/// 发送到另一线程的消费者；接收端关闭后事件被丢弃
impl EventSink for crossbeam::channel::Sender<Event> {
    fn emit(&mut self, event: Event) {
        let _ = self.send(event);
    }
}

/// 丢弃所有事件
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: Event) {}
}

/// 记录所有事件
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Vec<Event>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// 去掉耗时后的事件序列
    pub fn without_timing(&self) -> Vec<Event> {
        self.events.iter().map(Event::without_timing).collect()
    }

    /// 统计满足条件的事件数
    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: Event) {
        self.events.push(event);
    }
}

/// 闭包接收器
pub struct FnSink<F>(pub F);

impl<F: FnMut(Event)> EventSink for FnSink<F> {
    fn emit(&mut self, event: Event) {
        (self.0)(event)
    }
}

/// 同时转发给两个接收器
pub struct Tee<A, B>(pub A, pub B);

impl<A: EventSink, B: EventSink> EventSink for Tee<A, B> {
    fn emit(&mut self, event: Event) {
        self.0.emit(event.clone());
        self.1.emit(event);
    }
}

/// 通过 tracing 输出的日志接收器
#[derive(Debug, Default, Clone)]
pub struct TracingSink {
    graph: Option<Arc<Graph>>,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用图中的节点名输出日志
    pub fn with_graph(graph: Arc<Graph>) -> Self {
        Self { graph: Some(graph) }
    }

    fn label(&self, node: NodeId) -> String {
        match &self.graph {
            Some(g) => g.label(node),
            None => node.to_string(),
        }
    }
}

impl EventSink for TracingSink {
    fn emit(&mut self, event: Event) {
        match event {
            Event::AlgorithmStarted { name } => tracing::info!(algorithm = name, "算法开始"),
            Event::IterationTick { iteration } => tracing::trace!(iteration, "迭代"),
            Event::NodeVisited { node } => {
                tracing::debug!("访问节点 {}", self.label(node))
            }
            Event::EdgeRelaxed {
                from,
                to,
                new_distance,
            } => tracing::debug!(
                "经 {} 更新 {} 的距离 = {:.1}",
                self.label(from),
                self.label(to),
                new_distance
            ),
            Event::MeetingNodeFound { node, distance } => tracing::debug!(
                "相遇节点 {}，距离 {:.1}",
                self.label(node),
                distance
            ),
            Event::AugmentingPath { nodes, bottleneck } => {
                let path: Vec<String> = nodes.iter().map(|n| self.label(*n)).collect();
                tracing::debug!("增广路径 {}，流量 {:.2}", path.join(" -> "), bottleneck)
            }
            Event::EdgeFlow {
                from,
                to,
                flow,
                capacity,
            } => tracing::debug!(
                "{} -> {}: {:.2}/{:.2}",
                self.label(from),
                self.label(to),
                flow,
                capacity
            ),
            Event::PathEdgeFinalized { from, to } => {
                tracing::debug!("路径边 {} -> {}", self.label(from), self.label(to))
            }
            Event::AlgorithmEnded {
                elapsed,
                iterations,
            } => tracing::info!(
                iterations,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                "算法结束"
            ),
            Event::NoPathFound => tracing::info!("未找到路径"),
            Event::NegativeCycleDetected => tracing::warn!("检测到负权环，无法计算最短路径"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tee_forwards_to_both() {
        let mut a = RecordingSink::new();
        let mut b: Vec<Event> = Vec::new();
        {
            let mut tee = Tee(&mut a, &mut b);
            tee.emit(Event::NoPathFound);
            tee.emit(Event::NodeVisited {
                node: NodeId::new(1),
            });
        }
        assert_eq!(a.events().len(), 2);
        assert_eq!(a.events(), b.as_slice());
    }

    #[test]
    fn test_fn_sink() {
        let mut seen = 0;
        {
            let mut sink = FnSink(|_e: Event| seen += 1);
            sink.emit(Event::NoPathFound);
            sink.emit(Event::NegativeCycleDetected);
        }
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_channel_sink_ignores_closed_receiver() {
        let (mut tx, rx) = crossbeam::channel::unbounded::<Event>();
        tx.emit(Event::NoPathFound);
        assert_eq!(rx.recv().unwrap(), Event::NoPathFound);
        drop(rx);
        tx.emit(Event::NoPathFound);
    }

    #[test]
    fn test_without_timing() {
        let e = Event::AlgorithmEnded {
            elapsed: Duration::from_millis(12),
            iterations: 4,
        };
        assert_eq!(
            e.without_timing(),
            Event::AlgorithmEnded {
                elapsed: Duration::ZERO,
                iterations: 4
            }
        );
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let json = serde_json::to_string(&Event::NodeVisited {
            node: NodeId::new(3),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"node_visited","node":3}"#);
    }
}
