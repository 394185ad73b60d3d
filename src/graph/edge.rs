//! 边定义
//!
//! 邻接表条目与无向边的规范键

use crate::types::NodeId;
use serde::{Deserialize, Serialize};

/// 邻接表条目：目标节点与边权
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// 目标节点
    pub node: NodeId,
    /// 边权（通常为米）
    pub weight: f64,
}

impl Neighbor {
    pub fn new(node: NodeId, weight: f64) -> Self {
        Self { node, weight }
    }
}

/// 无序节点对的规范键 (小, 大)，用于无向边去重
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey(NodeId, NodeId);

impl EdgeKey {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_key_is_unordered() {
        let a = NodeId::new(4);
        let b = NodeId::new(1);
        assert_eq!(EdgeKey::new(a, b), EdgeKey::new(b, a));
        assert_eq!(EdgeKey::new(a, b).endpoints(), (b, a));
    }
}
