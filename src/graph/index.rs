//! 节点名索引
//!
//! 外部字符串 ID（如 OSM 节点号）与内部 NodeId 的双向映射

use crate::error::{Error, Result};
use crate::types::NodeId;
use indexmap::IndexSet;

/// 节点名索引，插入顺序即 NodeId 顺序
#[derive(Debug, Clone, Default)]
pub struct NodeIndex {
    names: IndexSet<String>,
}

impl NodeIndex {
    /// 创建新索引
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记节点名，已存在时返回原有 ID
    pub fn intern(&mut self, name: impl Into<String>) -> (NodeId, bool) {
        let (idx, inserted) = self.names.insert_full(name.into());
        (NodeId::new(idx as u32), inserted)
    }

    /// 通过名称查找节点
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.names.get_index_of(name).map(|i| NodeId::new(i as u32))
    }

    /// 通过名称查找节点，不存在时返回 UnknownNode
    pub fn resolve(&self, name: &str) -> Result<NodeId> {
        self.get(name)
            .ok_or_else(|| Error::UnknownNode(name.to_string()))
    }

    /// 获取节点名
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.names.get_index(id.index()).map(String::as_str)
    }

    /// 按 ID 顺序遍历所有节点名
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_idempotent() {
        let mut index = NodeIndex::new();
        let (a, inserted) = index.intern("250691723");
        assert!(inserted);
        let (again, inserted) = index.intern("250691723");
        assert!(!inserted);
        assert_eq!(a, again);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_resolve_unknown() {
        let mut index = NodeIndex::new();
        index.intern("a");
        index.intern("b");
        assert_eq!(index.resolve("b").unwrap(), NodeId::new(1));
        assert_eq!(index.name(NodeId::new(0)), Some("a"));
        assert!(matches!(index.resolve("zz"), Err(Error::UnknownNode(_))));
    }
}
