//! 图核心模块
//!
//! 定义节点、邻接表和只读图结构

mod edge;
mod graph;
mod index;

pub use edge::{EdgeKey, Neighbor};
pub use graph::{Graph, GraphBuilder};
pub use index::NodeIndex;
