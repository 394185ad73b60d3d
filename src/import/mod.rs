//! 数据导入模块
//!
//! 读写 JSON 格式的路网图：
//!
//! ```json
//! {
//!   "nodes": { "<id>": [lat, lon], ... },
//!   "edges": { "<id>": [{ "node": "<id>", "weight": 12.5 }, ...], ... },
//!   "is_directed": false
//! }
//! ```
//!
//! 节点按文档中的出现顺序分配 NodeId；边列表已经是有向邻接表，
//! 无向图的两个方向都应当出现在文件中。

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::types::Coordinate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// 导入统计
#[derive(Debug, Default, Clone)]
pub struct ImportStats {
    pub nodes_imported: usize,
    pub edges_imported: usize,
    pub duration_ms: u64,
}

/// 图文件的顶层结构
#[derive(Debug, Serialize, Deserialize)]
struct GraphDocument {
    nodes: IndexMap<String, [f64; 2]>,
    #[serde(default)]
    edges: IndexMap<String, Vec<EdgeRecord>>,
    #[serde(default)]
    is_directed: bool,
}

/// 邻接表中的一条记录
#[derive(Debug, Serialize, Deserialize)]
struct EdgeRecord {
    node: NodeRef,
    weight: f64,
}

/// 节点引用，兼容字符串与数字两种写法
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum NodeRef {
    Name(String),
    Number(u64),
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Name(name) => f.write_str(name),
            NodeRef::Number(n) => write!(f, "{}", n),
        }
    }
}

/// 从文件加载图
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Arc<Graph>> {
    load_json_with_stats(path).map(|(graph, _)| graph)
}

/// 从文件加载图并返回导入统计
pub fn load_json_with_stats<P: AsRef<Path>>(path: P) -> Result<(Arc<Graph>, ImportStats)> {
    let start = Instant::now();
    let content = std::fs::read_to_string(path.as_ref())?;
    let graph = from_json_str(&content)?;
    let stats = ImportStats {
        nodes_imported: graph.node_count(),
        edges_imported: graph.edge_count(),
        duration_ms: start.elapsed().as_millis() as u64,
    };
    tracing::info!(
        path = %path.as_ref().display(),
        nodes = stats.nodes_imported,
        edges = stats.edges_imported,
        "图加载完成"
    );
    Ok((graph, stats))
}

/// 从 JSON 字符串解析图
pub fn from_json_str(s: &str) -> Result<Arc<Graph>> {
    let document: GraphDocument = serde_json::from_str(s)?;
    build_graph(document)
}

/// 将图写回 JSON
pub fn to_json_string(graph: &Graph) -> Result<String> {
    let mut document = GraphDocument {
        nodes: IndexMap::with_capacity(graph.node_count()),
        edges: IndexMap::new(),
        is_directed: graph.is_directed(),
    };
    for id in graph.nodes() {
        let coord = graph.coordinate(id).unwrap_or(Coordinate::new(0.0, 0.0));
        document.nodes.insert(graph.label(id), [coord.lat, coord.lon]);
    }
    for id in graph.nodes() {
        let neighbors = graph.neighbors(id);
        if neighbors.is_empty() {
            continue;
        }
        let records = neighbors
            .iter()
            .map(|n| EdgeRecord {
                node: NodeRef::Name(graph.label(n.node)),
                weight: n.weight,
            })
            .collect();
        document.edges.insert(graph.label(id), records);
    }
    Ok(serde_json::to_string_pretty(&document)?)
}

fn build_graph(document: GraphDocument) -> Result<Arc<Graph>> {
    let mut builder = Graph::builder().directed(document.is_directed);

    for (name, [lat, lon]) in &document.nodes {
        let coord = Coordinate::new(*lat, *lon);
        if !coord.is_finite() {
            return Err(Error::MalformedGraph(format!("节点 {} 的坐标不是有限数", name)));
        }
        builder.add_node(name.as_str(), coord);
    }

    for (from, records) in &document.edges {
        for record in records {
            if !record.weight.is_finite() {
                return Err(Error::MalformedGraph(format!(
                    "边 {} -> {} 的权重不是有限数",
                    from, record.node
                )));
            }
            builder.add_edge_by_name(from, &record.node.to_string(), record.weight)?;
        }
    }

    Ok(builder.build())
}
