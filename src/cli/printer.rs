//! 结果打印器
//!
//! 提供表格和垂直格式的结果输出

use crate::algorithm::{Algorithm, MaxFlow, SearchOutcome};
use crate::events::Event;
use crate::graph::Graph;
use crate::metrics::RunStats;
use crate::types::NodeId;
use prettytable::{format, row, Cell, Row, Table};

/// 打印模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    /// 表格模式
    Table,
    /// 垂直模式
    Vertical,
}

/// 结果打印器
pub struct Printer {
    mode: PrintMode,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(PrintMode::Table)
    }
}

impl Printer {
    pub fn new(mode: PrintMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> PrintMode {
        self.mode
    }

    /// 设置打印模式
    pub fn set_mode(&mut self, mode: PrintMode) {
        self.mode = mode;
    }

    /// 按当前模式打印若干行
    pub fn print_result(&self, columns: &[&str], rows: &[Vec<String>]) -> String {
        if columns.is_empty() || rows.is_empty() {
            return "Empty set\n".to_string();
        }

        let output = match self.mode {
            PrintMode::Table => self.format_table(columns, rows),
            PrintMode::Vertical => self.format_vertical(columns, rows),
        };

        format!("{}{} row(s) in set\n", output, rows.len())
    }

    /// 表格格式
    fn format_table(&self, columns: &[&str], rows: &[Vec<String>]) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);

        let header: Vec<Cell> = columns.iter().map(|c| Cell::new(c)).collect();
        table.set_titles(Row::new(header));

        for row_data in rows {
            let cells: Vec<Cell> = row_data.iter().map(|v| Cell::new(v)).collect();
            table.add_row(Row::new(cells));
        }

        table.to_string()
    }

    /// 垂直格式
    fn format_vertical(&self, columns: &[&str], rows: &[Vec<String>]) -> String {
        let max_col_width = columns.iter().map(|c| c.chars().count()).max().unwrap_or(0);
        let mut output = String::new();

        for (i, row_data) in rows.iter().enumerate() {
            output.push_str(&format!(
                "*************************** {}. row ***************************\n",
                i + 1
            ));

            for (j, col) in columns.iter().enumerate() {
                let value = row_data.get(j).map(|s| s.as_str()).unwrap_or("");
                output.push_str(&format!("{:>width$}: {}\n", col, value, width = max_col_width));
            }
        }

        output
    }

    /// 打印图统计信息
    pub fn print_stats(&self, graph: &Graph) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(row!["Property", "Value"]);
        table.add_row(row!["Node Count", graph.node_count().to_string()]);
        table.add_row(row!["Edge Count", graph.edge_count().to_string()]);
        table.add_row(row!["Directed", graph.is_directed().to_string()]);
        if let Some((lo, hi)) = graph.weight_bounds() {
            table.add_row(row!["Min Weight", format!("{:.2}", lo)]);
            table.add_row(row!["Max Weight", format!("{:.2}", hi)]);
        }
        table.add_row(row![
            "Negative Weights",
            graph.has_negative_weights().to_string()
        ]);
        table.to_string()
    }

    /// 打印单个节点详情
    pub fn print_node(&self, graph: &Graph, id: NodeId) -> String {
        let coord = graph
            .coordinate(id)
            .map(|c| c.to_string())
            .unwrap_or_default();
        let columns = ["Node", "Id", "Coordinate", "Out", "In"];
        let rows = vec![vec![
            graph.label(id),
            id.to_string(),
            coord,
            graph.out_degree(id).to_string(),
            graph.in_degree(id).to_string(),
        ]];
        self.print_result(&columns, &rows)
    }

    /// 打印节点的出边与入边
    pub fn print_neighbors(&self, graph: &Graph, id: NodeId) -> String {
        let columns = ["Direction", "Node", "Weight"];
        let outgoing = graph
            .neighbors(id)
            .iter()
            .map(|n| vec!["out".to_string(), graph.label(n.node), format!("{:.2}", n.weight)]);
        let incoming = graph
            .reverse_neighbors(id)
            .iter()
            .map(|n| vec!["in".to_string(), graph.label(n.node), format!("{:.2}", n.weight)]);
        let rows: Vec<Vec<String>> = outgoing.chain(incoming).collect();
        self.print_result(&columns, &rows)
    }

    /// 打印路径结果与运行统计
    pub fn print_path(&self, graph: &Graph, outcome: &SearchOutcome, stats: &RunStats) -> String {
        let mut output = String::new();
        match outcome {
            SearchOutcome::Found(path) => {
                let columns = ["#", "Node", "Coordinate", "Distance"];
                let mut travelled = 0.0;
                let mut rows = Vec::with_capacity(path.nodes.len());
                for (i, &node) in path.nodes.iter().enumerate() {
                    if i > 0 {
                        travelled += graph.weight(path.nodes[i - 1], node).unwrap_or(0.0);
                    }
                    rows.push(vec![
                        i.to_string(),
                        graph.label(node),
                        graph.coordinate(node).map(|c| c.to_string()).unwrap_or_default(),
                        format!("{:.2}", travelled),
                    ]);
                }
                output.push_str(&self.print_result(&columns, &rows));
                output.push_str(&format!(
                    "总距离: {:.2}，边数: {}\n",
                    path.distance,
                    path.hops()
                ));
            }
            SearchOutcome::NoPath => output.push_str("未找到路径\n"),
            SearchOutcome::NegativeCycle => output.push_str("检测到负权环，最短路径无定义\n"),
        }
        output.push_str(&summary_line(stats));
        output
    }

    /// 打印最大流结果
    pub fn print_flow(&self, graph: &Graph, flow: &MaxFlow, stats: &RunStats) -> String {
        let columns = ["From", "To", "Flow", "Capacity", "Saturated"];
        let saturated = flow.saturated_edges();
        let rows: Vec<Vec<String>> = flow
            .flow_edges()
            .into_iter()
            .map(|(u, v, f)| {
                let is_saturated = saturated.iter().any(|&(a, b, _)| a == u && b == v);
                vec![
                    graph.label(u),
                    graph.label(v),
                    format!("{:.2}", f),
                    format!("{:.2}", flow.capacity_of(u, v)),
                    if is_saturated { "yes" } else { "" }.to_string(),
                ]
            })
            .collect();

        let mut output = self.print_result(&columns, &rows);
        output.push_str(&format!(
            "最大流: {:.2}，增广路径: {} 条，最小割源侧: {} 个节点\n",
            flow.value,
            flow.augmenting_paths,
            flow.source_side.len()
        ));
        output.push_str(&summary_line(stats));
        output
    }

    /// 打印多个算法的对比
    pub fn print_comparison(&self, results: &[(Algorithm, Result<(SearchOutcome, RunStats), String>)]) -> String {
        let columns = ["Algorithm", "Result", "Hops", "Iterations", "Visited", "Relaxed", "Time (ms)"];
        let rows: Vec<Vec<String>> = results
            .iter()
            .map(|(algorithm, result)| match result {
                Ok((outcome, stats)) => {
                    let (summary, hops) = match outcome {
                        SearchOutcome::Found(path) => {
                            (format!("{:.2}", path.distance), path.hops().to_string())
                        }
                        SearchOutcome::NoPath => ("no path".to_string(), "-".to_string()),
                        SearchOutcome::NegativeCycle => ("negative cycle".to_string(), "-".to_string()),
                    };
                    vec![
                        algorithm.name().to_string(),
                        summary,
                        hops,
                        stats.iterations.to_string(),
                        stats.nodes_visited.to_string(),
                        stats.edges_relaxed.to_string(),
                        format!("{:.3}", stats.elapsed_ms()),
                    ]
                }
                Err(e) => vec![
                    algorithm.name().to_string(),
                    e.clone(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                ],
            })
            .collect();
        self.print_result(&columns, &rows)
    }

    /// 打印事件日志
    pub fn print_events(&self, graph: &Graph, events: &[Event]) -> String {
        let columns = ["#", "Event", "Detail"];
        let rows: Vec<Vec<String>> = events
            .iter()
            .enumerate()
            .map(|(i, event)| {
                let (kind, detail) = describe_event(graph, event);
                vec![i.to_string(), kind.to_string(), detail]
            })
            .collect();
        self.print_result(&columns, &rows)
    }

    /// 打印帮助信息
    pub fn print_help() -> String {
        r#"
═══════════════════════════════════════════════════════════════
                   pathflow CLI 命令帮助
═══════════════════════════════════════════════════════════════

基础命令:
  help, h, ?           显示帮助
  quit, exit, q        退出程序
  stats, info          显示图统计信息

  node <名称>          查看节点详情
                       示例: node 250691723

  neighbors, n <名称>  查看节点的出边与入边

  run <算法> <起点> <终点>
                       运行指定算法
                       算法: dijkstra, bellman-ford, bfs, dfs,
                             astar, bidirectional, maxflow
                       示例: run astar 250691723 250691790

  <算法> <起点> <终点> run 的简写
                       示例: dijkstra 250691723 250691790

  compare <起点> <终点>
                       并排比较所有路径算法

  events on|off        运行后是否打印事件日志
  mode table|vertical  切换输出格式
  clear                清屏

═══════════════════════════════════════════════════════════════
"#
        .to_string()
    }
}

fn summary_line(stats: &RunStats) -> String {
    format!(
        "{}: {} 次迭代，访问 {} 个节点，松弛 {} 条边 ({:.3} ms)\n",
        stats.algorithm,
        stats.iterations,
        stats.nodes_visited,
        stats.edges_relaxed,
        stats.elapsed_ms()
    )
}

/// 事件的类型名与可读描述
pub fn describe_event(graph: &Graph, event: &Event) -> (&'static str, String) {
    match event {
        Event::AlgorithmStarted { name } => ("started", name.to_string()),
        Event::IterationTick { iteration } => ("tick", iteration.to_string()),
        Event::NodeVisited { node } => ("visit", graph.label(*node)),
        Event::EdgeRelaxed {
            from,
            to,
            new_distance,
        } => (
            "relax",
            format!("{} -> {} = {:.2}", graph.label(*from), graph.label(*to), new_distance),
        ),
        Event::MeetingNodeFound { node, distance } => {
            ("meet", format!("{} ({:.2})", graph.label(*node), distance))
        }
        Event::AugmentingPath { nodes, bottleneck } => {
            let path: Vec<String> = nodes.iter().map(|n| graph.label(*n)).collect();
            ("augment", format!("{} ({:.2})", path.join(" -> "), bottleneck))
        }
        Event::EdgeFlow {
            from,
            to,
            flow,
            capacity,
        } => (
            "flow",
            format!("{} -> {}: {:.2}/{:.2}", graph.label(*from), graph.label(*to), flow, capacity),
        ),
        Event::PathEdgeFinalized { from, to } => {
            ("path", format!("{} -> {}", graph.label(*from), graph.label(*to)))
        }
        Event::AlgorithmEnded {
            elapsed,
            iterations,
        } => (
            "ended",
            format!("{} iterations, {:.3} ms", iterations, elapsed.as_secs_f64() * 1000.0),
        ),
        Event::NoPathFound => ("no_path", String::new()),
        Event::NegativeCycleDetected => ("negative_cycle", String::new()),
    }
}
