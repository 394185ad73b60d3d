//! 命令处理
//!
//! 解析 REPL 或 -e 传入的一行命令，在当前图上执行并返回要显示的文本

use std::sync::Arc;

use super::printer::{PrintMode, Printer};
use crate::algorithm::{Algorithm, PathFinder, RunOutput, SearchOutcome};
use crate::error::{Error, Result};
use crate::events::{RecordingSink, Tee, TracingSink};
use crate::graph::Graph;
use crate::metrics::RunStats;
use crate::types::NodeId;

/// 命令执行结果
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// 继续运行
    Continue,
    /// 退出程序
    Exit,
    /// 显示消息
    Message(String),
    /// 错误
    Error(String),
}

/// 会话状态
pub struct Session {
    finder: PathFinder,
    printer: Printer,
    /// 运行后是否打印事件日志
    pub show_events: bool,
    /// 最近一次运行的统计
    pub last_stats: Option<RunStats>,
}

impl Session {
    pub fn new(finder: PathFinder) -> Self {
        Self {
            finder,
            printer: Printer::default(),
            show_events: false,
            last_stats: None,
        }
    }

    pub fn graph(&self) -> &Arc<Graph> {
        self.finder.graph()
    }

    pub fn printer(&self) -> &Printer {
        &self.printer
    }

    /// 解析并执行一行命令
    pub fn execute(&mut self, input: &str) -> CommandResult {
        let input = input.trim();
        if input.is_empty() {
            return CommandResult::Continue;
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();
        let args = &parts[1..];

        match cmd.as_str() {
            "help" | "h" | "?" => CommandResult::Message(Printer::print_help()),

            "quit" | "exit" | "q" => CommandResult::Exit,

            "stats" | "info" => CommandResult::Message(self.printer.print_stats(self.graph())),

            "node" | "v" => match args {
                [name] => self.with_node(name, |s, id| s.printer.print_node(s.graph(), id)),
                _ => usage("node <名称>"),
            },

            "neighbors" | "n" => match args {
                [name] => self.with_node(name, |s, id| s.printer.print_neighbors(s.graph(), id)),
                _ => usage("neighbors <名称>"),
            },

            "run" => match args {
                [algorithm, start, end] => match algorithm.parse::<Algorithm>() {
                    Ok(algorithm) => self.run_algorithm(algorithm, start, end),
                    Err(e) => CommandResult::Error(e.to_string()),
                },
                _ => usage("run <算法> <起点> <终点>"),
            },

            "compare" => match args {
                [start, end] => self.compare(start, end),
                _ => usage("compare <起点> <终点>"),
            },

            "events" => match args {
                ["on"] => {
                    self.show_events = true;
                    CommandResult::Message("事件日志已开启".to_string())
                }
                ["off"] => {
                    self.show_events = false;
                    CommandResult::Message("事件日志已关闭".to_string())
                }
                _ => usage("events on|off"),
            },

            "mode" => match args {
                ["table"] => {
                    self.printer.set_mode(PrintMode::Table);
                    CommandResult::Message("输出格式: table".to_string())
                }
                ["vertical"] => {
                    self.printer.set_mode(PrintMode::Vertical);
                    CommandResult::Message("输出格式: vertical".to_string())
                }
                _ => usage("mode table|vertical"),
            },

            "clear" => {
                print!("\x1B[2J\x1B[1;1H");
                CommandResult::Continue
            }

            other => match other.parse::<Algorithm>() {
                Ok(algorithm) => match args {
                    [start, end] => self.run_algorithm(algorithm, start, end),
                    _ => usage(&format!("{} <起点> <终点>", algorithm.command())),
                },
                Err(_) => CommandResult::Error(format!("未知命令: {}。输入 'help' 查看帮助。", cmd)),
            },
        }
    }

    fn with_node(&self, name: &str, f: impl FnOnce(&Self, NodeId) -> String) -> CommandResult {
        match resolve_node(self.graph(), name) {
            Ok(id) => CommandResult::Message(f(self, id)),
            Err(e) => CommandResult::Error(e.to_string()),
        }
    }

    fn run_algorithm(&mut self, algorithm: Algorithm, start: &str, end: &str) -> CommandResult {
        let (start, end) = match resolve_pair(self.graph(), start, end) {
            Ok(pair) => pair,
            Err(e) => return CommandResult::Error(e.to_string()),
        };

        let mut recording = RecordingSink::new();
        let mut stats = RunStats::new();
        // 事件同时写入 debug 日志，RUST_LOG=pathflow=debug 时可见
        let log = TracingSink::with_graph(self.graph().clone());
        let output = self.finder.run(
            algorithm,
            start,
            end,
            &mut Tee(&mut recording, Tee(&mut stats, log)),
        );

        let output = match output {
            Ok(output) => output,
            Err(e) => return CommandResult::Error(e.to_string()),
        };

        let graph = self.graph();
        let mut text = String::new();
        if self.show_events {
            text.push_str(&self.printer.print_events(graph, recording.events()));
        }
        match &output {
            RunOutput::Path(outcome) => text.push_str(&self.printer.print_path(graph, outcome, &stats)),
            RunOutput::Flow(flow) => text.push_str(&self.printer.print_flow(graph, flow, &stats)),
        }
        self.last_stats = Some(stats);
        CommandResult::Message(text)
    }

    fn compare(&mut self, start: &str, end: &str) -> CommandResult {
        let (start, end) = match resolve_pair(self.graph(), start, end) {
            Ok(pair) => pair,
            Err(e) => return CommandResult::Error(e.to_string()),
        };

        let results: Vec<(Algorithm, std::result::Result<(SearchOutcome, RunStats), String>)> =
            Algorithm::PATH_ALGORITHMS
                .iter()
                .map(|&algorithm| {
                    let mut stats = RunStats::new();
                    let result = self
                        .finder
                        .run(algorithm, start, end, &mut stats)
                        .map_err(|e| e.to_string())
                        .and_then(|output| match output {
                            RunOutput::Path(outcome) => Ok((outcome, stats)),
                            RunOutput::Flow(_) => Err("不是路径算法".to_string()),
                        });
                    (algorithm, result)
                })
                .collect();

        CommandResult::Message(self.printer.print_comparison(&results))
    }
}

fn usage(text: &str) -> CommandResult {
    CommandResult::Error(format!("用法: {}", text))
}

/// 解析节点名；也接受 #n 形式的内部编号
pub fn resolve_node(graph: &Graph, name: &str) -> Result<NodeId> {
    if let Some(id) = graph.lookup(name) {
        return Ok(id);
    }
    if let Some(raw) = name.strip_prefix('#') {
        let id = raw
            .parse::<u32>()
            .map(NodeId::new)
            .map_err(|_| Error::ParseError(format!("无效的节点编号: {}", name)))?;
        graph.check_node(id)?;
        return Ok(id);
    }
    Err(Error::UnknownNode(name.to_string()))
}

fn resolve_pair(graph: &Graph, start: &str, end: &str) -> Result<(NodeId, NodeId)> {
    Ok((resolve_node(graph, start)?, resolve_node(graph, end)?))
}
