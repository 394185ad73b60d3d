//! 命令与节点名补全器
//!
//! 基于 rustyline 实现 Tab 补全功能

use crate::algorithm::Algorithm;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// 基础命令列表（算法简写另外追加）
const BASE_COMMANDS: &[&str] = &[
    "help", "quit", "exit", "stats", "info", "node", "neighbors", "run", "compare", "events",
    "mode", "clear",
];

/// 子命令映射
fn get_sub_commands(keyword: &str) -> Option<&'static [&'static str]> {
    match keyword {
        "events" => Some(&["on", "off"]),
        "mode" => Some(&["table", "vertical"]),
        _ => None,
    }
}

/// pathflow CLI 补全器
#[derive(Default)]
pub struct CommandCompleter {
    commands: Vec<String>,
    node_names: Vec<String>,
}

impl CommandCompleter {
    pub fn new(node_names: Vec<String>) -> Self {
        let commands = BASE_COMMANDS
            .iter()
            .map(|c| c.to_string())
            .chain(Algorithm::ALL.iter().map(|a| a.command().to_string()))
            .collect();
        Self {
            commands,
            node_names,
        }
    }

    /// 给定已输入的单词（不含正在输入的那个），返回候选集合
    fn candidates(&self, words: &[&str]) -> Vec<String> {
        let Some(first) = words.first() else {
            return self.commands.clone();
        };
        let first = first.to_lowercase();

        if let Some(sub_cmds) = get_sub_commands(&first) {
            return if words.len() == 1 {
                sub_cmds.iter().map(|s| s.to_string()).collect()
            } else {
                Vec::new()
            };
        }

        match first.as_str() {
            "run" if words.len() == 1 => Algorithm::ALL.iter().map(|a| a.command().to_string()).collect(),
            "run" if words.len() <= 3 => self.node_names.clone(),
            "node" | "neighbors" | "n" if words.len() == 1 => self.node_names.clone(),
            "compare" if words.len() <= 2 => self.node_names.clone(),
            cmd if cmd.parse::<Algorithm>().is_ok() && words.len() <= 2 => self.node_names.clone(),
            _ => Vec::new(),
        }
    }

    fn complete_line(&self, line_to_cursor: &str, pos: usize) -> (usize, Vec<Pair>) {
        let mut words: Vec<&str> = line_to_cursor.split_whitespace().collect();

        // 光标紧跟单词时补全该单词，否则补全下一个单词
        let current = if line_to_cursor.ends_with(char::is_whitespace) || words.is_empty() {
            ""
        } else {
            words.pop().unwrap_or("")
        };
        let start_pos = pos - current.len();

        let completions = self
            .candidates(&words)
            .into_iter()
            .filter(|c| c.starts_with(current))
            .map(|c| Pair {
                display: c.clone(),
                replacement: c,
            })
            .collect();
        (start_pos, completions)
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.complete_line(&line[..pos], pos))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {}

impl Helper for CommandCompleter {}
