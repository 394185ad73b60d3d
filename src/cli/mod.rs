//! 命令行交互
//!
//! REPL 命令处理、Tab 补全与结果打印

mod commands;
mod completer;
mod printer;

pub use commands::{resolve_node, CommandResult, Session};
pub use completer::CommandCompleter;
pub use printer::{describe_event, PrintMode, Printer};
