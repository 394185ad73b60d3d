//! pathflow CLI 工具
//!
//! 交互式命令行界面

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use pathflow::cli::{CommandCompleter, CommandResult, Session};
use pathflow::config::EngineConfig;
use pathflow::import;
use pathflow::PathFinder;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pathflow-cli")]
#[command(about = "pathflow 命令行工具：在路网图上运行路径与最大流算法")]
#[command(version)]
struct Args {
    /// 图文件（JSON）
    #[arg(short, long)]
    graph: PathBuf,

    /// 引擎配置文件（JSON）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 单次运行的迭代上限，覆盖配置文件
    #[arg(long)]
    max_iterations: Option<u64>,

    /// 执行单条命令后退出
    #[arg(short = 'e', long)]
    execute: Option<String>,

    /// 运行后打印事件日志
    #[arg(long)]
    events: bool,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("无法加载配置文件 {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(limit) = args.max_iterations {
        config = config.with_max_iterations(limit);
    }
    config.validate().context("配置无效")?;

    let (graph, stats) = import::load_json_with_stats(&args.graph)
        .with_context(|| format!("无法加载图文件 {}", args.graph.display()))?;

    let mut session = Session::new(PathFinder::with_config(graph.clone(), config));
    session.show_events = args.events;

    // 单条命令模式
    if let Some(command) = args.execute {
        return match session.execute(&command) {
            CommandResult::Error(e) => anyhow::bail!(e),
            result => {
                display(result);
                Ok(())
            }
        };
    }

    println!("{}", "pathflow CLI - 路网路径与流量算法引擎".bold());
    println!("=============================================");
    println!("图已加载: {}", args.graph.display());
    println!("  节点数: {}", stats.nodes_imported);
    println!("  边数: {}", stats.edges_imported);
    println!("  耗时: {} ms", stats.duration_ms);
    println!("\n输入 'help' 查看命令列表，'quit' 退出\n");

    let names = graph.node_index().names().map(str::to_string).collect();
    let mut rl = Editor::<CommandCompleter, DefaultHistory>::new()?;
    rl.set_helper(Some(CommandCompleter::new(names)));

    let history = history_path();
    if let Some(path) = &history {
        // 首次运行时历史文件不存在
        let _ = rl.load_history(path);
    }

    loop {
        match rl.readline("pathflow> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                match session.execute(line) {
                    CommandResult::Exit => break,
                    result => display(result),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(path) = &history {
        if let Err(e) = rl.save_history(path) {
            tracing::warn!(error = %e, "无法保存历史记录");
        }
    }

    println!("再见！");
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "pathflow=debug" } else { "pathflow=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".pathflow_history"))
}

fn display(result: CommandResult) {
    match result {
        CommandResult::Message(text) => print!("{}", text),
        CommandResult::Error(e) => println!("{} {}", "错误:".red().bold(), e),
        CommandResult::Continue | CommandResult::Exit => {}
    }
}
