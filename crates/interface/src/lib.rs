//! Signet Interface - 交互层
//!
//! 职责：
//! - 命令解析与执行
//! - REPL 交互模式与脚本回放
//! - CLI 命令行工具

pub mod cli;
pub mod command;
pub mod repl;
pub mod session;

pub use cli::run_cli;
pub use command::{parse_command, Command, CommandError};
pub use repl::{run_repl, run_script, ScriptError, ScriptSummary};
pub use session::{CommandSession, Outcome};
