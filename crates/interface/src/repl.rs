//! REPL - 交互式签名会话
//!
//! 职责：
//! - 逐行读取命令并执行
//! - 脚本回放（`signet run <FILE>`）

use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::{info, warn};

use crate::command::{parse_command, CommandError};
use crate::session::{CommandSession, Outcome};

/// Script replay errors
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("line {line}: {source}")]
    Command {
        line: usize,
        #[source]
        source: CommandError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Totals for one script replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub executed: usize,
    pub skipped: usize,
}

/// Run the interactive loop until EOF or `exit`
pub fn run_repl<R, W>(
    session: &mut CommandSession,
    prompt: &str,
    input: R,
    output: &mut W,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    info!("Starting signet REPL (type 'help' for commands, 'exit' to quit)");
    let mut lines = input.lines();

    loop {
        write!(output, "{}", prompt)?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line?;

        match parse_command(&line) {
            Ok(None) => continue,
            Ok(Some(command)) => match session.execute(command) {
                Outcome::Continue(text) => {
                    if !text.is_empty() {
                        writeln!(output, "{}", text)?;
                    }
                }
                Outcome::Exit => break,
            },
            Err(e) => writeln!(output, "error: {}", e)?,
        }
    }

    info!("REPL exited");
    Ok(())
}

/// Replay a script of command lines.
///
/// Stops at the first bad line unless `keep_going` is set, in which case bad
/// lines are logged and counted as skipped.
pub fn run_script<R, W>(
    session: &mut CommandSession,
    input: R,
    output: &mut W,
    keep_going: bool,
) -> Result<ScriptSummary, ScriptError>
where
    R: BufRead,
    W: Write,
{
    let mut summary = ScriptSummary::default();

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(source) if keep_going => {
                warn!(line = line_no, error = %source, "Skipping script line");
                summary.skipped += 1;
                continue;
            }
            Err(source) => {
                return Err(ScriptError::Command {
                    line: line_no,
                    source,
                })
            }
        };

        summary.executed += 1;
        match session.execute(command) {
            Outcome::Continue(text) => {
                if !text.is_empty() {
                    writeln!(output, "{}", text)?;
                }
            }
            Outcome::Exit => break,
        }
    }

    info!(executed = summary.executed, skipped = summary.skipped, "Script finished");
    Ok(summary)
}
