//! Signet E2E 测试
//!
//! 通过子进程驱动 signet 二进制

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Signet CLI 调用封装
struct SignetCli {
    path: PathBuf,
}

struct CliResult {
    success: bool,
    stdout: String,
    stderr: String,
}

impl SignetCli {
    fn new() -> Self {
        Self {
            path: PathBuf::from(env!("CARGO_BIN_EXE_signet")),
        }
    }

    fn run(&self, args: &[&str], stdin: Option<&str>) -> CliResult {
        let mut child = Command::new(&self.path)
            .args(args)
            .env_remove("SIGNET_STORE_BACKEND")
            .env_remove("SIGNET_OUTPUT_FORMAT")
            .env_remove("SIGNET_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn signet");

        {
            let mut pipe = child.stdin.take().expect("stdin");
            if let Some(input) = stdin {
                pipe.write_all(input.as_bytes()).expect("write stdin");
            }
        }

        let output = child.wait_with_output().expect("wait signet");
        CliResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}

const SCENARIO: &str = "\
set r1 abc 1 docA
set r2 def 1 docB
set r3 ghi 2 docA
clear-doc docA
list
";

#[test]
fn test_run_script_scenario() {
    let dir = TempDir::new().unwrap();
    let script = write_file(dir.path(), "scenario.txt", SCENARIO);

    for backend in ["memory", "indexed"] {
        let result = SignetCli::new().run(&["-b", backend, "run", script.to_str().unwrap()], None);
        assert!(result.success, "stderr: {}", result.stderr);
        assert!(result.stdout.contains("cleared document docA (2 removed)"));
        let listed: Vec<_> = result
            .stdout
            .lines()
            .filter(|l| l.contains("payload="))
            .collect();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].starts_with("r2 "));
    }
}

#[test]
fn test_run_script_json_output() {
    let dir = TempDir::new().unwrap();
    let script = write_file(dir.path(), "json.txt", "set r1 abc 4\nget r1\n");

    let result = SignetCli::new().run(&["--output", "json", "run", script.to_str().unwrap()], None);
    assert!(result.success, "stderr: {}", result.stderr);
    let last = result.stdout.lines().last().unwrap();
    let record: serde_json::Value = serde_json::from_str(last).unwrap();
    assert_eq!(record["rowId"], "r1");
    assert_eq!(record["sectionId"], 4);
}

#[test]
fn test_run_script_bad_line_fails() {
    let dir = TempDir::new().unwrap();
    let script = write_file(dir.path(), "bad.txt", "set r1 abc\nfrobnicate\n");

    let result = SignetCli::new().run(&["run", script.to_str().unwrap()], None);
    assert!(!result.success);
    assert!(result.stderr.contains("line 2"));

    let result = SignetCli::new().run(&["run", "--keep-going", script.to_str().unwrap()], None);
    assert!(result.success, "stderr: {}", result.stderr);
}

#[test]
fn test_missing_script_fails() {
    let result = SignetCli::new().run(&["run", "/nonexistent/script.txt"], None);
    assert!(!result.success);
    assert!(result.stderr.contains("Failed to open script"));
}

#[test]
fn test_repl_uses_config_prompt() {
    let dir = TempDir::new().unwrap();
    let config = write_file(dir.path(), "signet.yaml", "repl:\n  prompt: \"ink> \"\n");

    let result = SignetCli::new().run(
        &["-c", config.to_str().unwrap(), "repl"],
        Some("set r1 abc\nhas r1\nexit\n"),
    );
    assert!(result.success, "stderr: {}", result.stderr);
    assert!(result.stdout.contains("ink> set r1"));
    assert!(result.stdout.contains("ink> true"));
}
