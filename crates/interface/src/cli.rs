//! CLI - Command Line Interface
//!
//! Available Commands:
//! - signet repl         - Start interactive signature session
//! - signet run <FILE>   - Replay a script of commands
//!
//! Nothing is persisted; every invocation starts with an empty store.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing::{info, Level};

use signet_core::{OutputFormat, SignetConfig, StoreBackend};
use signet_storage::create_signature_store;

use crate::repl::{run_repl, run_script};
use crate::session::CommandSession;

/// Store backend as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum BackendArg {
    Memory,
    Indexed,
}

impl From<BackendArg> for StoreBackend {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Memory => StoreBackend::Memory,
            BackendArg::Indexed => StoreBackend::Indexed,
        }
    }
}

/// Output format as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Signet CLI
#[derive(Parser, Debug)]
#[command(name = "signet")]
#[command(author, version, about = "In-memory signature capture store", long_about = None)]
pub(crate) struct Cli {
    /// YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Store backend
    #[arg(short, long, global = true, value_enum)]
    backend: Option<BackendArg>,

    /// Output format
    #[arg(long, global = true, value_enum)]
    output: Option<FormatArg>,

    /// Verbose logging (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Start interactive session
    Repl,

    /// Replay a command script
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub(crate) struct RunArgs {
    /// Script file, one command per line
    pub file: PathBuf,

    /// Skip bad lines instead of stopping
    #[arg(long)]
    pub keep_going: bool,
}

/// Parse CLI arguments and execute commands
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let level = config.logging().tracing_level()?;
    init_logging(log_level(level, cli.verbose));

    let store_config = config.store();
    info!(backend = %store_config.backend, "Starting signet");
    let mut session = CommandSession::new(
        create_signature_store(&store_config),
        config.output().format,
    );

    match cli.command {
        Commands::Repl => {
            let prompt = config.repl().prompt;
            let stdin = io::stdin();
            run_repl(&mut session, &prompt, stdin.lock(), &mut io::stdout())
                .context("REPL failed")?;
        }
        Commands::Run(args) => {
            let file = File::open(&args.file)
                .with_context(|| format!("Failed to open script {}", args.file.display()))?;
            run_script(
                &mut session,
                BufReader::new(file),
                &mut io::stdout(),
                args.keep_going,
            )
            .with_context(|| format!("Script {} failed", args.file.display()))?;
        }
    }

    Ok(())
}

/// Layer config: file (or defaults), then environment, then flags
fn build_config(cli: &Cli) -> anyhow::Result<SignetConfig> {
    let mut config = match &cli.config {
        Some(path) => SignetConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SignetConfig::default(),
    };
    config
        .apply_env_overrides()
        .context("Invalid environment override")?;

    if let Some(backend) = cli.backend {
        config.store_mut().backend = backend.into();
    }
    if let Some(output) = cli.output {
        config.output_mut().format = output.into();
    }
    Ok(config)
}

/// Resolve the log level: the more verbose of the config value and `-v` count
fn log_level(configured: Level, verbose: u8) -> Level {
    let from_flags = match verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    configured.max(from_flags)
}

fn init_logging(level: Level) {
    // Ignore the error when a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_repl_defaults() {
        let cli = Cli::try_parse_from(["signet", "repl"]).unwrap();
        assert!(matches!(cli.command, Commands::Repl));
        assert!(cli.config.is_none());
        assert!(cli.backend.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_run_with_flags() {
        let cli = Cli::try_parse_from([
            "signet",
            "run",
            "script.txt",
            "--keep-going",
            "-b",
            "indexed",
            "--output",
            "json",
            "-vv",
        ])
        .unwrap();
        match &cli.command {
            Commands::Run(args) => {
                assert_eq!(args.file, PathBuf::from("script.txt"));
                assert!(args.keep_going);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.backend, Some(BackendArg::Indexed));
        assert_eq!(cli.output, Some(FormatArg::Json));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["signet", "-b", "sqlite", "repl"]).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signet.yaml");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "store:\n  backend: indexed\nrepl:\n  prompt: \"s> \"").unwrap();

        let path_arg = path.to_string_lossy().to_string();
        let args = ["signet", "-c", path_arg.as_str(), "--output", "json", "repl"];
        let cli = Cli::try_parse_from(args).unwrap();
        let config = build_config(&cli).unwrap();
        assert_eq!(config.repl().prompt, "s> ");
        assert_eq!(config.output().format, OutputFormat::Json);

        let args = ["signet", "-c", path_arg.as_str(), "-b", "memory", "repl"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(build_config(&cli).unwrap().store().backend, StoreBackend::Memory);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = ["signet", "-c", "/nonexistent/signet.yaml", "repl"];
        let cli = Cli::try_parse_from(args).unwrap();
        let err = build_config(&cli).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }

    #[test]
    fn test_invalid_log_level_in_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signet.yaml");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "logging:\n  level: loud").unwrap();

        let path_arg = path.to_string_lossy().to_string();
        let cli = Cli::try_parse_from(["signet", "-c", path_arg.as_str(), "repl"]).unwrap();
        let err = build_config(&cli).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid value for logging.level: loud"));
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(Level::WARN, 0), Level::WARN);
        assert_eq!(log_level(Level::WARN, 1), Level::INFO);
        assert_eq!(log_level(Level::WARN, 3), Level::TRACE);
        assert_eq!(log_level(Level::DEBUG, 1), Level::DEBUG);
        assert_eq!(log_level(Level::ERROR, 0), Level::ERROR);
    }
}
