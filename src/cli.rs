//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use shline_quoting::{Dialect, QuotingMode};

#[derive(Debug, Parser)]
#[command(name = "shline")]
#[command(about = "Build shell-safe command lines for bash, PowerShell and cmd.exe sessions")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to $SHLINE_CONFIG or ./shline.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the command line that runs ARGS in the given shell
    Prepare(PrepareArgs),
    /// Quote values for one dialect and print them space-joined
    Quote(QuoteArgs),
    /// Spawn the shell, write the command line to its stdin and wait
    Run(RunArgs),
}

/// Inputs shared by `prepare` and `run`.
#[derive(Debug, Clone, Default, Args)]
pub struct LineArgs {
    /// Shell executable that will receive the line
    #[arg(long, value_name = "EXECUTABLE")]
    pub shell: Option<String>,

    /// Skip detection and use this dialect (posix, powershell, cmd)
    #[arg(long, value_parser = parse_dialect)]
    pub dialect: Option<Dialect>,

    /// Directory to change into before running
    #[arg(long, value_name = "DIR", default_value = "")]
    pub cwd: String,

    /// Set an environment variable for the program (repeatable)
    #[arg(
        short = 'e',
        long = "env",
        value_name = "NAME=VALUE",
        value_parser = parse_env_assignment
    )]
    pub env: Vec<(String, String)>,

    /// Remove an environment variable for the program (repeatable)
    #[arg(short = 'u', long = "unset", value_name = "NAME")]
    pub unset: Vec<String>,

    /// Fail instead of emitting a line that produced diagnostics
    #[arg(long)]
    pub strict: bool,

    /// Program and its arguments, after `--`
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Args)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub line: LineArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Args)]
pub struct QuoteArgs {
    /// Target dialect (posix, powershell, cmd)
    #[arg(long, value_parser = parse_dialect)]
    pub dialect: Dialect,

    /// Quoting mode (escape, strong, weak)
    #[arg(long, value_parser = parse_mode, default_value = "strong")]
    pub mode: QuotingMode,

    /// Values to quote
    #[arg(required = true, allow_hyphen_values = true)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub line: LineArgs,

    /// Argument passed to the shell itself (repeatable; replaces the
    /// dialect's defaults)
    #[arg(long = "shell-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub shell_args: Vec<String>,
}

fn parse_dialect(value: &str) -> Result<Dialect, String> {
    Dialect::parse(value)
        .ok_or_else(|| format!("unknown dialect `{value}` (expected posix, powershell or cmd)"))
}

fn parse_mode(value: &str) -> Result<QuotingMode, String> {
    QuotingMode::parse(value)
        .ok_or_else(|| format!("unknown quoting mode `{value}` (expected escape, strong or weak)"))
}

fn parse_env_assignment(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((name, _)) if name.is_empty() => Err(format!("missing variable name in `{value}`")),
        Some((name, assigned)) => Ok((name.to_string(), assigned.to_string())),
        None => Err(format!("expected NAME=VALUE, got `{value}`")),
    }
}
