//! Subcommand handlers.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use shline_quoting::{
    CommandLineOptions, Dialect, EnvChanges, EnvValue, PreparedCommandLine, QuotedString,
    ShellProcess, join_quoted_arguments, prepare_command_line, prepare_command_line_for,
};
use tracing::{debug, info};

use crate::cli::{LineArgs, OutputFormat, PrepareArgs, QuoteArgs, RunArgs};
use crate::config::ShlineConfig;
use crate::runner::{default_shell_args, run_in_shell};

#[cfg(unix)]
const FALLBACK_SHELL: &str = "/bin/sh";
#[cfg(windows)]
const FALLBACK_SHELL: &str = "cmd.exe";
#[cfg(not(any(unix, windows)))]
const FALLBACK_SHELL: &str = "sh";

/// Shell precedence: `--shell`, config `shell`, `$SHELL`, `%COMSPEC%`, then
/// the platform fallback.
pub fn resolve_shell(flag: Option<&str>, config: &ShlineConfig) -> String {
    flag.map(str::to_owned)
        .or_else(|| config.shell.clone())
        .filter(|shell| !shell.trim().is_empty())
        .or_else(|| non_empty_var("SHELL"))
        .or_else(|| non_empty_var("COMSPEC"))
        .unwrap_or_else(|| FALLBACK_SHELL.to_string())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Config `[env]`, then config `unset`, then `--env` and `--unset` flags.
/// Later entries for the same name replace earlier ones in place.
pub fn build_options(line: &LineArgs, config: &ShlineConfig) -> CommandLineOptions {
    let mut env = EnvChanges::new();
    env.extend(
        config
            .env
            .iter()
            .map(|(name, value)| (name.clone(), EnvValue::Set(value.clone()))),
    );
    for name in &config.unset {
        env.insert(name.clone(), EnvValue::Unset);
    }
    for (name, value) in &line.env {
        env.insert(name.clone(), value.clone());
    }
    for name in &line.unset {
        env.insert(name.clone(), EnvValue::Unset);
    }

    let options = CommandLineOptions::new(line.cwd.clone()).args(line.args.iter().cloned());
    if env.is_empty() {
        options
    } else {
        options.env(env)
    }
}

/// Prepares the line, honoring a dialect override from the flag or config.
pub fn prepare(line: &LineArgs, config: &ShlineConfig) -> (ShellProcess, PreparedCommandLine) {
    let shell = ShellProcess::new(resolve_shell(line.shell.as_deref(), config));
    let options = build_options(line, config);
    let prepared = match line.dialect.or(config.dialect) {
        Some(dialect) => {
            debug!(%dialect, "dialect override");
            prepare_command_line_for(dialect, &options)
        }
        None => prepare_command_line(Some(&shell), &options),
    };
    (shell, prepared)
}

fn ensure_clean(prepared: &PreparedCommandLine, strict: bool) -> Result<()> {
    if strict && let Some(diagnostic) = prepared.diagnostics.first() {
        bail!("refusing to emit command line: {diagnostic}");
    }
    Ok(())
}

fn report_diagnostics(prepared: &PreparedCommandLine) {
    for diagnostic in &prepared.diagnostics {
        eprintln!("warning: {diagnostic}");
    }
}

pub fn handle_prepare(args: &PrepareArgs, config: &ShlineConfig) -> Result<()> {
    let (shell, prepared) = prepare(&args.line, config);
    ensure_clean(&prepared, args.line.strict)?;
    info!(shell = %shell.executable, dialect = ?prepared.dialect, "prepared command line");

    let mut stdout = io::stdout().lock();
    match args.format {
        OutputFormat::Text => {
            report_diagnostics(&prepared);
            writeln!(stdout, "{prepared}")?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&prepared)
                .context("Failed to serialize prepared command line")?;
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

pub fn handle_quote(args: &QuoteArgs) -> Result<()> {
    let values: Vec<QuotedString> = args
        .values
        .iter()
        .map(|value| QuotedString::new(value.clone(), args.mode))
        .collect();
    let joined = join_quoted_arguments(&values, args.dialect.quoting())?;
    writeln!(io::stdout().lock(), "{joined}")?;
    Ok(())
}

pub async fn handle_run(args: &RunArgs, config: &ShlineConfig) -> Result<ExitCode> {
    let (shell, prepared) = prepare(&args.line, config);
    ensure_clean(&prepared, args.line.strict)?;
    report_diagnostics(&prepared);

    let dialect: Option<Dialect> = prepared.dialect;
    let shell = if args.shell_args.is_empty() {
        shell.with_args(default_shell_args(dialect).iter().copied())
    } else {
        shell.with_args(args.shell_args.iter().cloned())
    };

    info!(shell = %shell.executable, "running command line");
    let code = run_in_shell(&shell, dialect, &prepared.command).await?;
    Ok(exit_code(code))
}

fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}
