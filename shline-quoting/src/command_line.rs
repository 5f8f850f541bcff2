//! Assembly of a complete command line for a long-lived shell.
//!
//! The shell that receives the line may already have been running for a
//! while, so a fresh process environment is not an option: the directory
//! change and environment modifications are encoded into the line itself,
//! followed by the quoted program invocation.

use std::fmt;

use tracing::{debug, warn};

use crate::dialect::Dialect;
use crate::env::{EnvChanges, EnvValue, is_portable_env_name};
use crate::join::join_quoted_arguments;
use crate::quoting::{
    BASH_QUOTING, CMD_QUOTING, POWERSHELL_QUOTING, QuotedString, QuotingMode, has_line_break,
};

/// The shell process that will receive the command line on its stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellProcess {
    pub executable: String,
    pub args: Vec<String>,
}

impl ShellProcess {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Dialect spoken by this shell, if its executable is recognized.
    pub fn dialect(&self) -> Option<Dialect> {
        Dialect::detect(&self.executable)
    }
}

/// What to run and where.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLineOptions {
    /// Directory to change into first. Empty means "stay where you are".
    pub cwd: String,
    /// Program followed by its own arguments.
    pub args: Vec<String>,
    /// Environment modifications applied to the program only.
    pub env: Option<EnvChanges>,
}

impl CommandLineOptions {
    pub fn new(cwd: impl Into<String>) -> Self {
        Self {
            cwd: cwd.into(),
            ..Self::default()
        }
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn env(mut self, env: EnvChanges) -> Self {
        self.env = Some(env);
        self
    }

    fn directory(&self) -> Option<&str> {
        Some(self.cwd.as_str()).filter(|cwd| !cwd.is_empty())
    }
}

/// Non-fatal findings reported alongside a prepared command line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Diagnostic {
    /// No dialect matched the executable; the arguments were joined raw and
    /// the line is not safe against injection.
    UnrecognizedShell { executable: Option<String> },
    /// An environment entry was left out because its name is not a portable
    /// identifier.
    InvalidEnvName { name: String },
    /// cmd.exe cannot carry a line break inside one command, so each CR, LF
    /// or CRLF in this value was replaced with a space.
    LineBreakFlattened { value: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedShell { executable } => write!(
                f,
                "Unknown shell, could not escape arguments: {}",
                executable.as_deref().unwrap_or("undefined")
            ),
            Self::InvalidEnvName { name } => write!(
                f,
                "environment variable name {name:?} is not a portable identifier; entry skipped"
            ),
            Self::LineBreakFlattened { value } => write!(
                f,
                "cmd cannot pass line breaks; {value:?} was sent with spaces in their place"
            ),
        }
    }
}

/// The line to write to the shell, plus what was learned producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PreparedCommandLine {
    pub command: String,
    /// `None` when detection failed and the unsafe fallback was used.
    pub dialect: Option<Dialect>,
    pub diagnostics: Vec<Diagnostic>,
}

impl PreparedCommandLine {
    /// Whether every argument went through the dialect's quoting.
    pub fn is_quoted(&self) -> bool {
        self.dialect.is_some()
    }

    pub fn into_command(self) -> String {
        self.command
    }
}

impl fmt::Display for PreparedCommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command)
    }
}

/// Builds the line for `shell`, detecting its dialect from the executable.
///
/// Never fails. When the shell is absent or unrecognized the arguments are
/// joined with spaces and no quoting at all, and an
/// [`Diagnostic::UnrecognizedShell`] is attached; callers that depend on
/// injection safety must check [`PreparedCommandLine::is_quoted`].
///
/// ```
/// use shline_quoting::{CommandLineOptions, ShellProcess, prepare_command_line};
///
/// let shell = ShellProcess::new("/bin/bash");
/// let options = CommandLineOptions::new("/tmp/work dir").args(["echo", "it's"]);
/// let prepared = prepare_command_line(Some(&shell), &options);
/// assert_eq!(prepared.command, r#"cd '/tmp/work dir' && 'echo' 'it'"'"'s'"#);
/// ```
pub fn prepare_command_line(
    shell: Option<&ShellProcess>,
    options: &CommandLineOptions,
) -> PreparedCommandLine {
    let executable = shell
        .map(|shell| shell.executable.as_str())
        .filter(|executable| !executable.is_empty());

    match executable.and_then(Dialect::detect) {
        Some(dialect) => prepare_command_line_for(dialect, options),
        None => {
            let diagnostic = Diagnostic::UnrecognizedShell {
                executable: executable.map(str::to_owned),
            };
            warn!(executable = executable.unwrap_or("undefined"), "{diagnostic}");
            PreparedCommandLine {
                command: options.args.join(" "),
                dialect: None,
                diagnostics: vec![diagnostic],
            }
        }
    }
}

/// Builds the line for an explicitly chosen dialect.
pub fn prepare_command_line_for(
    dialect: Dialect,
    options: &CommandLineOptions,
) -> PreparedCommandLine {
    let mut diagnostics = Vec::new();
    let env = options
        .env
        .as_ref()
        .map(|env| portable_entries(env, &mut diagnostics));
    let cwd = options.directory();
    if dialect == Dialect::Cmd {
        report_flattened_line_breaks(cwd, env.as_deref(), &options.args, &mut diagnostics);
    }

    let command = match dialect {
        Dialect::Posix => posix_command_line(cwd, env.as_deref(), &options.args),
        Dialect::PowerShell => powershell_command_line(cwd, env.as_deref(), &options.args),
        Dialect::Cmd => cmd_command_line(cwd, env.as_deref(), &options.args),
    };
    debug!(%dialect, args = options.args.len(), "prepared shell command line");

    PreparedCommandLine {
        command,
        dialect: Some(dialect),
        diagnostics,
    }
}

type EnvEntry<'a> = (&'a str, &'a EnvValue);

fn portable_entries<'a>(
    env: &'a EnvChanges,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<EnvEntry<'a>> {
    env.iter()
        .filter(|(name, _)| {
            let portable = is_portable_env_name(name);
            if !portable {
                let diagnostic = Diagnostic::InvalidEnvName {
                    name: (*name).to_string(),
                };
                warn!(name = *name, "{diagnostic}");
                diagnostics.push(diagnostic);
            }
            portable
        })
        .collect()
}

fn report_flattened_line_breaks(
    cwd: Option<&str>,
    env: Option<&[EnvEntry<'_>]>,
    args: &[String],
    diagnostics: &mut Vec<Diagnostic>,
) {
    let env_values = env
        .unwrap_or_default()
        .iter()
        .filter_map(|(_, value)| value.as_set());
    for value in cwd
        .into_iter()
        .chain(env_values)
        .chain(args.iter().map(String::as_str))
        .filter(|value| has_line_break(value))
    {
        let diagnostic = Diagnostic::LineBreakFlattened {
            value: value.to_string(),
        };
        warn!("{diagnostic}");
        diagnostics.push(diagnostic);
    }
}

/// Quotes the program invocation in the most literal mode the dialect has.
fn quote_arguments(args: &[String], dialect: Dialect) -> String {
    let mode = match dialect {
        Dialect::Posix | Dialect::PowerShell => QuotingMode::Strong,
        // No strong quoting in cmd.exe.
        Dialect::Cmd => QuotingMode::Escape,
    };
    let table = dialect.quoting();
    let quoted: Vec<QuotedString> = args
        .iter()
        .map(|arg| QuotedString::new(arg.as_str(), mode))
        .collect();
    join_quoted_arguments(&quoted, table).unwrap_or_else(|error| {
        debug!(%error, "escaping arguments instead");
        args.iter()
            .map(|arg| table.escape(arg))
            .collect::<Vec<_>>()
            .join(" ")
    })
}

/// `cd '<dir>' && env 'NAME=value' -u 'NAME' '<arg>'...`
fn posix_command_line(
    cwd: Option<&str>,
    env: Option<&[EnvEntry<'_>]>,
    args: &[String],
) -> String {
    let quote = BASH_QUOTING.strongest();
    let mut command = String::new();

    if let Some(cwd) = cwd {
        command.push_str(&format!("cd {} && ", quote(cwd)));
    }
    if let Some(env) = env {
        command.push_str("env");
        for (name, value) in env {
            match value {
                EnvValue::Unset => command.push_str(&format!(" -u {}", quote(name))),
                EnvValue::Set(value) => {
                    command.push_str(&format!(" {}", quote(&format!("{name}={value}"))));
                }
            }
        }
        command.push(' ');
    }
    command.push_str(&quote_arguments(args, Dialect::Posix));
    command
}

/// `cd '<dir>'; ${env:NAME}='value'; & '<arg>'...`
fn powershell_command_line(
    cwd: Option<&str>,
    env: Option<&[EnvEntry<'_>]>,
    args: &[String],
) -> String {
    let quote = POWERSHELL_QUOTING.strongest();
    let mut command = String::new();

    if let Some(cwd) = cwd {
        command.push_str(&format!("cd {}; ", quote(cwd)));
    }
    for (name, value) in env.unwrap_or_default() {
        let name = POWERSHELL_QUOTING.escape(name);
        match value {
            EnvValue::Unset => command.push_str(&format!(
                "Remove-Item Env:{name} -ErrorAction SilentlyContinue; "
            )),
            EnvValue::Set(value) => {
                command.push_str(&format!("${{env:{name}}}={}; ", quote(value)));
            }
        }
    }
    // `&` makes PowerShell invoke the quoted program instead of echoing a string.
    command.push_str("& ");
    command.push_str(&quote_arguments(args, Dialect::PowerShell));
    command
}

/// `cd <dir>cmd /C "set "NAME=value" && <arg>..."`
///
/// cmd.exe cannot quote literally, so every value goes through `escape`.
fn cmd_command_line(
    cwd: Option<&str>,
    env: Option<&[EnvEntry<'_>]>,
    args: &[String],
) -> String {
    let mut command = String::new();

    if let Some(cwd) = cwd {
        command.push_str(&format!("cd {}", CMD_QUOTING.escape(cwd)));
    }
    if let Some(env) = env {
        command.push_str("cmd /C \"");
        for (name, value) in env {
            match value {
                EnvValue::Unset => command.push_str(&format!("set {name}=\"\" && ")),
                EnvValue::Set(value) => command.push_str(&format!(
                    "set \"{name}={}\" && ",
                    CMD_QUOTING.escape(value)
                )),
            }
        }
    }
    command.push_str(&quote_arguments(args, Dialect::Cmd));
    if env.is_some() {
        command.push('"');
    }
    command
}
