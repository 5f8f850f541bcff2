//! Feeds a prepared line to a real shell over its stdin.
//!
//! This mirrors how an interactive terminal receives the line: the shell is
//! started without the command on its argv and reads it as typed input.

use std::process::Stdio;

use anyhow::{Context, Result, bail};
use shline_quoting::{Dialect, ShellProcess};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

const POWERSHELL_STDIN_ARGS: &[&str] =
    &["-NoLogo", "-NoProfile", "-NonInteractive", "-Command", "-"];
const CMD_STDIN_ARGS: &[&str] = &["/D", "/Q"];

/// Arguments that make the shell read commands from stdin without a banner
/// or profile scripts.
pub fn default_shell_args(dialect: Option<Dialect>) -> &'static [&'static str] {
    match dialect {
        Some(Dialect::PowerShell) => POWERSHELL_STDIN_ARGS,
        Some(Dialect::Cmd) => CMD_STDIN_ARGS,
        Some(Dialect::Posix) | None => &[],
    }
}

/// The full stdin payload: the line, then a statement that exits with the
/// program's status.
pub fn session_script(dialect: Option<Dialect>, line: &str) -> String {
    let (exit, newline) = match dialect {
        Some(Dialect::Posix) | None => ("exit", "\n"),
        Some(Dialect::PowerShell) => ("exit $LASTEXITCODE", "\r\n"),
        Some(Dialect::Cmd) => ("exit %ERRORLEVEL%", "\r\n"),
    };
    format!("{line}{newline}{exit}{newline}")
}

/// Spawns `shell`, writes `line` to its stdin and waits for it to exit.
///
/// The shell inherits stdout and stderr. Returns the exit code, or `-1` when
/// the shell was terminated by a signal.
pub async fn run_in_shell(
    shell: &ShellProcess,
    dialect: Option<Dialect>,
    line: &str,
) -> Result<i32> {
    if shell.executable.is_empty() {
        bail!("missing shell executable");
    }

    let mut command = Command::new(&shell.executable);
    command
        .args(&shell.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .with_context(|| format!("failed to spawn shell `{}`", shell.executable))?;
    debug!(shell = %shell.executable, pid = child.id(), "spawned shell");

    let script = session_script(dialect, line);
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(script.as_bytes())
            .await
            .context("failed to write command line to shell stdin")?;
        stdin.flush().await.context("failed to flush shell stdin")?;
        // Dropping stdin delivers EOF.
    }

    let status = child.wait().await.context("failed to wait for shell")?;
    let code = status.code().unwrap_or(-1);
    debug!(code, "shell exited");
    Ok(code)
}
