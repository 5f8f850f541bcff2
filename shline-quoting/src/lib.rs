//! Shell-safe command lines for long-lived interactive shells.
//!
//! A shell that is already running cannot be given a fresh working directory
//! or environment, so everything has to travel inside the text written to its
//! stdin. This crate renders that text for three dialects (POSIX shells,
//! PowerShell and cmd.exe) so that every argument reaches the program exactly
//! as given.
//!
//! The crate is pure: no I/O, no shared mutable state. The quoting tables are
//! `static` and can be used from any thread.
//!
//! ```
//! use shline_quoting::{CommandLineOptions, EnvChanges, ShellProcess, prepare_command_line};
//!
//! let shell = ShellProcess::new("/bin/bash");
//! let options = CommandLineOptions::new("/srv/app")
//!     .args(["node", "-e", "console.log(1)"])
//!     .env(EnvChanges::new().set("NODE_ENV", "production").unset("DEBUG"));
//!
//! let prepared = prepare_command_line(Some(&shell), &options);
//! assert_eq!(
//!     prepared.command,
//!     "cd '/srv/app' && env 'NODE_ENV=production' -u 'DEBUG' 'node' '-e' 'console.log(1)'"
//! );
//! ```

pub mod command_line;
pub mod dialect;
pub mod env;
pub mod error;
pub mod join;
pub mod quoting;

pub use command_line::{
    CommandLineOptions, Diagnostic, PreparedCommandLine, ShellProcess, prepare_command_line,
    prepare_command_line_for,
};
pub use dialect::Dialect;
pub use env::{EnvChanges, EnvValue, is_portable_env_name};
pub use error::QuotingError;
pub use join::{join_quoted_arguments, render_quoted};
pub use quoting::{
    BASH_QUOTING, CMD_QUOTING, POWERSHELL_QUOTING, QuoteFn, QuotedString, QuotingFunctions,
    QuotingMode,
};
