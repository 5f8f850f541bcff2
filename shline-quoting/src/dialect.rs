use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::quoting::{BASH_QUOTING, CMD_QUOTING, POWERSHELL_QUOTING, QuotingFunctions};

static POSIX_SHELL_NAME: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"(?i)^(?:bash|sh|zsh|dash|ksh|mksh|ash)(?:\.exe)?$"));

static POWERSHELL_NAME: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"(?i)^(?:powershell|pwsh|pwsh-preview)(?:\.exe)?$"));

static CMD_NAME: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"(?i)^cmd(?:\.exe)?$"));

/// Command language spoken by the shell that will receive a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dialect {
    /// bash and other POSIX-like shells.
    Posix,
    /// Windows PowerShell and `pwsh`.
    PowerShell,
    /// The Windows command interpreter.
    Cmd,
}

impl Dialect {
    /// All dialects, in detection priority order.
    pub const ALL: [Self; 3] = [Self::Posix, Self::PowerShell, Self::Cmd];

    /// Detects the dialect from an executable path such as `/bin/bash` or
    /// `C:\Windows\System32\cmd.exe`. Only the file name is inspected, and
    /// both `/` and `\` are treated as separators regardless of the host.
    pub fn detect(executable: &str) -> Option<Self> {
        let name = executable_name(executable);
        if name.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|dialect| dialect.name_pattern().is_match(name))
    }

    /// The quoting table used to render values for this dialect.
    pub fn quoting(self) -> &'static QuotingFunctions {
        match self {
            Self::Posix => &BASH_QUOTING,
            Self::PowerShell => &POWERSHELL_QUOTING,
            Self::Cmd => &CMD_QUOTING,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Posix => "posix",
            Self::PowerShell => "powershell",
            Self::Cmd => "cmd",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "posix" | "bash" | "sh" => Some(Self::Posix),
            "powershell" | "pwsh" => Some(Self::PowerShell),
            "cmd" | "cmd.exe" => Some(Self::Cmd),
            _ => None,
        }
    }

    fn name_pattern(self) -> &'static Regex {
        match self {
            Self::Posix => &POSIX_SHELL_NAME,
            Self::PowerShell => &POWERSHELL_NAME,
            Self::Cmd => &CMD_NAME,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn executable_name(executable: &str) -> &str {
    let path = executable.trim().trim_matches('"');
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        // Patterns are literals exercised by the detection tests.
        Err(err) => panic!("invalid regex pattern `{pattern}`: {err}"),
    }
}
