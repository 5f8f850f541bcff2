//! `shline.toml` loading.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use shline_quoting::Dialect;

pub const CONFIG_FILE_NAME: &str = "shline.toml";
pub const CONFIG_ENV_VAR: &str = "SHLINE_CONFIG";

/// Trace level for structured logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl TraceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }
}

impl fmt::Display for TraceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TraceLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Install the tracing subscriber even when `RUST_LOG` is unset
    pub enabled: bool,
    /// Trace level (error, warn, info, debug, trace)
    pub level: TraceLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShlineConfig {
    /// Shell executable used when `--shell` is not given
    pub shell: Option<String>,
    /// Dialect override; skips detection from the executable name
    pub dialect: Option<Dialect>,
    /// Names removed from the environment, after `[env]` is applied
    pub unset: Vec<String>,
    /// Variables assigned before any `--env` flag, in file order
    pub env: IndexMap<String, String>,
    pub logging: LoggingConfig,
}

impl ShlineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse shline configuration")
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// A configuration together with the file it came from, if any.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: ShlineConfig,
    pub path: Option<PathBuf>,
}

/// Finds and loads the configuration.
///
/// Lookup order: `explicit`, then `$SHLINE_CONFIG`, then `./shline.toml`,
/// then `<config dir>/shline/shline.toml`. A path that was asked for
/// explicitly must exist; the implicit locations are skipped when missing.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let requested = explicit.map(Path::to_path_buf).or_else(|| {
        env::var_os(CONFIG_ENV_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    });

    if let Some(path) = requested {
        if !path.is_file() {
            bail!("config file {} does not exist", path.display());
        }
        let config = ShlineConfig::load_from_file(&path)?;
        return Ok(LoadedConfig {
            config,
            path: Some(path),
        });
    }

    for candidate in default_config_paths() {
        if candidate.is_file() {
            let config = ShlineConfig::load_from_file(&candidate)?;
            return Ok(LoadedConfig {
                config,
                path: Some(candidate),
            });
        }
    }

    Ok(LoadedConfig::default())
}

fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("shline").join(CONFIG_FILE_NAME));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ShlineConfig::from_toml_str("").expect("empty config parses");
        assert_eq!(config, ShlineConfig::default());
        assert!(!config.logging.enabled);
        assert_eq!(config.logging.level, TraceLevel::Info);
    }

    #[test]
    fn env_table_keeps_file_order() {
        let config = ShlineConfig::from_toml_str(
            r#"
shell = "/bin/bash"
dialect = "powershell"
unset = ["OLDPWD"]

[env]
ZED = "1"
ALPHA = "two words"
MIDDLE = ""

[logging]
enabled = true
level = "DEBUG"
"#,
        )
        .expect("config parses");

        assert_eq!(config.shell.as_deref(), Some("/bin/bash"));
        assert_eq!(config.dialect, Some(Dialect::PowerShell));
        assert_eq!(config.unset, ["OLDPWD"]);
        let names: Vec<_> = config.env.keys().map(String::as_str).collect();
        assert_eq!(names, ["ZED", "ALPHA", "MIDDLE"]);
        assert!(config.logging.enabled);
        assert_eq!(config.logging.level, TraceLevel::Debug);
    }

    #[test]
    fn unknown_trace_level_falls_back_to_default() {
        let config = ShlineConfig::from_toml_str("[logging]\nlevel = \"loud\"\n")
            .expect("config parses");
        assert_eq!(config.logging.level, TraceLevel::Info);
    }

    #[test]
    fn unknown_dialect_is_rejected() {
        assert!(ShlineConfig::from_toml_str("dialect = \"fish\"").is_err());
    }

    #[test]
    fn explicit_path_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "shell = \"pwsh\"").expect("write config");

        let loaded = load_config(Some(file.path())).expect("config loads");
        assert_eq!(loaded.config.shell.as_deref(), Some("pwsh"));
        assert_eq!(loaded.path.as_deref(), Some(file.path()));
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.toml");
        let error = load_config(Some(&missing)).expect_err("missing file must fail");
        assert!(error.to_string().contains("does not exist"));
    }

    #[test]
    fn trace_level_names_round_trip() {
        for level in [
            TraceLevel::Error,
            TraceLevel::Warn,
            TraceLevel::Info,
            TraceLevel::Debug,
            TraceLevel::Trace,
        ] {
            assert_eq!(TraceLevel::parse(level.as_str()), Some(level));
        }
    }
}
