use std::env;
use std::io;

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingConfig, TraceLevel};

const TRACE_TARGETS: &[&str] = &["shline", "shline_quoting"];

/// Installs the stderr subscriber when logging was asked for.
///
/// `RUST_LOG` takes precedence; otherwise `--verbose` or `[logging] enabled`
/// turn logging on at the configured level. Returns whether a subscriber was
/// installed.
pub fn initialize_tracing(config: &LoggingConfig, verbose: bool) -> Result<bool> {
    let filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose || config.enabled {
        let level = if verbose {
            TraceLevel::Debug
        } else {
            config.level
        };
        EnvFilter::new(filter_directives(level))
    } else {
        return Ok(false);
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;

    Ok(true)
}

fn filter_directives(level: TraceLevel) -> String {
    TRACE_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}
