//! The `shline` command-line tool.
//!
//! Quoting and command-line assembly live in [`shline_quoting`]; this crate
//! adds configuration, logging and the `prepare`, `quote` and `run`
//! subcommands.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod runner;

pub use shline_quoting as quoting;
