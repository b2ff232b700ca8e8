//! CLI command handlers for `registrar`.
//!
//! Each subcommand is implemented in its own submodule.

pub mod config;
pub mod exec;
pub mod shell;
