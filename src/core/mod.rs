//! Core registrar functionality: records, rules, reports and sessions

pub mod codec;
pub mod command;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod rules;
pub mod session;
pub mod store;
pub mod tokens;

/// Returns the current version of the `registrar` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
