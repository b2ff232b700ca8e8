//! Command-line interface entry point for `registrar`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use registrar::config::Config;
use registrar::info;
use registrar::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // --log-level has already replaced logging.level; fallback warn
    let mut level = config.logging.level.parse().unwrap_or(Level::Warn);
    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    if !config.logging.file.is_empty() {
        let log_path = std::path::PathBuf::from(&config.logging.file);
        let display_path = log_path.to_string_lossy();
        if init_file_logging(&log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config, &defaults)
        }
        Command::Shell { file } => commands::shell::run(file.as_deref(), &config),
        Command::Exec { file, tokens } => commands::exec::run(&file, &tokens, &config),
    }
}
