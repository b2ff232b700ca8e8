//! CLI argument definitions for `registrar`

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use registrar::config::ConfigOverrides;
use registrar::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `Level` for
/// runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    Get {
        /// Optional configuration key (e.g., `level`, `programs_file`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Start the interactive shell.
    ///
    /// Reads commands from standard input until `exit` or end of input.
    Shell {
        /// Records file to open on start (defaults to config `records_file`)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Run a single command against a records file.
    ///
    /// The file is opened, the command runs, and the file is saved again when
    /// the command changed a student.
    Exec {
        /// Records file to operate on
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Command and its arguments, e.g. `-- enroll 12345 CS 3 "Jane Doe"`
        #[arg(value_name = "COMMAND", last = true, num_args = 1..)]
        tokens: Vec<String>,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "registrar",
    about = "Student records command-line interface",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Override the program database path for this run
    #[arg(long = "programs", value_name = "PATH")]
    pub programs_file: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// `None` means the loaded configuration value is kept.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.log_level.map(|lvl| lvl.to_string()),
            file: self
                .log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.verbose.then_some(true),
            programs_file: self
                .programs_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(command: Command) -> Cli {
        Cli {
            log_level: None,
            verbose: false,
            debug_flag: false,
            log_file: None,
            programs_file: None,
            command,
        }
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_to_logger_level() {
        assert_eq!(Level::from(LogLevelArg::Error), Level::Error);
        assert_eq!(Level::from(LogLevelArg::Debug), Level::Debug);
    }

    #[test]
    fn test_to_config_overrides_empty() {
        let overrides = cli(Command::Config { subcommand: None }).to_config_overrides();
        assert!(overrides.level.is_none());
        assert!(overrides.file.is_none());
        assert!(overrides.verbose.is_none());
        assert!(overrides.programs_file.is_none());
    }

    #[test]
    fn test_to_config_overrides_with_values() {
        let mut args = cli(Command::Shell { file: None });
        args.log_level = Some(LogLevelArg::Info);
        args.verbose = true;
        args.log_file = Some(PathBuf::from("/tmp/registrar.log"));
        args.programs_file = Some(PathBuf::from("/srv/programs.txt"));

        let overrides = args.to_config_overrides();
        assert_eq!(overrides.level.as_deref(), Some("info"));
        assert_eq!(overrides.file.as_deref(), Some("/tmp/registrar.log"));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(overrides.programs_file.as_deref(), Some("/srv/programs.txt"));
    }

    #[test]
    fn test_parse_exec_tokens() {
        let args = Cli::parse_from([
            "registrar",
            "--programs",
            "programs.txt",
            "exec",
            "students.txt",
            "--",
            "enroll",
            "12345",
            "CS",
            "3",
            "Jane Doe",
        ]);
        assert_eq!(args.programs_file, Some(PathBuf::from("programs.txt")));
        match args.command {
            Command::Exec { file, tokens } => {
                assert_eq!(file, PathBuf::from("students.txt"));
                assert_eq!(tokens, vec!["enroll", "12345", "CS", "3", "Jane Doe"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_shell_without_file() {
        let args = Cli::parse_from(["registrar", "--debug", "shell"]);
        assert!(args.debug_flag);
        assert!(matches!(args.command, Command::Shell { file: None }));
    }
}
