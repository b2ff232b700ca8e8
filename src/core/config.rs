//! Persistent settings for the `registrar` binary.
//!
//! Settings live in a TOML file with a `[logging]` and a `[paths]` table.
//! The compiled-in defaults fill any key the user file leaves empty, and
//! `$REGISTRAR` in a value stands for the registrar config directory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

const DIR_VARIABLE: &str = "$REGISTRAR";

/// `[logging]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// error, warn, info or debug
    #[serde(default)]
    pub level: String,
    /// Log file; empty logs to the terminal
    #[serde(default)]
    pub file: String,
    /// Print progress messages
    #[serde(default)]
    pub verbose: bool,
}

/// `[paths]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Program database consulted whenever a records file is opened
    #[serde(default)]
    pub programs_file: String,
    /// Records file the shell opens on start (empty for none)
    #[serde(default)]
    pub records_file: String,
}

/// Everything read from `config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// `[logging]`
    pub logging: LoggingConfig,
    /// `[paths]`
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Values given on the command line for a single run
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// `--log-level`, or `--debug` as `debug`
    pub level: Option<String>,
    /// `--log-file`
    pub file: Option<String>,
    /// `-v`
    pub verbose: Option<bool>,
    /// `--programs`
    pub programs_file: Option<String>,
}

/// A key accepted by `config get/set/unset`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    /// `logging.level`
    Level,
    /// `logging.file`
    File,
    /// `logging.verbose`
    Verbose,
    /// `paths.programs_file`
    ProgramsFile,
    /// `paths.records_file`
    RecordsFile,
}

impl ConfigKey {
    /// Every key, in display order
    pub const ALL: [Self; 5] = [
        Self::Level,
        Self::File,
        Self::Verbose,
        Self::ProgramsFile,
        Self::RecordsFile,
    ];

    /// Name used in the TOML file
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Level => "level",
            Self::File => "file",
            Self::Verbose => "verbose",
            Self::ProgramsFile => "programs_file",
            Self::RecordsFile => "records_file",
        }
    }

    const fn table(self) -> &'static str {
        match self {
            Self::Level | Self::File | Self::Verbose => "logging",
            Self::ProgramsFile | Self::RecordsFile => "paths",
        }
    }
}

impl FromStr for ConfigKey {
    type Err = String;

    /// Dashes are accepted in place of underscores
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|key| key.name() == normalized)
            .ok_or_else(|| format!("Unknown config key: '{s}'"))
    }
}

impl Config {
    /// Platform config directory joined with `registrar`; `$REGISTRAR` expands to it
    #[must_use]
    pub fn get_registrar_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("registrar")
    }

    /// `config.toml` (`dconfig.toml` in debug builds) inside [`get_registrar_dir`]
    ///
    /// [`get_registrar_dir`]: Self::get_registrar_dir
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_registrar_dir().join(CONFIG_FILE_NAME)
    }

    fn text_mut(&mut self, key: ConfigKey) -> Option<&mut String> {
        match key {
            ConfigKey::Level => Some(&mut self.logging.level),
            ConfigKey::File => Some(&mut self.logging.file),
            ConfigKey::ProgramsFile => Some(&mut self.paths.programs_file),
            ConfigKey::RecordsFile => Some(&mut self.paths.records_file),
            ConfigKey::Verbose => None,
        }
    }

    /// Copy each empty text value from `defaults`. Returns whether anything changed.
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;
        for key in ConfigKey::ALL {
            let default = defaults.value_of(key);
            if let Some(value) = self.text_mut(key) {
                if value.is_empty() && !default.is_empty() {
                    *value = default;
                    changed = true;
                }
            }
        }
        changed
    }

    /// Replace values with those given on the command line. The file is not touched.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        let texts = [
            (ConfigKey::Level, &overrides.level),
            (ConfigKey::File, &overrides.file),
            (ConfigKey::ProgramsFile, &overrides.programs_file),
        ];
        for (key, value) in texts {
            if let (Some(value), Some(slot)) = (value, self.text_mut(key)) {
                slot.clone_from(value);
            }
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
    }

    /// Parse TOML and expand `$REGISTRAR` in every path value
    ///
    /// # Errors
    /// Returns the TOML error when the text is not valid or has the wrong shape
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;
        let dir = Self::get_registrar_dir();
        for key in [ConfigKey::File, ConfigKey::ProgramsFile, ConfigKey::RecordsFile] {
            if let Some(value) = config.text_mut(key) {
                *value = expand_dir_variable(value, &dir);
            }
        }
        Ok(config)
    }

    /// Defaults compiled into the binary for the current build profile
    ///
    /// # Panics
    /// Panics if the compiled-in TOML does not parse; `tests/config_tests.rs` covers it.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Read the user config file, writing it from defaults on first run.
    ///
    /// Empty values are filled from defaults and written back. An unreadable or
    /// invalid file yields the defaults and is left alone.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if !config_file.exists() {
            let _ = defaults.save();
            return defaults;
        }

        let Some(mut config) = fs::read_to_string(&config_file)
            .ok()
            .and_then(|content| Self::from_toml(&content).ok())
        else {
            return defaults;
        };
        if config.merge_defaults(&defaults) {
            let _ = config.save();
        }
        config
    }

    /// Write this config to [`get_config_file_path`], creating its directory
    ///
    /// [`get_config_file_path`]: Self::get_config_file_path
    ///
    /// # Errors
    /// Returns the I/O or serialization error
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config_file, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    fn value_of(&self, key: ConfigKey) -> String {
        match key {
            ConfigKey::Level => self.logging.level.clone(),
            ConfigKey::File => self.logging.file.clone(),
            ConfigKey::Verbose => self.logging.verbose.to_string(),
            ConfigKey::ProgramsFile => self.paths.programs_file.clone(),
            ConfigKey::RecordsFile => self.paths.records_file.clone(),
        }
    }

    /// Current value of `key` as text, `None` for an unknown key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        key.parse().ok().map(|key| self.value_of(key))
    }

    /// Change one value in memory; [`save`](Self::save) persists it
    ///
    /// # Errors
    /// Unknown key, or a `verbose` value other than `true`/`false`
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let key: ConfigKey = key.parse()?;
        match self.text_mut(key) {
            Some(slot) => *slot = value.to_string(),
            None => {
                self.logging.verbose = value
                    .parse()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
        }
        Ok(())
    }

    /// Put one value back to its default in memory
    ///
    /// # Errors
    /// Unknown key
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        let key: ConfigKey = key.parse()?;
        match self.text_mut(key) {
            Some(slot) => *slot = defaults.value_of(key),
            None => self.logging.verbose = defaults.logging.verbose,
        }
        Ok(())
    }

    /// Delete the user config file so the next [`load`](Self::load) starts from defaults
    ///
    /// # Errors
    /// The file exists but could not be removed
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

fn expand_dir_variable(value: &str, dir: &std::path::Path) -> String {
    if value.contains(DIR_VARIABLE) {
        value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
    } else {
        value.to_string()
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut table = "";
        for key in ConfigKey::ALL {
            if key.table() != table {
                if !table.is_empty() {
                    writeln!(f)?;
                }
                table = key.table();
                writeln!(f, "[{table}]")?;
            }
            match key {
                ConfigKey::Verbose => writeln!(f, "  {} = {}", key.name(), self.logging.verbose)?,
                _ => writeln!(f, "  {} = \"{}\"", key.name(), self.value_of(key))?,
            }
        }
        Ok(())
    }
}
