//! Integration tests for configuration management

use registrar::config::{Config, ConfigOverrides};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    assert!(
        !config.logging.level.is_empty(),
        "Default log level should not be empty"
    );
    assert!(
        config.paths.programs_file.ends_with("programs.txt"),
        "Default program database should be programs.txt"
    );
    assert!(!config.paths.programs_file.contains("$REGISTRAR"));
    assert!(config.paths.records_file.is_empty());
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/registrar.log"
verbose = true

[paths]
programs_file = "./programs.txt"
records_file = "./students.txt"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/registrar.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.programs_file, "./programs.txt");
    assert_eq!(config.paths.records_file, "./students.txt");
}

#[test]
fn test_config_from_toml_partial() {
    let toml_str = r#"
[logging]
level = "error"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "");
    assert!(!config.logging.verbose);
    assert_eq!(config.paths.programs_file, "");
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$REGISTRAR/registrar.log"

[paths]
programs_file = "$REGISTRAR/programs.txt"
records_file = "$REGISTRAR/students.txt"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");
    let dir = Config::get_registrar_dir();
    let dir = dir.to_string_lossy();

    assert!(config.logging.file.starts_with(dir.as_ref()));
    assert!(!config.paths.programs_file.contains("$REGISTRAR"));
    assert!(config.paths.records_file.ends_with("students.txt"));
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    assert!(config.get("level").is_some());

    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.get("level").unwrap(), "debug");

    config
        .set("programs-file", "/srv/programs.txt")
        .expect("Failed to set programs file");
    assert_eq!(config.get("programs_file").unwrap(), "/srv/programs.txt");

    config
        .set("verbose", "true")
        .expect("Failed to set verbose");
    assert!(config.logging.verbose);
    assert!(config.set("verbose", "sometimes").is_err());

    assert!(config.get("unknown_key").is_none());
    assert!(config.set("unknown_key", "value").is_err());
}

#[test]
fn test_config_unset() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    config.set("records_file", "/tmp/students.txt").unwrap();
    config
        .unset("records_file", &defaults)
        .expect("Failed to unset records_file");
    assert_eq!(config.paths.records_file, defaults.paths.records_file);

    assert!(config.unset("nope", &defaults).is_err());
}

#[test]
fn test_config_save_and_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("config.toml");

    let mut config = Config::from_defaults();
    config.set("level", "info").expect("Failed to set level");
    config.set("records_file", "/data/students.txt").unwrap();

    let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");
    fs::write(&config_file, toml_str).expect("Failed to write config");

    let content = fs::read_to_string(&config_file).expect("Failed to read config");
    let loaded = Config::from_toml(&content).expect("Failed to parse loaded config");

    assert_eq!(loaded.logging.level, "info");
    assert_eq!(loaded.paths.records_file, "/data/students.txt");
}

#[test]
fn test_config_overrides_apply() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        file: Some("/custom/path.log".to_string()),
        verbose: Some(true),
        programs_file: Some("./custom_programs.txt".to_string()),
    };
    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/custom/path.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.programs_file, "./custom_programs.txt");
}

#[test]
fn test_config_overrides_partial() {
    let mut config = Config::from_defaults();
    let programs_file = config.paths.programs_file.clone();

    config.apply_overrides(&ConfigOverrides {
        level: Some("debug".to_string()),
        ..Default::default()
    });

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.paths.programs_file, programs_file);
}

#[test]
fn test_config_display_format() {
    let display_str = Config::from_defaults().to_string();

    assert!(display_str.contains("[logging]"));
    assert!(display_str.contains("[paths]"));
    assert!(display_str.contains("programs_file"));
    assert!(display_str.contains("records_file"));
}

#[test]
fn test_merge_defaults_adds_missing_fields() {
    let toml_str = r#"
[logging]
level = "error"

[paths]
programs_file = ""
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse minimal config");
    let defaults = Config::from_defaults();

    assert!(config.merge_defaults(&defaults));
    assert_eq!(config.paths.programs_file, defaults.paths.programs_file);
    assert_eq!(config.logging.level, "error");
}

#[test]
fn test_merge_defaults_preserves_existing() {
    let toml_str = r#"
[logging]
level = "error"
file = "/my/custom/path.log"

[paths]
programs_file = "/my/programs.txt"
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse config");
    config.merge_defaults(&Config::from_defaults());

    assert_eq!(config.logging.file, "/my/custom/path.log");
    assert_eq!(config.paths.programs_file, "/my/programs.txt");
}

#[test]
fn test_get_registrar_dir() {
    let dir = Config::get_registrar_dir();

    assert!(dir.ends_with("registrar"));
    assert_ne!(dir, PathBuf::from("."));
}

#[test]
fn test_get_config_file_path() {
    let path = Config::get_config_file_path();

    let path_str = path.to_string_lossy();
    assert!(path_str.ends_with("config.toml") || path_str.ends_with("dconfig.toml"));
}
