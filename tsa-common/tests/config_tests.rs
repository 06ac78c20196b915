//! Unit tests for configuration loading and graceful degradation
//!
//! Tests the implementation of:
//! - Missing TOML files SHALL NOT cause termination
//! - Malformed TOML files fall back to defaults with a warning
//! - Priority order: overrides over TOML over compiled defaults

use std::io::Write;
use std::path::PathBuf;
use tsa_common::config::{
    BootstrapOverrides, ConfigFile, ServiceConfig, TomlConfig, DEFAULT_PORT,
};

#[test]
fn test_missing_toml_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    let (toml, source) = TomlConfig::load_or_default(Some(&missing));
    assert!(matches!(source, ConfigFile::Unusable(_)));
    let config = ServiceConfig::resolve(BootstrapOverrides::default(), &toml).unwrap();

    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.log_level, "info");
}

#[test]
fn test_malformed_toml_uses_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = \"not a number").unwrap();

    assert!(TomlConfig::load(file.path()).is_err());

    let (toml, source) = TomlConfig::load_or_default(Some(file.path()));
    assert!(matches!(source, ConfigFile::Unusable(tsa_common::Error::Config(_))));
    assert!(toml.port.is_none());
    assert!(toml.database_path.is_none());
}

#[test]
fn test_toml_values_applied() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
database_path = "/var/lib/tsa/annotation.sqlite"
host = "127.0.0.1"
port = 5100

[logging]
level = "WARNING"
"#
    )
    .unwrap();

    let (toml, source) = TomlConfig::load_or_default(Some(file.path()));
    assert!(matches!(source, ConfigFile::Loaded(path) if path == file.path()));
    let config = ServiceConfig::resolve(BootstrapOverrides::default(), &toml).unwrap();

    assert_eq!(
        config.database_path,
        PathBuf::from("/var/lib/tsa/annotation.sqlite")
    );
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 5100);
    assert_eq!(config.log_level, "warn");
}

#[test]
fn test_invalid_log_level_is_config_error() {
    let overrides = BootstrapOverrides {
        log_level: Some("VERBOSE".to_string()),
        ..Default::default()
    };

    let result = ServiceConfig::resolve(overrides, &TomlConfig::default());
    assert!(matches!(result, Err(tsa_common::Error::Config(_))));
}
