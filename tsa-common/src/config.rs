//! Bootstrap configuration loading
//!
//! Resolution priority for every bootstrap value:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Steps 1 and 2 are merged by the binary's argument parser and handed in as
//! [`BootstrapOverrides`]; this module layers the TOML file and the compiled
//! defaults underneath them.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default SQLite database location, relative to the working directory
pub const DEFAULT_DATABASE_PATH: &str = "./database/tweet_annotation.sqlite";

/// Default listen host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 5000;

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional; absent fields fall through to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Path to the SQLite database file
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// HTTP listen host
    #[serde(default)]
    pub host: Option<String>,

    /// HTTP listen port
    #[serde(default)]
    pub port: Option<u16>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error, or NOTSET..CRITICAL / 0..50)
    #[serde(default)]
    pub level: Option<String>,
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Load the config file, never failing
    ///
    /// An explicit path is always tried. Without one, the per-user default
    /// location is used when it exists. Returns defaults together with the
    /// reason when the file cannot be used; reporting is left to the caller,
    /// which may not have logging set up yet.
    pub fn load_or_default(explicit: Option<&Path>) -> (Self, ConfigFile) {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return (Self::default(), ConfigFile::Absent),
            },
        };

        match Self::load(&path) {
            Ok(config) => (config, ConfigFile::Loaded(path)),
            Err(e) => (Self::default(), ConfigFile::Unusable(e)),
        }
    }
}

/// Where the TOML layer came from
#[derive(Debug)]
pub enum ConfigFile {
    Loaded(PathBuf),
    /// No explicit path and nothing at the default location
    Absent,
    /// The file could not be read or parsed; defaults apply
    Unusable(Error),
}

/// Per-user config file location (`~/.config/tsa/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tsa").join("config.toml"))
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct BootstrapOverrides {
    pub database_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Fully resolved bootstrap configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    /// Normalised tracing level name
    pub log_level: String,
}

impl ServiceConfig {
    /// Merge overrides over the TOML file over compiled defaults
    pub fn resolve(overrides: BootstrapOverrides, toml: &TomlConfig) -> Result<Self> {
        let database_path = overrides
            .database_path
            .or_else(|| toml.database_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        let host = overrides
            .host
            .or_else(|| toml.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = overrides.port.or(toml.port).unwrap_or(DEFAULT_PORT);

        let raw_level = overrides
            .log_level
            .or_else(|| toml.logging.level.clone())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let log_level = normalize_log_level(&raw_level)?.to_string();

        Ok(Self {
            database_path,
            host,
            port,
            log_level,
        })
    }
}

/// Map a log level name or number to a tracing level name
///
/// Accepts tracing names as well as the classic numeric scale
/// (`NOTSET`/0 through `CRITICAL`/50), case-insensitively.
pub fn normalize_log_level(level: &str) -> Result<&'static str> {
    match level.trim().to_ascii_uppercase().as_str() {
        "NOTSET" | "0" | "TRACE" => Ok("trace"),
        "DEBUG" | "10" => Ok("debug"),
        "INFO" | "20" => Ok("info"),
        "WARNING" | "WARN" | "30" => Ok("warn"),
        "ERROR" | "40" | "CRITICAL" | "50" => Ok("error"),
        _ => Err(Error::Config(format!("Unknown log level: {}", level))),
    }
}
