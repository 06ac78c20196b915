//! Command-line arguments
//!
//! Every flag has an environment variable counterpart. Anything left unset
//! falls through to the TOML file and then to the compiled defaults.

use std::path::PathBuf;

use clap::Parser;
use tsa_common::config::BootstrapOverrides;

/// Command-line arguments for tsa-web
#[derive(Parser, Debug, Default)]
#[command(name = "tsa-web")]
#[command(about = "Tweet stance annotation web service")]
#[command(version)]
pub struct Args {
    /// SQLite database file
    #[arg(short, long, env = "TSA_DATABASE")]
    pub database: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "TSA_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "TSA_PORT")]
    pub port: Option<u16>,

    /// Log level: a level name or a number from 0 (everything) to 50
    #[arg(short, long, env = "TSA_LOG")]
    pub logging: Option<String>,

    /// TOML configuration file (default: ~/.config/tsa/config.toml)
    #[arg(short, long, env = "TSA_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Values that take precedence over the TOML file
    pub fn overrides(&self) -> BootstrapOverrides {
        BootstrapOverrides {
            database_path: self.database.clone(),
            host: self.host.clone(),
            port: self.port,
            log_level: self.logging.clone(),
        }
    }
}
