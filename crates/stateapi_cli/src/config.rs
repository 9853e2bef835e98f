//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use stateapi_core::default_log_level;

use crate::cli::Cli;

const IN_MEMORY_DB: &str = ":memory:";

/// Where State records are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    Memory,
    File(PathBuf),
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub db: DbLocation,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl ServerConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let db = if cli.db_path.as_os_str() == IN_MEMORY_DB {
            DbLocation::Memory
        } else {
            DbLocation::File(cli.db_path.clone())
        };

        Self {
            listen_addr: SocketAddr::new(cli.host, cli.port),
            db,
            log_level: cli
                .log_level
                .clone()
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: cli.log_dir.clone(),
        }
    }
}
