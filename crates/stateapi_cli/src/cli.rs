//! Command-line argument parsing.

use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;

/// State API server.
#[derive(Parser, Debug, Clone)]
#[command(name = "stateapi")]
#[command(about = "HTTP CRUD service for State records")]
#[command(version)]
pub struct Cli {
    /// Address to bind.
    #[arg(long, env = "STATEAPI_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to bind.
    #[arg(long, env = "STATEAPI_PORT", default_value_t = 5000)]
    pub port: u16,

    /// SQLite database file, or `:memory:`.
    #[arg(long, env = "STATEAPI_DB_PATH", default_value = "stateapi.sqlite3")]
    pub db_path: PathBuf,

    /// Log level (trace, debug, info, warn, error). Defaults by build mode.
    #[arg(long, env = "STATEAPI_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; stderr when unset.
    #[arg(long, env = "STATEAPI_LOG_DIR")]
    pub log_dir: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cli = Cli::try_parse_from(["stateapi"]).unwrap();
        assert_eq!(cli.host.to_string(), "0.0.0.0");
        assert_eq!(cli.port, 5000);
        assert_eq!(cli.db_path, PathBuf::from("stateapi.sqlite3"));
        assert!(cli.log_dir.is_none());
    }

    #[test]
    fn explicit_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "stateapi",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--db-path",
            ":memory:",
            "--log-level",
            "warn",
        ])
        .unwrap();
        assert_eq!(cli.port, 8080);
        assert_eq!(cli.db_path, PathBuf::from(":memory:"));
        assert_eq!(cli.log_level.as_deref(), Some("warn"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(Cli::try_parse_from(["stateapi", "--port", "70000"]).is_err());
    }
}
