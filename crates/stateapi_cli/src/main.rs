//! State API server binary.
//!
//! Wires configuration, logging, storage and the HTTP router together.

mod cli;
mod config;

use anyhow::{anyhow, Context};
use log::info;
use stateapi_core::db::{open_db, open_db_in_memory};
use stateapi_core::init_logging;
use stateapi_http::{create_router, AppState, API_PREFIX};

use crate::cli::Cli;
use crate::config::{DbLocation, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    let config = ServerConfig::from_cli(&cli);

    init_logging(&config.log_level, config.log_dir.as_deref())
        .map_err(|err| anyhow!("failed to initialize logging: {err}"))?;

    let conn = match &config.db {
        DbLocation::Memory => open_db_in_memory(),
        DbLocation::File(path) => open_db(path),
    }
    .context("failed to open database")?;

    let router = create_router(AppState::new(conn));
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    info!(
        "event=server_start module=cli status=ok addr={} prefix={} version={}",
        config.listen_addr,
        API_PREFIX,
        stateapi_core::core_version()
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("event=server_stop module=cli status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("event=shutdown_signal module=cli status=error error={err}");
        std::future::pending::<()>().await;
    }
}
