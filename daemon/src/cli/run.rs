use anyhow::Result;
use log::{error, info, warn};
use postgres::wrapper::check_tools;
use postgres::ProcessInvoker;
use std::sync::Arc;
use tokio::signal;

use common::config::ServiceConfig;

use crate::{AppState, HttpServer};

pub async fn execute(config: ServiceConfig) -> Result<()> {
    info!("Running pgtrigger in the foreground...");

    let runner = Arc::new(ProcessInvoker::new(config.command_timeout()));
    if let Err(e) = check_tools(runner.as_ref()).await {
        error!("{e}");
        return Err(e.into());
    }

    let state = AppState::new(&config, runner);
    match &state.defaults {
        Some(defaults) => info!(
            "PostgreSQL connection settings set in environment variables: {defaults}"
        ),
        None => info!("No PostgreSQL connection settings in environment, GET triggers are disabled"),
    }
    info!("Backups root: {:?}", config.backups_root);
    if !config.backup_enabled {
        warn!("Backups are disabled by configuration");
    }
    if !config.restore_enabled {
        warn!("Restores are disabled by configuration");
    }

    let result = HttpServer::new(config.listen_addr.clone(), state)
        .start(shutdown_signal())
        .await;

    if let Err(ref e) = result {
        error!("Server error: {e}");
    }
    info!("Shutdown complete");
    result
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down...");
}
