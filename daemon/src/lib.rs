pub mod cli;
pub mod error;
pub mod handlers;
pub mod resolver;
pub mod response;
pub mod server;

use common::config::ServiceConfig;
use common::ConnectionConfig;
use postgres::{BackupLocator, BackupOrchestrator, CommandRunner, RestoreOrchestrator};
use std::sync::Arc;

pub use error::ApiError;
pub use response::{ActionReply, ActionResponse, Status};
pub use server::HttpServer;

/// Everything a request handler needs. Built once before serving and
/// shared read-only between requests.
#[derive(Clone)]
pub struct AppState {
    pub defaults: Option<ConnectionConfig>,
    pub use_directory_layout: bool,
    pub backup_enabled: bool,
    pub restore_enabled: bool,
    pub backups: BackupOrchestrator,
    pub restores: RestoreOrchestrator,
}

impl AppState {
    pub fn new(config: &ServiceConfig, runner: Arc<dyn CommandRunner>) -> Self {
        let locator = BackupLocator::new(config.backups_root.clone());
        Self {
            defaults: config.connection_defaults(),
            use_directory_layout: config.use_directory_layout(),
            backup_enabled: config.backup_enabled,
            restore_enabled: config.restore_enabled,
            backups: BackupOrchestrator::new(runner.clone(), locator.clone()),
            restores: RestoreOrchestrator::new(runner, locator),
        }
    }
}
