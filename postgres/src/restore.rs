use common::ConnectionConfig;
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::catalog::PsqlCatalog;
use crate::locator::BackupLocator;
use crate::process::CommandRunner;
use crate::wrapper::{CreateDb, PgRestore};
use crate::PostgresError;

/// How a successful restore reached its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreMode {
    /// The database existed; objects were dropped and recreated.
    CleanExisting,
    /// The database was created first and restored into while empty.
    CreatedDatabase,
}

/// Restores dumps so that their contents become authoritative, whether or
/// not the target database existed beforehand.
#[derive(Clone)]
pub struct RestoreOrchestrator {
    runner: Arc<dyn CommandRunner>,
    catalog: PsqlCatalog,
    locator: BackupLocator,
}

impl RestoreOrchestrator {
    pub fn new(runner: Arc<dyn CommandRunner>, locator: BackupLocator) -> Self {
        Self {
            catalog: PsqlCatalog::new(runner.clone()),
            runner,
            locator,
        }
    }

    /// Resolves a client-supplied file name to a dump under the backups root.
    pub async fn locate(&self, file_name: &str) -> Result<PathBuf, PostgresError> {
        self.locator.locate(file_name).await
    }

    /// Restores the dump named `file_name` into `config.database`.
    ///
    /// An unknown or out-of-root file fails with `BackupFileNotFound`
    /// before anything touches the server.
    pub async fn restore(
        &self,
        config: &ConnectionConfig,
        file_name: &str,
    ) -> Result<RestoreMode, PostgresError> {
        let dump_file = self.locate(file_name).await?;
        self.restore_located(config, &dump_file).await
    }

    /// Restores a dump already resolved by [`RestoreOrchestrator::locate`].
    pub async fn restore_located(
        &self,
        config: &ConnectionConfig,
        dump_file: &Path,
    ) -> Result<RestoreMode, PostgresError> {
        info!("Restoring {dump_file:?} into {config}");

        let mode = if self.catalog.database_exists(config).await? {
            RestoreMode::CleanExisting
        } else {
            info!("Database {} does not exist, creating it", config.database);
            self.runner
                .invoke(CreateDb::invocation(config))
                .await
                .into_result("createdb execution error")?;
            RestoreMode::CreatedDatabase
        };

        let clean = mode == RestoreMode::CleanExisting;
        self.runner
            .invoke(PgRestore::invocation(config, dump_file, clean))
            .await
            .into_result("pg_restore execution error")?;

        info!("Restore of {dump_file:?} into {config} completed ({mode:?})");
        Ok(mode)
    }
}
