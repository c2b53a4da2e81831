use chrono::Local;
use common::ConnectionConfig;
use log::{error, info, warn};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::locator::BackupLocator;
use crate::process::CommandRunner;
use crate::wrapper::PgDump;
use crate::PostgresError;

/// Produces custom-format dumps under the backups root.
#[derive(Clone)]
pub struct BackupOrchestrator {
    runner: Arc<dyn CommandRunner>,
    locator: BackupLocator,
}

impl BackupOrchestrator {
    pub fn new(runner: Arc<dyn CommandRunner>, locator: BackupLocator) -> Self {
        Self { runner, locator }
    }

    /// Dumps `config.database` and returns the path of the new file.
    ///
    /// A failed dump leaves no file behind.
    pub async fn backup(
        &self,
        config: &ConnectionConfig,
        use_directory_layout: bool,
    ) -> Result<PathBuf, PostgresError> {
        info!("Starting backup of {config}");

        let file = self
            .locator
            .destination(config, use_directory_layout, Local::now())
            .await
            .inspect_err(|e| error!("Backup of {config} aborted: {e}"))?;

        match self
            .runner
            .invoke(PgDump::invocation(config, &file))
            .await
            .into_result("")
        {
            Ok(_) => {
                info!("Backup of {config} written to {file:?}");
                Ok(file)
            }
            Err(e) => {
                remove_partial_dump(&file).await;
                Err(e)
            }
        }
    }
}

async fn remove_partial_dump(file: &Path) {
    match tokio::fs::remove_file(file).await {
        Ok(()) => info!("Removed partial dump {file:?}"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove partial dump {file:?}: {e}"),
    }
}
