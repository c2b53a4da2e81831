use chrono::{DateTime, TimeZone};
use common::ConnectionConfig;
use log::{debug, warn};
use std::fmt::Display;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::PostgresError;

/// Timestamp embedded in dump file names, one-second resolution.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Maps backups to files under a single root directory.
#[derive(Debug, Clone)]
pub struct BackupLocator {
    root: PathBuf,
}

impl BackupLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path for a new dump of `config` taken at `taken_at`.
    ///
    /// Flat layout: `<root>/<host>_<db>_<timestamp>.dump`.
    /// Directory layout: `<root>/<host>/<db>/<timestamp>.dump`, creating the
    /// directories as needed.
    pub async fn destination<Tz>(
        &self,
        config: &ConnectionConfig,
        use_directory_layout: bool,
        taken_at: DateTime<Tz>,
    ) -> Result<PathBuf, PostgresError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let timestamp = taken_at.format(TIMESTAMP_FORMAT);
        let host = path_component(&config.host);
        let database = path_component(&config.database);

        if !use_directory_layout {
            return Ok(self.root.join(format!("{host}_{database}_{timestamp}.dump")));
        }

        let dir = self.root.join(host).join(database);
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| PostgresError::Storage {
                path: dir.clone(),
                source,
            })?;
        Ok(dir.join(format!("{timestamp}.dump")))
    }

    /// Resolves a client-supplied file name to an existing dump under the root.
    ///
    /// Leading `/` and `.` characters are stripped, any remaining `..` or
    /// absolute component is rejected, and the resolved path must stay inside
    /// the root after symlinks are followed.
    pub async fn locate(&self, file_name: &str) -> Result<PathBuf, PostgresError> {
        let trimmed = file_name.trim_start_matches(['/', '.']);
        let relative = Path::new(trimmed);
        if trimmed.is_empty()
            || relative
                .components()
                .any(|component| !matches!(component, Component::Normal(_)))
        {
            warn!("Rejected backup file reference {file_name:?}");
            return Err(PostgresError::BackupFileNotFound);
        }

        let candidate = self.root.join(relative);
        let (root, resolved) = match (
            fs::canonicalize(&self.root).await,
            fs::canonicalize(&candidate).await,
        ) {
            (Ok(root), Ok(resolved)) => (root, resolved),
            (Err(e), _) | (_, Err(e)) => {
                debug!("Backup file {candidate:?} is not accessible: {e}");
                return Err(PostgresError::BackupFileNotFound);
            }
        };

        if !resolved.starts_with(&root) {
            warn!("Backup file {candidate:?} resolves outside {root:?}");
            return Err(PostgresError::BackupFileNotFound);
        }

        match fs::metadata(&resolved).await {
            Ok(metadata) if metadata.is_file() => Ok(candidate),
            _ => Err(PostgresError::BackupFileNotFound),
        }
    }
}

/// Turns a host or database name into a single, harmless path component.
fn path_component(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    if cleaned.chars().all(|c| c == '.') {
        cleaned.replace('.', "_")
    } else {
        cleaned
    }
}
