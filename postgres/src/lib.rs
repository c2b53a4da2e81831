pub mod backup;
pub mod catalog;
pub mod locator;
pub mod process;
pub mod restore;
pub mod wrapper;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostgresError {
    #[error("Backup file not found")]
    BackupFileNotFound,

    #[error("Can't create directory {path:?}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Subprocess(String),

    #[error("{0}")]
    Timeout(String),

    #[error("Required PostgreSQL tool is not available: {0}")]
    ToolMissing(String),
}

pub type Result<T> = std::result::Result<T, PostgresError>;

// Re-export key types for convenience
pub use backup::BackupOrchestrator;
pub use catalog::PsqlCatalog;
pub use locator::BackupLocator;
pub use process::{ActionResult, CommandRunner, Invocation, ProcessInvoker};
pub use restore::{RestoreMode, RestoreOrchestrator};
