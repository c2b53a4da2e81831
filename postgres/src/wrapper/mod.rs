pub mod createdb;
pub mod pg_dump;
pub mod pg_restore;
pub mod psql;

// Re-export for convenience
pub use createdb::CreateDb;
pub use pg_dump::PgDump;
pub use pg_restore::PgRestore;
pub use psql::Psql;

use common::ConnectionConfig;
use log::debug;

use crate::process::{CommandRunner, Invocation};
use crate::PostgresError;

/// Client tools that must be installed before the service starts.
pub const REQUIRED_TOOLS: [&str; 4] = [
    Psql::PROGRAM,
    PgDump::PROGRAM,
    PgRestore::PROGRAM,
    CreateDb::PROGRAM,
];

/// Server address, role and `--no-password`, shared by every tool.
///
/// `--no-password` makes a tool fail instead of prompting when
/// `PGPASSWORD` is absent or wrong.
pub(crate) fn connection_args(config: &ConnectionConfig) -> Vec<String> {
    vec![
        "-h".to_string(),
        config.host.clone(),
        "-p".to_string(),
        config.port.clone(),
        "-U".to_string(),
        config.user.clone(),
        "--no-password".to_string(),
    ]
}

/// Checks that every required tool answers `--version`.
pub async fn check_tools(runner: &dyn CommandRunner) -> Result<(), PostgresError> {
    for tool in REQUIRED_TOOLS {
        let result = runner.invoke(Invocation::new(tool, ["--version"])).await;
        if !result.succeeded {
            return Err(PostgresError::ToolMissing(tool.to_string()));
        }
        debug!("{tool} is available");
    }
    Ok(())
}
