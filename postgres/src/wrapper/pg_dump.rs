use common::ConnectionConfig;
use std::path::Path;

use super::connection_args;
use crate::process::Invocation;

/// Wrapper for pg_dump command
pub struct PgDump;

impl PgDump {
    pub const PROGRAM: &'static str = "pg_dump";

    /// Verbose custom-format dump of `config.database` into `file`.
    pub fn invocation(config: &ConnectionConfig, file: &Path) -> Invocation {
        let mut args = connection_args(config);
        args.extend([
            "-Fc".to_string(),
            "-v".to_string(),
            "--dbname".to_string(),
            config.database.clone(),
            "-f".to_string(),
            file.to_string_lossy().into_owned(),
        ]);

        Invocation::new(Self::PROGRAM, args)
            .with_secret(config.secret())
            .log_output(true)
    }
}
