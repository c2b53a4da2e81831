use common::ConnectionConfig;
use std::path::Path;

use super::connection_args;
use crate::process::Invocation;

/// Wrapper for pg_restore utility
pub struct PgRestore;

impl PgRestore {
    pub const PROGRAM: &'static str = "pg_restore";

    /// Restores `dump_file` into `config.database`.
    ///
    /// With `clean` set, existing objects are dropped before they are
    /// recreated from the dump.
    pub fn invocation(config: &ConnectionConfig, dump_file: &Path, clean: bool) -> Invocation {
        let mut args = connection_args(config);
        if clean {
            args.push("--clean".to_string());
        }
        args.extend([
            "-d".to_string(),
            config.database.clone(),
            dump_file.to_string_lossy().into_owned(),
        ]);

        Invocation::new(Self::PROGRAM, args)
            .with_secret(config.secret())
            .log_output(true)
    }
}
