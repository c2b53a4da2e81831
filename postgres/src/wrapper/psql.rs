use common::ConnectionConfig;

use super::connection_args;
use crate::process::Invocation;

/// Database psql connects to for catalog queries.
pub const MAINTENANCE_DB: &str = "postgres";

/// Wrapper for psql, used for single-value catalog queries
pub struct Psql;

impl Psql {
    pub const PROGRAM: &'static str = "psql";

    /// Runs `sql` with unaligned, header-less output. The output is kept
    /// because the caller parses it.
    pub fn query(config: &ConnectionConfig, sql: &str) -> Invocation {
        let mut args = connection_args(config);
        args.extend([
            "--tuples-only".to_string(),
            "--no-align".to_string(),
            "--dbname".to_string(),
            MAINTENANCE_DB.to_string(),
            "-c".to_string(),
            sql.to_string(),
        ]);

        Invocation::new(Self::PROGRAM, args)
            .with_secret(config.secret())
            .log_output(true)
            .capture_output()
    }
}

/// Quotes `value` as an SQL string literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
