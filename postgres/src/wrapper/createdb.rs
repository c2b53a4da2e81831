use common::ConnectionConfig;

use super::connection_args;
use crate::process::Invocation;

/// Wrapper for the createdb utility
pub struct CreateDb;

impl CreateDb {
    pub const PROGRAM: &'static str = "createdb";

    /// Creates `config.database` from `template0` with UTF8 encoding, so a
    /// custom-format dump restores into a pristine database.
    pub fn invocation(config: &ConnectionConfig) -> Invocation {
        let mut args = connection_args(config);
        args.extend([
            "--echo".to_string(),
            "--template=template0".to_string(),
            "--encoding=UTF8".to_string(),
            "--".to_string(),
            config.database.clone(),
        ]);

        Invocation::new(Self::PROGRAM, args)
            .with_secret(config.secret())
            .log_output(true)
    }
}
