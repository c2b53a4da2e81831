use config::{Config, ConfigError, Environment, File};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::connection::{ConnectionConfig, DEFAULT_PORT};

/// Configuration files consulted in order; later files override earlier ones.
pub const CONFIG_PATHS: [&str; 3] = [
    "/etc/pgtrigger/pgtrigger.toml",
    "~/.config/pgtrigger/pgtrigger.toml",
    "pgtrigger.toml",
];

/// Process-wide settings, read once at startup.
///
/// The `pg_*` keys map onto the `PG_HOST`, `PG_PORT`, `PG_DB`, `PG_USER` and
/// `PG_PASS` environment variables and provide the connection used by
/// read-style (GET) triggers.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub listen_addr: String,
    pub backups_root: PathBuf,
    pub command_timeout_secs: u64,
    pub use_dir_structure: String,
    pub backup_enabled: bool,
    pub restore_enabled: bool,
    pub pg_host: String,
    pub pg_port: String,
    pub pg_db: String,
    pub pg_user: String,
    pub pg_pass: String,
}

impl ServiceConfig {
    /// Connection defaults, or `None` when host, database or user is missing.
    pub fn connection_defaults(&self) -> Option<ConnectionConfig> {
        ConnectionConfig::new(
            self.pg_host.clone(),
            self.pg_port.clone(),
            self.pg_db.clone(),
            self.pg_user.clone(),
            self.pg_pass.clone(),
        )
        .validated()
    }

    pub fn use_directory_layout(&self) -> bool {
        self.use_dir_structure.eq_ignore_ascii_case("TRUE")
    }

    /// `None` disables the subprocess timeout.
    pub fn command_timeout(&self) -> Option<Duration> {
        match self.command_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Renders the configuration as TOML with the password masked.
    pub fn to_redacted_toml(&self) -> Result<String, toml::ser::Error> {
        let mut redacted = self.clone();
        if !redacted.pg_pass.is_empty() {
            redacted.pg_pass = "***".to_string();
        }
        toml::to_string_pretty(&redacted)
    }
}

/// Loads the configuration from the standard file locations and the process
/// environment.
pub fn load_config() -> Result<ServiceConfig, ConfigError> {
    load_config_from(&CONFIG_PATHS, Environment::default())
}

/// Loads the configuration from explicit file paths and environment source.
///
/// Files that do not exist are skipped. Empty environment values are ignored
/// so that `PG_PORT=""` keeps the default port.
pub fn load_config_from(paths: &[&str], env: Environment) -> Result<ServiceConfig, ConfigError> {
    let config_builder = Config::builder()
        .set_default("listen_addr", "0.0.0.0:80")?
        .set_default("backups_root", "/backups")?
        .set_default("command_timeout_secs", 3600)?
        .set_default("use_dir_structure", "")?
        .set_default("backup_enabled", true)?
        .set_default("restore_enabled", true)?
        .set_default("pg_host", "")?
        .set_default("pg_port", DEFAULT_PORT)?
        .set_default("pg_db", "")?
        .set_default("pg_user", "")?
        .set_default("pg_pass", "")?;

    let config_builder = paths.iter().fold(config_builder, |builder, path| {
        let path = match shellexpand::full(path) {
            Ok(expanded) => expanded.into_owned(),
            Err(e) => {
                warn!("Skipping config path {path}: {e}");
                return builder;
            }
        };
        if Path::new(&path).exists() {
            debug!("Reading configuration from {path}");
            builder.add_source(File::with_name(&path))
        } else {
            builder
        }
    });

    config_builder
        .add_source(env.ignore_empty(true))
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> Environment {
        let map: config::Map<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::default().source(Some(map))
    }

    #[test]
    fn defaults_without_environment() {
        let config = load_config_from(&[], env_from(&[])).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:80");
        assert_eq!(config.backups_root, PathBuf::from("/backups"));
        assert_eq!(config.pg_port, "5432");
        assert_eq!(config.command_timeout(), Some(Duration::from_secs(3600)));
        assert!(config.backup_enabled);
        assert!(config.restore_enabled);
        assert!(!config.use_directory_layout());
        assert!(config.connection_defaults().is_none());
    }

    #[test]
    fn reads_connection_defaults_from_environment() {
        let config = load_config_from(
            &[],
            env_from(&[
                ("PG_HOST", "db.internal"),
                ("PG_PORT", ""),
                ("PG_DB", "orders"),
                ("PG_USER", "backup"),
                ("PG_PASS", "secret"),
                ("USE_DIR_STRUCTURE", "true"),
            ]),
        )
        .unwrap();

        let defaults = config.connection_defaults().unwrap();
        assert_eq!(defaults.host, "db.internal");
        assert_eq!(defaults.port, "5432");
        assert_eq!(defaults.database, "orders");
        assert_eq!(defaults.user, "backup");
        assert_eq!(defaults.password, "secret");
        assert!(config.use_directory_layout());
    }

    #[test]
    fn incomplete_environment_yields_no_defaults() {
        let config = load_config_from(
            &[],
            env_from(&[("PG_HOST", "db.internal"), ("PG_USER", "backup")]),
        )
        .unwrap();
        assert!(config.connection_defaults().is_none());
    }

    #[test]
    fn zero_timeout_disables_it_and_toggles_parse() {
        let config = load_config_from(
            &[],
            env_from(&[("COMMAND_TIMEOUT_SECS", "0"), ("RESTORE_ENABLED", "false")]),
        )
        .unwrap();
        assert_eq!(config.command_timeout(), None);
        assert!(!config.restore_enabled);
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pgtrigger.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "listen_addr = \"127.0.0.1:8080\"").unwrap();
        writeln!(file, "pg_host = \"from-file\"").unwrap();
        drop(file);

        let path = path.to_string_lossy().into_owned();
        let config =
            load_config_from(&[path.as_str()], env_from(&[("PG_HOST", "from-env")])).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.pg_host, "from-env");
    }

    #[test]
    fn redacted_toml_hides_password() {
        let config = load_config_from(&[], env_from(&[("PG_PASS", "hunter2")])).unwrap();
        let rendered = config.to_redacted_toml().unwrap();
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("pg_pass = \"***\""));
    }
}
