use serde::Deserialize;
use std::fmt;

/// Port used when neither the environment nor the request names one.
pub const DEFAULT_PORT: &str = "5432";

/// Connection parameters handed to the PostgreSQL client tools.
///
/// Request bodies use the short wire names `db` and `pass`; `database` and
/// `password` are accepted as aliases.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: String,
    #[serde(default, rename = "db", alias = "database")]
    pub database: String,
    #[serde(default)]
    pub user: String,
    #[serde(default, rename = "pass", alias = "password")]
    pub password: String,
}

impl ConnectionConfig {
    pub fn new(
        host: impl Into<String>,
        port: impl Into<String>,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            database: database.into(),
            user: user.into(),
            password: password.into(),
        }
        .with_default_port()
    }

    /// Host, database and user are required; port and password are not.
    pub fn is_valid(&self) -> bool {
        !self.host.is_empty() && !self.database.is_empty() && !self.user.is_empty()
    }

    /// Returns the config only if it carries the required fields.
    pub fn validated(self) -> Option<Self> {
        if self.is_valid() {
            Some(self)
        } else {
            None
        }
    }

    pub fn with_default_port(mut self) -> Self {
        if self.port.trim().is_empty() {
            self.port = DEFAULT_PORT.to_string();
        }
        self
    }

    /// The secret to inject as `PGPASSWORD`, if any.
    pub fn secret(&self) -> Option<&str> {
        if self.password.is_empty() {
            None
        } else {
            Some(&self.password)
        }
    }
}

// The password never reaches logs.
impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .finish()
    }
}

impl fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}
