use common::ConnectionConfig;
use log::debug;
use std::sync::Arc;

use crate::process::CommandRunner;
use crate::wrapper::psql::{quote_literal, Psql};
use crate::PostgresError;

/// Answers yes/no questions about a server by running psql.
///
/// The text protocol stays behind [`PsqlCatalog::query_boolean`]: a query
/// is true only when psql prints exactly `1`.
#[derive(Clone)]
pub struct PsqlCatalog {
    runner: Arc<dyn CommandRunner>,
}

impl PsqlCatalog {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Runs a single-row, single-column query and reads it as a boolean.
    pub async fn query_boolean(
        &self,
        config: &ConnectionConfig,
        sql: &str,
    ) -> Result<bool, PostgresError> {
        let output = self
            .runner
            .invoke(Psql::query(config, sql))
            .await
            .into_result("psql query execution error")?;
        Ok(parse_boolean_output(&output))
    }

    pub async fn database_exists(&self, config: &ConnectionConfig) -> Result<bool, PostgresError> {
        let sql = format!(
            "SELECT 1 FROM pg_database WHERE datname = {}",
            quote_literal(&config.database)
        );
        let exists = self.query_boolean(config, &sql).await?;
        debug!("Database {} exists: {exists}", config.database);
        Ok(exists)
    }
}

/// Partial or garbled output never counts as true.
pub fn parse_boolean_output(output: &str) -> bool {
    output.trim() == "1"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{ActionResult, Invocation};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Scripted {
        result: ActionResult,
        seen: Mutex<Vec<Invocation>>,
    }

    #[async_trait]
    impl CommandRunner for Scripted {
        async fn invoke(&self, invocation: Invocation) -> ActionResult {
            self.seen.lock().unwrap().push(invocation);
            self.result.clone()
        }
    }

    fn catalog(result: ActionResult) -> (PsqlCatalog, Arc<Scripted>) {
        let runner = Arc::new(Scripted {
            result,
            seen: Mutex::new(Vec::new()),
        });
        (PsqlCatalog::new(runner.clone()), runner)
    }

    fn config(database: &str) -> ConnectionConfig {
        ConnectionConfig::new("h", "5432", database, "u", "pw")
    }

    #[test]
    fn only_exact_one_is_true() {
        assert!(parse_boolean_output("1"));
        assert!(parse_boolean_output(" 1 \n"));
        assert!(!parse_boolean_output(""));
        assert!(!parse_boolean_output("0"));
        assert!(!parse_boolean_output("11"));
        assert!(!parse_boolean_output("1\n1"));
        assert!(!parse_boolean_output("?column?\n1"));
    }

    #[tokio::test]
    async fn existing_database_reads_true() {
        let (catalog, runner) = catalog(ActionResult::success("1\n"));
        assert!(catalog.database_exists(&config("orders")).await.unwrap());

        let seen = runner.seen.lock().unwrap();
        assert_eq!(seen[0].program, "psql");
        assert_eq!(
            seen[0].args.last().map(String::as_str),
            Some("SELECT 1 FROM pg_database WHERE datname = 'orders'")
        );
        assert_eq!(seen[0].secret.as_deref(), Some("pw"));
    }

    #[tokio::test]
    async fn empty_output_reads_false() {
        let (catalog, _) = catalog(ActionResult::success(""));
        assert!(!catalog.database_exists(&config("orders")).await.unwrap());
    }

    #[tokio::test]
    async fn quotes_database_name() {
        let (catalog, runner) = catalog(ActionResult::success(""));
        catalog.database_exists(&config("x' OR '1'='1")).await.unwrap();

        let seen = runner.seen.lock().unwrap();
        assert_eq!(
            seen[0].args.last().map(String::as_str),
            Some("SELECT 1 FROM pg_database WHERE datname = 'x'' OR ''1''=''1'")
        );
    }

    #[tokio::test]
    async fn failure_wraps_diagnostic() {
        let (catalog, _) = catalog(ActionResult::failure("psql failed, error: exit status: 2"));
        let err = catalog.database_exists(&config("orders")).await.unwrap_err();
        assert!(matches!(err, PostgresError::Subprocess(_)));
        assert!(err.to_string().contains("exit status: 2"));
    }
}
