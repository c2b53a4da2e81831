use anyhow::Result;
use axum::http::Method;
use common::config::ServiceConfig;
use postgres::ProcessInvoker;
use std::sync::Arc;

use crate::handlers::restore::perform;
use crate::AppState;

/// One-shot restore of `file` into the database named by the configured defaults.
pub async fn execute(config: &ServiceConfig, file: &str) -> Result<()> {
    let runner = Arc::new(ProcessInvoker::new(config.command_timeout()));
    let state = AppState::new(config, runner);
    super::report(perform(&state, &Method::GET, &[], Some(file)).await)
}
