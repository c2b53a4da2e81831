use anyhow::Result;
use axum::http::Method;
use common::config::ServiceConfig;
use postgres::ProcessInvoker;
use std::sync::Arc;

use crate::handlers::backup::perform;
use crate::AppState;

/// One-shot backup of the database named by the configured defaults.
pub async fn execute(config: &ServiceConfig) -> Result<()> {
    let runner = Arc::new(ProcessInvoker::new(config.command_timeout()));
    let state = AppState::new(config, runner);
    super::report(perform(&state, &Method::GET, &[]).await)
}
