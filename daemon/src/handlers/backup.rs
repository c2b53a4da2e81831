use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{Method, Uri};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ApiError;
use crate::resolver::resolve;
use crate::response::ActionReply;
use crate::AppState;

pub const ACTION: &str = "backup";

pub async fn backup(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    body: Result<Bytes, BytesRejection>,
) -> ActionReply {
    info!("Request [{method}] URI: {uri}, handler: {ACTION}");
    match super::request_body(&method, body) {
        Ok(body) => perform(&state, &method, &body).await,
        Err(e) => ActionReply::error(ACTION, &e),
    }
}

/// Runs one backup trigger and normalizes the outcome.
pub async fn perform(state: &AppState, method: &Method, body: &[u8]) -> ActionReply {
    if !state.backup_enabled {
        return ActionReply::skipped(ACTION, "Backup is disabled");
    }
    ActionReply::from_result(ACTION, run(state, method, body).await, |file| {
        ActionReply::ok_with_file(ACTION, file.display().to_string())
    })
}

async fn run(state: &AppState, method: &Method, body: &[u8]) -> Result<PathBuf, ApiError> {
    let config = resolve(method, body, state.defaults.as_ref())?;
    Ok(state
        .backups
        .backup(&config, state.use_directory_layout)
        .await?)
}
