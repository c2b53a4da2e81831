use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{Method, Uri};
use log::info;
use postgres::RestoreMode;
use std::sync::Arc;

use crate::error::ApiError;
use crate::resolver::resolve;
use crate::response::ActionReply;
use crate::AppState;

pub const ACTION: &str = "restore";

/// Query pairs in request order; a repeated `file` keeps its first value.
type QueryPairs = Vec<(String, String)>;

pub async fn restore(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    query: Result<Query<QueryPairs>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> ActionReply {
    info!("Request [{method}] URI: {uri}, handler: {ACTION}");
    let file = match query {
        Ok(Query(pairs)) => first_file(pairs),
        Err(rejection) => {
            return ActionReply::error(ACTION, &ApiError::malformed(rejection.body_text()))
        }
    };
    match super::request_body(&method, body) {
        Ok(body) => perform(&state, &method, &body, file.as_deref()).await,
        Err(e) => ActionReply::error(ACTION, &e),
    }
}

fn first_file(pairs: QueryPairs) -> Option<String> {
    pairs
        .into_iter()
        .find(|(key, _)| key == "file")
        .map(|(_, value)| value)
}

/// Runs one restore trigger and normalizes the outcome.
///
/// The dump must exist before the connection is resolved.
pub async fn perform(
    state: &AppState,
    method: &Method,
    body: &[u8],
    file: Option<&str>,
) -> ActionReply {
    if !state.restore_enabled {
        return ActionReply::skipped(ACTION, "Restore is disabled");
    }
    ActionReply::from_result(ACTION, run(state, method, body, file).await, |_| {
        ActionReply::ok(ACTION)
    })
}

async fn run(
    state: &AppState,
    method: &Method,
    body: &[u8],
    file: Option<&str>,
) -> Result<RestoreMode, ApiError> {
    let file = file
        .filter(|name| !name.is_empty())
        .ok_or(ApiError::MissingFileName)?;
    let dump_file = state.restores.locate(file).await?;
    let config = resolve(method, body, state.defaults.as_ref())?;
    Ok(state.restores.restore_located(&config, &dump_file).await?)
}
