use axum::http::{Method, Uri};
use log::info;

use crate::response::ActionReply;

pub const ACTION: &str = "status";

/// Liveness check; answers any method.
pub async fn status(method: Method, uri: Uri) -> ActionReply {
    info!("Request [{method}] URI: {uri}, handler: {ACTION}");
    ActionReply::ok(ACTION)
}
