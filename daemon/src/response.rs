use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
    Skipped,
}

/// The only body shape any endpoint returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub status: Status,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl ActionResponse {
    fn new(status: Status, action: &str) -> Self {
        Self {
            status,
            action: action.to_string(),
            message: None,
            file: None,
        }
    }

    fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into()).filter(|m: &String| !m.is_empty());
        self
    }
}

/// An `ActionResponse` together with the HTTP status it is sent with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReply {
    pub status: StatusCode,
    pub body: ActionResponse,
}

impl ActionReply {
    pub fn ok(action: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: ActionResponse::new(Status::Ok, action),
        }
    }

    pub fn ok_with_file(action: &str, file: impl Into<String>) -> Self {
        let mut reply = Self::ok(action);
        reply.body.file = Some(file.into()).filter(|f: &String| !f.is_empty());
        reply
    }

    /// The operation was intentionally not carried out.
    pub fn skipped(action: &str, message: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: ActionResponse::new(Status::Skipped, action).with_message(message),
        }
    }

    pub fn error(action: &str, err: &ApiError) -> Self {
        let status = err.status_code();
        if status.is_server_error() {
            error!("[{action}] {status}: {err}");
        } else {
            warn!("[{action}] {status}: {err}");
        }
        Self {
            status,
            body: ActionResponse::new(Status::Error, action).with_message(err.to_string()),
        }
    }

    /// Normalizes a handler outcome; `on_ok` builds the success reply.
    pub fn from_result<T>(
        action: &str,
        result: Result<T, ApiError>,
        on_ok: impl FnOnce(T) -> ActionReply,
    ) -> Self {
        match result {
            Ok(value) => on_ok(value),
            Err(err) => Self::error(action, &err),
        }
    }
}

impl IntoResponse for ActionReply {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.body) {
            Ok(bytes) => (
                self.status,
                [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
                bytes,
            )
                .into_response(),
            Err(e) => {
                error!("Failed to encode response: {e}");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postgres::PostgresError;

    fn json(reply: &ActionReply) -> String {
        serde_json::to_string(&reply.body).unwrap()
    }

    #[test]
    fn success_omits_empty_fields() {
        let reply = ActionReply::ok("status");
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(json(&reply), r#"{"status":"ok","action":"status"}"#);
    }

    #[test]
    fn success_with_file() {
        let reply = ActionReply::ok_with_file("backup", "/backups/h_d_20240101_000000.dump");
        assert_eq!(
            json(&reply),
            r#"{"status":"ok","action":"backup","file":"/backups/h_d_20240101_000000.dump"}"#
        );
    }

    #[test]
    fn error_carries_message_and_status() {
        let reply = ActionReply::error("restore", &PostgresError::BackupFileNotFound.into());
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json(&reply),
            r#"{"status":"error","action":"restore","message":"Backup file not found"}"#
        );
    }

    #[test]
    fn skipped_is_ok_status() {
        let reply = ActionReply::skipped("backup", "Backup is disabled");
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body.status, Status::Skipped);
    }

    #[test]
    fn sets_json_content_type() {
        let response = ActionReply::ok("status").into_response();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            JSON_CONTENT_TYPE
        );
    }
}
