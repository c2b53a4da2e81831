use axum::http::StatusCode;
use postgres::PostgresError;
use thiserror::Error;

/// Everything that can go wrong while serving a trigger request.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Environment variables not set")]
    ConfigurationUnavailable,

    #[error("{message}")]
    MalformedInput { status: StatusCode, message: String },

    #[error("POST data doesn't have sufficient data")]
    InsufficientConfiguration,

    #[error("Unsupported HTTP method")]
    UnsupportedOperation,

    #[error("File name is not set in request URL")]
    MissingFileName,

    #[error(transparent)]
    Postgres(#[from] PostgresError),
}

impl ApiError {
    pub fn malformed(message: impl Into<String>) -> Self {
        ApiError::MalformedInput {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn body_too_large() -> Self {
        ApiError::MalformedInput {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "Request body must not be larger than 1MB".to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ConfigurationUnavailable => StatusCode::NOT_IMPLEMENTED,
            ApiError::MalformedInput { status, .. } => *status,
            ApiError::InsufficientConfiguration | ApiError::MissingFileName => {
                StatusCode::BAD_REQUEST
            }
            ApiError::UnsupportedOperation => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Postgres(PostgresError::BackupFileNotFound) => StatusCode::BAD_REQUEST,
            ApiError::Postgres(PostgresError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Postgres(
                PostgresError::Storage { .. }
                | PostgresError::Subprocess(_)
                | PostgresError::ToolMissing(_),
            ) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_each_kind_to_its_status() {
        let cases = [
            (ApiError::ConfigurationUnavailable, 501),
            (ApiError::malformed("bad"), 400),
            (ApiError::body_too_large(), 413),
            (ApiError::InsufficientConfiguration, 400),
            (ApiError::UnsupportedOperation, 405),
            (ApiError::MissingFileName, 400),
            (PostgresError::BackupFileNotFound.into(), 400),
            (PostgresError::Subprocess("x".into()).into(), 500),
            (PostgresError::Timeout("x".into()).into(), 504),
            (
                PostgresError::Storage {
                    path: "/backups/h".into(),
                    source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                }
                .into(),
                500,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.status_code().as_u16(), status, "{error:?}");
        }
    }

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(
            ApiError::ConfigurationUnavailable.to_string(),
            "Environment variables not set"
        );
        assert_eq!(
            ApiError::from(PostgresError::BackupFileNotFound).to_string(),
            "Backup file not found"
        );
    }
}
