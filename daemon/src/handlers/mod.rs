pub mod backup;
pub mod restore;
pub mod status;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::http::{Method, StatusCode};

use crate::error::ApiError;

/// Only write-style triggers carry a body worth reading.
fn request_body(method: &Method, body: Result<Bytes, BytesRejection>) -> Result<Bytes, ApiError> {
    if *method != Method::POST {
        return Ok(Bytes::new());
    }
    body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::body_too_large()
        } else {
            ApiError::malformed(rejection.body_text())
        }
    })
}
