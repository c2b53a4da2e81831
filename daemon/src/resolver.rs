use axum::http::Method;
use common::ConnectionConfig;
use serde_json::error::Category;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Largest request body a write-style trigger accepts.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Fields a request body may carry, all strings.
const CONNECTION_FIELDS: [&str; 7] = ["host", "port", "db", "database", "user", "pass", "password"];

/// Derives the connection for one trigger request.
///
/// GET uses the defaults loaded at startup, POST decodes the body, anything
/// else is rejected.
pub fn resolve(
    method: &Method,
    body: &[u8],
    defaults: Option<&ConnectionConfig>,
) -> Result<ConnectionConfig, ApiError> {
    if *method == Method::GET {
        return defaults.cloned().ok_or(ApiError::ConfigurationUnavailable);
    }
    if *method != Method::POST {
        return Err(ApiError::UnsupportedOperation);
    }

    decode_body(body)?
        .with_default_port()
        .validated()
        .ok_or(ApiError::InsufficientConfiguration)
}

/// Decodes exactly one JSON object into a connection config.
pub fn decode_body(body: &[u8]) -> Result<ConnectionConfig, ApiError> {
    if body.len() > MAX_BODY_BYTES {
        return Err(ApiError::body_too_large());
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::malformed("Request body must not be empty"));
    }

    let mut values = serde_json::Deserializer::from_slice(body).into_iter::<Value>();
    let value = match values.next() {
        Some(Ok(value)) => value,
        Some(Err(e)) => return Err(syntax_error(&e)),
        None => return Err(ApiError::malformed("Request body must not be empty")),
    };
    if values.next().is_some() {
        return Err(ApiError::malformed(
            "Request body must only contain a single JSON object",
        ));
    }

    let Value::Object(object) = value else {
        return Err(ApiError::malformed("Request body must be a JSON object"));
    };
    // Field names match regardless of case; a later spelling wins.
    let mut fields: Map<String, Value> = object
        .into_iter()
        .map(|(key, value)| (key.to_ascii_lowercase(), value))
        .collect();
    check_field_types(&fields)?;
    fields.retain(|_, v| !v.is_null());

    serde_json::from_value(Value::Object(fields))
        .map_err(|_| ApiError::malformed("Request body contains badly-formed JSON"))
}

fn syntax_error(e: &serde_json::Error) -> ApiError {
    match e.classify() {
        Category::Eof => ApiError::malformed("Request body contains badly-formed JSON"),
        _ => ApiError::malformed(format!(
            "Request body contains badly-formed JSON (at line {}, column {})",
            e.line(),
            e.column()
        )),
    }
}

fn check_field_types(fields: &Map<String, Value>) -> Result<(), ApiError> {
    for name in CONNECTION_FIELDS {
        match fields.get(name) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(_) => {
                return Err(ApiError::malformed(format!(
                    "Request body contains an invalid value for the \"{name}\" field"
                )))
            }
        }
    }
    Ok(())
}
