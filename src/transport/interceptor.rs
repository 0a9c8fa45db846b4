//! The two hooks every call passes through.
//!
//! `outbound` finalizes and logs a request before it is sent. `inbound` turns whatever
//! came back (a response, or nothing) into either an [`ApiResponse`] or a classified
//! [`AppError`], firing [`TransportEvents`] for 401 and 403 along the way. This is the
//! only place status codes are interpreted.

use super::events::TransportEvents;
use super::ApiResponse;
use crate::error::{AppError, HttpFailure};
use reqwest::{Request, RequestBuilder, Response};
use serde_json::Value;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";
pub const REQUEST_ERROR_MESSAGE: &str = "Request error";
pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to perform this action";

const REDACTED_FIELDS: [&str; 2] = ["password", "token"];

/// Tags the request with a fresh request id, builds it and logs it.
///
/// A request that fails to build is reported through `request_failed` and never sent.
pub fn outbound(
    builder: RequestBuilder,
    events: &dyn TransportEvents,
) -> Result<(Request, Uuid), AppError> {
    let request_id = Uuid::new_v4();
    match builder
        .header(REQUEST_ID_HEADER, request_id.to_string())
        .build()
    {
        Ok(request) => {
            let body = request
                .body()
                .and_then(|b| b.as_bytes())
                .map(loggable_body)
                .unwrap_or_default();
            log::debug!(
                "[{}] {} {} {}",
                request_id,
                request.method(),
                request.url().path(),
                body
            );
            Ok((request, request_id))
        }
        Err(e) => {
            log::error!("[{}] could not build request: {}", request_id, e);
            events.request_failed(REQUEST_ERROR_MESSAGE);
            Err(AppError::Request(REQUEST_ERROR_MESSAGE.to_string()))
        }
    }
}

/// Classifies the outcome of sending a request.
///
/// No response at all (connect failure, timeout, body cut off) is `AppError::Network`.
pub async fn inbound(
    result: Result<Response, reqwest::Error>,
    request_id: Uuid,
    events: &dyn TransportEvents,
) -> Result<ApiResponse, AppError> {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            log::error!("[{}] no response received: {}", request_id, e);
            return Err(AppError::Network(e.to_string()));
        }
    };

    let status = response.status().as_u16();
    let bytes = response.bytes().await.map_err(|e| {
        log::error!("[{}] response body lost: {}", request_id, e);
        AppError::Network(e.to_string())
    })?;

    let result = classify(status, parse_body(&bytes), events);
    if let Err(err) = &result {
        log::debug!("[{}] {} -> {:?}", request_id, status, err.kind());
    }
    result
}

/// Maps a status and parsed body onto the error taxonomy.
///
/// 2xx passes through unchanged. 401 fires `session_expired`, 403 fires `forbidden`,
/// and every non-2xx is rejected so the caller's own error path also runs.
pub fn classify(
    status: u16,
    body: Value,
    events: &dyn TransportEvents,
) -> Result<ApiResponse, AppError> {
    match status {
        200..=299 => Ok(ApiResponse { status, body }),
        401 => {
            events.session_expired();
            Err(AppError::Unauthorized(HttpFailure::new(status, body)))
        }
        403 => {
            let failure = HttpFailure::new(status, body);
            events.forbidden(failure.message.as_deref().unwrap_or(FORBIDDEN_MESSAGE));
            Err(AppError::Forbidden(failure))
        }
        500..=u16::MAX => {
            let failure = HttpFailure::new(status, body);
            log::error!("Server error {}: {}", status, failure);
            Err(AppError::Server(failure))
        }
        _ => Err(AppError::Client(HttpFailure::new(status, body))),
    }
}

/// Empty or non-JSON bodies become `null`.
pub fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes).unwrap_or(Value::Null)
}

fn loggable_body(bytes: &[u8]) -> String {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(mut map)) => {
            for field in REDACTED_FIELDS {
                if let Some(value) = map.get_mut(field) {
                    *value = Value::String("***".into());
                }
            }
            Value::Object(map).to_string()
        }
        Ok(other) => other.to_string(),
        Err(_) => format!("<{} bytes>", bytes.len()),
    }
}
