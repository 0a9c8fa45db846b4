//!
//! # Client Error Handling
//!
//! This module defines the error type `AppError` returned by every fallible call in the
//! crate. HTTP responses are classified exactly once, by the transport's inbound
//! interceptor, into one of the HTTP variants below; everything above the transport
//! pattern-matches on the variant instead of on raw status codes.
//!
//! The `Display` output of an `AppError` is the user-visible text: the server-supplied
//! message verbatim when there is one. Callers are expected to show `err.to_string()`
//! directly.
//!
//! `From` implementations exist for `reqwest::Error`, `serde_json::Error`,
//! `std::io::Error` and `validator::ValidationErrors` so that `?` works throughout.

use serde_json::Value;
use std::fmt;
use validator::ValidationErrors;

/// Details of a non-2xx HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpFailure {
    /// HTTP status code of the response.
    pub status: u16,
    /// Message taken from the body's `message` field, else its `error` field.
    pub message: Option<String>,
    /// The parsed response body (`null` when the body was empty or not JSON).
    pub body: Value,
}

impl HttpFailure {
    pub fn new(status: u16, body: Value) -> Self {
        let message = server_message(&body);
        Self {
            status,
            message,
            body,
        }
    }

    /// Same failure with the user-visible message replaced.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}", msg),
            None => write!(f, "Request failed with status code {}", self.status),
        }
    }
}

/// Extracts the message a server put in an error body.
///
/// `message` is preferred; a string `error` field is used otherwise.
pub fn server_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|key| body.get(*key))
        .find_map(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Classification tag of an `AppError`, for callers that want to branch without
/// destructuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    Forbidden,
    Network,
    Server,
    Client,
    Request,
    Decode,
    Storage,
    Validation,
}

/// Represents all errors that can occur in the client.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// HTTP 401. The session is no longer valid on the server.
    Unauthorized(HttpFailure),
    /// HTTP 403.
    Forbidden(HttpFailure),
    /// HTTP 5xx.
    Server(HttpFailure),
    /// Any other non-2xx status.
    Client(HttpFailure),
    /// No response was received (connection failure or timeout).
    Network(String),
    /// The request could not be constructed.
    Request(String),
    /// A response body did not have the expected shape.
    Decode(String),
    /// The persistent key-value store failed.
    Storage(String),
    /// Input rejected before it was sent.
    Validation(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Unauthorized(_) => ErrorKind::Unauthorized,
            AppError::Forbidden(_) => ErrorKind::Forbidden,
            AppError::Server(_) => ErrorKind::Server,
            AppError::Client(_) => ErrorKind::Client,
            AppError::Network(_) => ErrorKind::Network,
            AppError::Request(_) => ErrorKind::Request,
            AppError::Decode(_) => ErrorKind::Decode,
            AppError::Storage(_) => ErrorKind::Storage,
            AppError::Validation(_) => ErrorKind::Validation,
        }
    }

    /// True for conditions that may clear up on their own: no response, or a 5xx.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Network(_) | AppError::Server(_))
    }

    /// HTTP status, when the error came from a response.
    pub fn status(&self) -> Option<u16> {
        self.http_failure().map(|f| f.status)
    }

    /// Server-supplied message, when the error came from a response that had one.
    pub fn server_message(&self) -> Option<&str> {
        self.http_failure().and_then(|f| f.message.as_deref())
    }

    /// Raw response body, when the error came from a response.
    pub fn payload(&self) -> Option<&Value> {
        self.http_failure().map(|f| &f.body)
    }

    fn http_failure(&self) -> Option<&HttpFailure> {
        match self {
            AppError::Unauthorized(f)
            | AppError::Forbidden(f)
            | AppError::Server(f)
            | AppError::Client(f) => Some(f),
            _ => None,
        }
    }

    /// Replaces the user-visible message while keeping the classification.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        let message = message.into();
        match self {
            AppError::Unauthorized(f) => AppError::Unauthorized(f.with_message(message)),
            AppError::Forbidden(f) => AppError::Forbidden(f.with_message(message)),
            AppError::Server(f) => AppError::Server(f.with_message(message)),
            AppError::Client(f) => AppError::Client(f.with_message(message)),
            AppError::Network(_) => AppError::Network(message),
            AppError::Request(_) => AppError::Request(message),
            AppError::Decode(_) => AppError::Decode(message),
            AppError::Storage(_) => AppError::Storage(message),
            AppError::Validation(_) => AppError::Validation(message),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(failure)
            | AppError::Forbidden(failure)
            | AppError::Server(failure)
            | AppError::Client(failure) => write!(f, "{}", failure),
            AppError::Network(msg)
            | AppError::Request(msg)
            | AppError::Decode(msg)
            | AppError::Storage(msg)
            | AppError::Validation(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `reqwest::Error` into `AppError`.
///
/// Timeouts and connection failures mean no response was received and become
/// `AppError::Network`; builder errors become `AppError::Request`.
impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> AppError {
        if error.is_builder() {
            AppError::Request(error.to_string())
        } else if error.is_decode() {
            AppError::Decode(error.to_string())
        } else {
            AppError::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> AppError {
        AppError::Decode(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> AppError {
        AppError::Storage(error.to_string())
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_server_message_prefers_message_field() {
        let body = json!({ "success": false, "message": "Email taken", "error": "dup" });
        assert_eq!(server_message(&body).as_deref(), Some("Email taken"));

        let body = json!({ "error": "Invalid credentials" });
        assert_eq!(server_message(&body).as_deref(), Some("Invalid credentials"));

        let body = json!({ "error": { "code": 11000 } });
        assert_eq!(server_message(&body), None);

        assert_eq!(server_message(&Value::Null), None);
    }

    #[test]
    fn test_display_is_user_visible_text() {
        let error = AppError::Client(HttpFailure::new(400, json!({ "message": "Bad rating" })));
        assert_eq!(error.to_string(), "Bad rating");

        let error = AppError::Server(HttpFailure::new(502, Value::Null));
        assert_eq!(error.to_string(), "Request failed with status code 502");

        let error = AppError::Network("timed out".into());
        assert_eq!(error.to_string(), "timed out");
    }

    #[test]
    fn test_kind_and_transience() {
        let server = AppError::Server(HttpFailure::new(503, Value::Null));
        assert_eq!(server.kind(), ErrorKind::Server);
        assert!(server.is_transient());
        assert!(AppError::Network("down".into()).is_transient());

        let unauthorized = AppError::Unauthorized(HttpFailure::new(401, Value::Null));
        assert!(!unauthorized.is_transient());
        assert_eq!(unauthorized.status(), Some(401));
        assert!(!AppError::Validation("bad".into()).is_transient());
    }

    #[test]
    fn test_with_message_keeps_classification() {
        let error = AppError::Server(HttpFailure::new(503, json!({ "message": "down" })))
            .with_message("Failed to fetch reviews");
        assert_eq!(error.kind(), ErrorKind::Server);
        assert_eq!(error.status(), Some(503));
        assert_eq!(error.to_string(), "Failed to fetch reviews");
    }
}
