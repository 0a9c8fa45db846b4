//! Typed helpers over the transport for the marketplace's domain endpoints.
//!
//! Reads go through [`retry::with_retry`] with [`RetryPolicy::IDEMPOTENT_GET`].
//! Writes are attempted once; re-submitting is up to the caller. Either way the error
//! handed back carries the server's message or a fixed fallback.

pub mod mechanics;
pub mod profile;
pub mod retry;
pub mod reviews;

pub use retry::{with_retry, RetryPolicy, UNAUTHORIZED_MESSAGE};

use crate::error::AppError;
use crate::transport::{ApiResponse, Transport};

/// Idempotent GET with the shared retry policy and read-error mapping.
async fn read(
    transport: &Transport,
    path: &str,
    query: &[(&str, String)],
    fallback: &str,
) -> Result<ApiResponse, AppError> {
    with_retry(&RetryPolicy::IDEMPOTENT_GET, path, move || async move {
        if query.is_empty() {
            transport.get(path).await
        } else {
            transport.get_with_query(path, query).await
        }
    })
    .await
    .map_err(|e| retry::read_error(e, fallback))
}
