use crate::error::AppError;
use std::future::Future;
use std::time::Duration;

/// Message shown when an idempotent read is rejected with 401.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized - Please login again";

/// Bounded, fixed-delay retry for idempotent reads.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub delay: Duration,
    pub retryable: fn(&AppError) -> bool,
}

impl RetryPolicy {
    /// Two attempts, one second apart, retrying only when no response came back or
    /// the server answered 5xx.
    pub const IDEMPOTENT_GET: RetryPolicy = RetryPolicy {
        max_attempts: 2,
        delay: Duration::from_millis(1000),
        retryable: AppError::is_transient,
    };
}

/// Runs `op` until it succeeds, fails with a non-retryable error, or the policy's
/// attempts are used up. The last error is returned unchanged.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    log::info!("{} recovered on attempt {}", label, attempt);
                }
                return Ok(value);
            }
            Err(e) if attempt < policy.max_attempts && (policy.retryable)(&e) => {
                log::warn!(
                    "{} failed ({}), retrying in {}ms",
                    label,
                    e,
                    policy.delay.as_millis()
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Maps the final error of an idempotent read to what the user sees.
///
/// 401 gets [`UNAUTHORIZED_MESSAGE`]; transient failures that outlived the retry get
/// `fallback`; anything else keeps the server's message, or `fallback` without one.
pub fn read_error(error: AppError, fallback: &str) -> AppError {
    if matches!(error, AppError::Unauthorized(_)) {
        error.with_message(UNAUTHORIZED_MESSAGE)
    } else if error.is_transient() || error.server_message().is_none() {
        error.with_message(fallback)
    } else {
        error
    }
}

/// Maps the error of a single-shot mutating call: the server's message, or `fallback`.
pub fn write_error(error: AppError, fallback: &str) -> AppError {
    if error.server_message().is_some() {
        error
    } else {
        error.with_message(fallback)
    }
}
