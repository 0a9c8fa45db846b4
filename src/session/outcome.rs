use crate::error::AppError;
use serde_json::Value;

/// Result of `login` and `register`.
///
/// These operations never return `Err`; callers branch on the outcome and show
/// `error.to_string()` for failures.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// `data` is the user record for `login` and the full response body for `register`.
    Success { data: Value },
    Failure { error: AppError },
}

impl AuthOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success { .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            AuthOutcome::Success { data } => Some(data),
            AuthOutcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            AuthOutcome::Success { .. } => None,
            AuthOutcome::Failure { error } => Some(error),
        }
    }
}

impl From<AppError> for AuthOutcome {
    fn from(error: AppError) -> Self {
        AuthOutcome::Failure { error }
    }
}
