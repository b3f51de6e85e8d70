// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
///
/// A point-lookup miss is never an error: repositories return `Ok(None)`.
/// `NotFound` is reserved for writes that target a row which no longer exists.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Validation(#[from] crate::domain::DomainError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Connectivity failure: {0}")]
    ConnectivityFailure(String),

    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),

    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),

    #[error("Incorrect result size: expected at most {expected}, got at least {actual}")]
    IncorrectResultSize { expected: usize, actual: usize },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the caller may retry the operation (with its own backoff).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::ConnectivityFailure(_) | AppError::DeadlineExceeded(_)
        )
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error conversion is handled in infra-sqlite crate
// by classifying into the variants above

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn test_retryable_kinds() {
        assert!(AppError::ConnectivityFailure("pool timed out".into()).is_retryable());
        assert!(AppError::DeadlineExceeded("1ms".into()).is_retryable());

        assert!(!AppError::ConstraintViolation("fk".into()).is_retryable());
        assert!(!AppError::InvalidArgument("size".into()).is_retryable());
        assert!(!AppError::ConcurrentModification("v1".into()).is_retryable());
        assert!(!AppError::IncorrectResultSize {
            expected: 1,
            actual: 2
        }
        .is_retryable());
    }

    #[test]
    fn test_domain_error_converts() {
        let err: AppError = DomainError::NegativeAge(-1).into();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("-1"));
    }
}
