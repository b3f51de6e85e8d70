// sqlx::Error classification
//
// Orphan rules prevent `impl From<sqlx::Error> for AppError` here, so every
// adapter call maps through this function.

use roster_core::error::AppError;
use sqlx::error::ErrorKind;

/// SQLite result codes treated as transient (https://www.sqlite.org/rescode.html)
const SQLITE_BUSY_CODES: &[&str] = &["5", "261", "517", "773", "6", "262"];

/// Convert sqlx::Error to AppError with the failure kind preserved
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();

            match db_err.kind() {
                ErrorKind::UniqueViolation => AppError::ConstraintViolation(format!(
                    "Unique constraint violation: {} ({})",
                    db_err.message(),
                    code
                )),
                ErrorKind::ForeignKeyViolation => AppError::ConstraintViolation(format!(
                    "Foreign key constraint violation: {} ({})",
                    db_err.message(),
                    code
                )),
                ErrorKind::NotNullViolation => AppError::ConstraintViolation(format!(
                    "Not null constraint violation: {} ({})",
                    db_err.message(),
                    code
                )),
                ErrorKind::CheckViolation => AppError::ConstraintViolation(format!(
                    "Check constraint violation: {} ({})",
                    db_err.message(),
                    code
                )),
                _ if SQLITE_BUSY_CODES.contains(&code.as_str()) => {
                    // SQLITE_BUSY / SQLITE_LOCKED - another writer holds the lock
                    AppError::ConnectivityFailure(format!(
                        "Database locked ({}): {}",
                        code,
                        db_err.message()
                    ))
                }
                _ => AppError::Database(format!(
                    "Database error [{}]: {}",
                    code,
                    db_err.message()
                )),
            }
        }
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::WorkerCrashed => AppError::ConnectivityFailure(err.to_string()),
        sqlx::Error::RowNotFound => AppError::NotFound("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Internal(format!("Column not found: {}", col))
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            AppError::Internal(format!("Row decode failed: {}", err))
        }
        _ => AppError::Database(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_retryable() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::ConnectivityFailure(_)));
        assert!(err.is_retryable());

        let err = map_sqlx_error(sqlx::Error::PoolClosed);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_row_not_found() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(!err.is_retryable());
    }
}
