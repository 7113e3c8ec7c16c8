//! Error types module
//!
//! `AppError` covers record store failures. Workflow-specific failures
//! (attachment validation, resolution) live next to the workflows and describe themselves through `ErrorMetadata`.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues and known inconsistencies
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented to a user.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "DATABASE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether the user can recover by retrying with different input
    fn is_recoverable(&self) -> bool;

    /// Human-readable message (may differ from the internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Record store failure.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, AppError::Database(_))
    }

    fn log_level(&self) -> LogLevel {
        LogLevel::Error
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access the leave request records".to_string(),
            AppError::Internal(_) => "Internal error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_hide_details() {
        let err = AppError::Internal("pool exhausted at 10.0.0.4".to_string());
        assert_eq!(err.client_message(), "Internal error");
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert_eq!(err.log_level(), LogLevel::Error);
        assert!(!err.is_recoverable());
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn database_errors_are_retryable() {
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(
            err.client_message(),
            "Failed to access the leave request records"
        );
    }
}
