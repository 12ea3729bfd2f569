//! Error types for the reviews service.

use thiserror::Error;

/// Result type alias using the reviews service's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for review operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error was caused by the caller rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidInput(_) | Error::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("page must be >= 1".to_string());
        assert_eq!(err.to_string(), "Invalid input: page must be >= 1");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("DB_PORT is not a number".to_string());
        assert_eq!(err.to_string(), "Configuration error: DB_PORT is not a number");
    }

    #[test]
    fn test_error_display_database() {
        let err = Error::Database(sqlx::Error::RowNotFound);
        assert!(err.to_string().starts_with("Database error:"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "reviews.sql");
        let err: Error = io_err.into();
        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_client_error_classification() {
        assert!(Error::InvalidInput("x".into()).is_client_error());
        assert!(Error::NotFound("x".into()).is_client_error());
        assert!(!Error::Database(sqlx::Error::PoolTimedOut).is_client_error());
        assert!(!Error::Internal("x".into()).is_client_error());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
