//! Error handling for the store and route handlers

use axum::http::StatusCode;
use thiserror::Error;

/// Failure of a record store operation or its surrounding transaction.
///
/// Database failures are carried unmodified as the source so callers can
/// inspect the underlying `sqlx::Error`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to begin transaction: {0}")]
    Begin(#[source] sqlx::Error),

    #[error("statement failed: {0}")]
    Statement(#[source] sqlx::Error),

    /// The read-back after a write failed or found no row. The write is not
    /// trusted and the transaction is rolled back.
    #[error("read-back after write failed: {0}")]
    ReadBack(#[source] sqlx::Error),

    /// Commit failed after a successful operation; nothing was persisted.
    #[error("commit failed: {0}")]
    Commit(#[source] sqlx::Error),

    #[error("list failed: {0}")]
    List(#[source] sqlx::Error),
}

impl StoreError {
    /// True when a read-back found no row for the requested id
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::ReadBack(sqlx::Error::RowNotFound))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            StoreError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Extension trait for logging errors and converting to StatusCode
pub trait LogErr<T> {
    /// Log error with context and return INTERNAL_SERVER_ERROR
    fn log_500(self, context: &str) -> Result<T, StatusCode>;

    /// Log error with context and return a custom StatusCode
    fn log_status(self, context: &str, status: StatusCode) -> Result<T, StatusCode>;
}

impl<T, E: std::fmt::Display> LogErr<T> for Result<T, E> {
    fn log_500(self, context: &str) -> Result<T, StatusCode> {
        self.log_status(context, StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn log_status(self, context: &str, status: StatusCode) -> Result<T, StatusCode> {
        self.map_err(|e| {
            if status.is_server_error() {
                tracing::error!(status = status.as_u16(), "{}: {}", context, e);
            } else {
                tracing::warn!(status = status.as_u16(), "{}: {}", context, e);
            }
            status
        })
    }
}

/// Logs a store error and maps it to the status its variant implies
pub trait LogStoreErr<T> {
    fn log_store(self, context: &str) -> Result<T, StatusCode>;
}

impl<T> LogStoreErr<T> for Result<T, StoreError> {
    fn log_store(self, context: &str) -> Result<T, StatusCode> {
        match self {
            Ok(value) => Ok(value),
            Err(e) => {
                let status = e.status();
                Err::<T, _>(e).log_status(context, status)
            }
        }
    }
}
