//! Shared classification of pool and Diesel failures.
//!
//! Each repository owns its error enum, so this module reduces a failure to a
//! [`DbFailure`] and lets the caller pick the matching constructor.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse category of a database failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    /// The pool or the socket gave out.
    Connection(String),
    /// PostgreSQL aborted the transaction to resolve a conflict.
    Contention(String),
    /// A unique or primary key constraint rejected the write.
    Duplicate(String),
    /// Anything else.
    Query(String),
}

impl From<PoolError> for DbFailure {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Checkout { message } | PoolError::Build { message } => {
                Self::Connection(message)
            }
        }
    }
}

/// Classify a Diesel error, logging the raw database message at debug level.
pub(crate) fn classify(error: &DieselError) -> DbFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
            match kind {
                DatabaseErrorKind::ClosedConnection => {
                    DbFailure::Connection("database connection error".to_owned())
                }
                DatabaseErrorKind::SerializationFailure => {
                    DbFailure::Contention("concurrent update detected".to_owned())
                }
                DatabaseErrorKind::UniqueViolation => {
                    DbFailure::Duplicate(info.message().to_owned())
                }
                _ => DbFailure::Query("database error".to_owned()),
            }
        }
        DieselError::NotFound => DbFailure::Query("record not found".to_owned()),
        other => {
            debug!(error = %other, "diesel operation failed");
            DbFailure::Query("database error".to_owned())
        }
    }
}
