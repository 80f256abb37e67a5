//! Shared Diesel error classification for repositories.
//!
//! Repositories expose only Connection/Query error pairs to the domain;
//! this helper decides which side a Diesel failure lands on so the mapping
//! stays uniform across adapters.

use tracing::debug;

use super::pool::PoolError;

/// Which domain error constructor a database failure maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DbErrorClass {
    /// Connectivity-level failure; retrying later may help.
    Connection,
    /// Statement-level failure; the query or data is at fault.
    Query,
}

/// Classify a Diesel error and produce a stable, non-leaking message.
pub(crate) fn classify_diesel_error(
    error: &diesel::result::Error,
) -> (DbErrorClass, &'static str) {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => (DbErrorClass::Query, "record not found"),
        DieselError::QueryBuilderError(_) => (DbErrorClass::Query, "database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            (DbErrorClass::Connection, "database connection error")
        }
        _ => (DbErrorClass::Query, "database error"),
    }
}

/// Extract the human-readable detail out of a pool failure.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn not_found_is_a_query_error() {
        let (class, message) = classify_diesel_error(&diesel::result::Error::NotFound);
        assert_eq!(class, DbErrorClass::Query);
        assert_eq!(message, "record not found");
    }

    #[rstest]
    fn rollback_is_a_query_error() {
        let (class, _) = classify_diesel_error(&diesel::result::Error::RollbackTransaction);
        assert_eq!(class, DbErrorClass::Query);
    }

    #[rstest]
    fn pool_errors_surface_their_message() {
        let message = pool_error_message(PoolError::checkout("connection refused"));
        assert_eq!(message, "connection refused");
    }
}
