//! Diesel and pool error mapping into [`StorageError`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::StorageError;

use super::pool::PoolError;

/// Map a pool failure to a connection error.
pub(crate) fn map_pool_error(error: PoolError) -> StorageError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            StorageError::connection(message)
        }
    }
}

/// Map a Diesel failure to a storage error, logging the driver detail.
///
/// Only a closed connection counts as unavailability; everything else is a
/// query failure whose detail stays in the debug log.
pub(crate) fn map_diesel_error(error: DieselError) -> StorageError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => StorageError::query("record not found"),
        DieselError::QueryBuilderError(_) => StorageError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StorageError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            StorageError::query("duplicate record")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            StorageError::query("referenced record does not exist")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            StorageError::query("record violates a table constraint")
        }
        _ => StorageError::query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_are_connection_failures() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("timed out"));
    }

    #[rstest]
    #[case(DieselError::NotFound, "query")]
    #[case(DieselError::RollbackTransaction, "query")]
    #[case(
        DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new(String::from("server closed the connection")),
        ),
        "connection"
    )]
    #[case(
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(String::from("duplicate key")),
        ),
        "query"
    )]
    fn diesel_errors_map_by_kind(#[case] error: DieselError, #[case] expected: &str) {
        assert_eq!(map_diesel_error(error).kind(), expected);
    }
}
