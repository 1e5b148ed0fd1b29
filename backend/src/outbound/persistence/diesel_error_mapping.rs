//! Diesel error mapping for user record sessions.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::UserRecordPersistenceError;

/// Map a Diesel error into the port error, logging the driver detail.
///
/// Closed connections become `Connection` errors; everything else, including
/// constraint violations, becomes a `Query` error.
pub(super) fn map_diesel_error(
    error: DieselError,
    operation: &'static str,
) -> UserRecordPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), operation, "diesel operation failed");
        }
        _ => debug!(%error, operation, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserRecordPersistenceError::connection("database connection closed")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            UserRecordPersistenceError::query(format!("unique violation: {}", info.message()))
        }
        DieselError::QueryBuilderError(_) => UserRecordPersistenceError::query("invalid query"),
        other => UserRecordPersistenceError::query(other.to_string()),
    }
}
