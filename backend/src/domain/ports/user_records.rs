//! Driving port for the user record use-cases.
//!
//! HTTP handlers depend on this port only, so they can be exercised against
//! a mock without any storage behind them.

use async_trait::async_trait;

use crate::domain::{Error, RollNumber, UserRecord, UserRecordPatch};

use super::define_port_error;

/// Client-facing message for a missing record.
pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";

/// Client-facing message for any data access failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

define_port_error! {
    /// Outcome of a failed user record operation.
    ///
    /// `NotFound` is only ever produced by an explicit existence check.
    /// `DataAccess` wraps every storage failure. Keeping them as separate
    /// variants means a missing record can never be reported as a fault.
    pub enum UserRecordError {
        /// No record exists for the roll number.
        NotFound { roll_number: RollNumber } => "user record {roll_number} not found",
        /// The store failed while executing or committing a statement.
        DataAccess { message: String } => "user record data access failed: {message}",
    }
}

impl From<UserRecordError> for Error {
    fn from(error: UserRecordError) -> Self {
        match error {
            UserRecordError::NotFound { .. } => Error::not_found(USER_NOT_FOUND_MESSAGE),
            // The cause has already been logged where it was raised.
            UserRecordError::DataAccess { .. } => Error::internal(INTERNAL_ERROR_MESSAGE),
        }
    }
}

/// User record use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRecords: Send + Sync {
    /// All records, unordered.
    async fn list(&self) -> Result<Vec<UserRecord>, UserRecordError>;

    /// The record keyed by `roll_number`.
    async fn get(&self, roll_number: RollNumber) -> Result<UserRecord, UserRecordError>;

    /// Store a new record. Key uniqueness is left to the store.
    async fn create(&self, record: UserRecord) -> Result<(), UserRecordError>;

    /// Apply the supplied fields and return the record as stored afterwards.
    async fn update(
        &self,
        roll_number: RollNumber,
        patch: UserRecordPatch,
    ) -> Result<UserRecord, UserRecordError>;

    /// Remove the keyed record.
    async fn delete(&self, roll_number: RollNumber) -> Result<(), UserRecordError>;
}
