//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod user_record_store;
mod user_records;

#[cfg(test)]
pub use user_record_store::MockUserRecordSession;
pub use user_record_store::{
    FixtureUserRecordConnectionProvider, UserRecordConnectionProvider, UserRecordPersistenceError,
    UserRecordSession,
};
#[cfg(test)]
pub use user_records::MockUserRecords;
pub use user_records::{
    INTERNAL_ERROR_MESSAGE, USER_NOT_FOUND_MESSAGE, UserRecordError, UserRecords,
};
