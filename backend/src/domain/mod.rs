//! Domain primitives, ports and use-cases.
//!
//! Purpose: keep the user record rules independent of HTTP and of the
//! database driver. Inbound adapters call the [`ports::UserRecords`] port;
//! outbound adapters implement the storage ports.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: API error payload and stable error identifier.
//! - `TraceId`: request-scoped correlation identifier.
//! - `RollNumber`, `UserRecord`, `UserRecordPatch`: the user record model.
//! - `UserRecordService`: the CRUD use-cases.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user_record;
pub mod user_record_service;

pub use self::error::{Error, ErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user_record::{
    RollNumber, UserRecord, UserRecordChange, UserRecordColumn, UserRecordPatch,
};
pub use self::user_record_service::UserRecordService;
