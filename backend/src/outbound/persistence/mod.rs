//! PostgreSQL persistence adapter using Diesel.
//!
//! - **Thin adapter**: sessions translate between Diesel rows and domain
//!   records. The existence checks and update rules live in the domain.
//! - **Internal models**: row structs (`models.rs`) and the table definition
//!   (`schema.rs`) never leave this module.
//! - **Connection per request**: no pool; see [`DieselConnectionProvider`].
//!
//! # Example
//!
//! ```ignore
//! use roster::outbound::persistence::{ConnectionConfig, DieselConnectionProvider};
//!
//! let config = ConnectionConfig::new("localhost", "postgres", "", "school", 5432);
//! let provider = DieselConnectionProvider::new(&config)?;
//! ```

mod connection;
mod diesel_error_mapping;
mod diesel_user_record_session;
mod models;
mod schema;

pub use connection::{ConnectionConfig, ConnectionConfigError, DieselConnectionProvider};
pub use diesel_user_record_session::DieselUserRecordSession;
