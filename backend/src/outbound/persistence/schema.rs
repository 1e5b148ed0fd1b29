//! Diesel table definitions.
//!
//! The table is created outside the service; these definitions must match
//! it column for column.

diesel::table! {
    /// User records keyed by roll number.
    stu (rn) {
        /// Roll number, supplied by the client.
        rn -> Int4,
        /// Name.
        na -> Varchar,
        /// Mark.
        m -> Int4,
    }
}
