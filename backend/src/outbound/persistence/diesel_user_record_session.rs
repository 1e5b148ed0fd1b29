//! PostgreSQL-backed `UserRecordSession` using Diesel.
//!
//! Each write runs in its own single-statement transaction: it commits when
//! the statement succeeds and rolls back otherwise. Reads run directly on the
//! connection.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{UserRecordPersistenceError, UserRecordSession};
use crate::domain::{RollNumber, UserRecord, UserRecordChange};

use super::diesel_error_mapping::map_diesel_error;
use super::models::{NewStuRow, StuChangeset, StuRow};
use super::schema::stu;

/// A request's exclusive PostgreSQL connection.
///
/// Dropping the session closes the connection.
pub struct DieselUserRecordSession {
    conn: AsyncPgConnection,
}

impl DieselUserRecordSession {
    pub(crate) fn new(conn: AsyncPgConnection) -> Self {
        Self { conn }
    }
}

impl Drop for DieselUserRecordSession {
    fn drop(&mut self) {
        debug!("releasing database connection");
    }
}

#[async_trait]
impl UserRecordSession for DieselUserRecordSession {
    async fn fetch_all(&mut self) -> Result<Vec<UserRecord>, UserRecordPersistenceError> {
        let rows: Vec<StuRow> = stu::table
            .select(StuRow::as_select())
            .load(&mut self.conn)
            .await
            .map_err(|err| map_diesel_error(err, "fetch all"))?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn fetch_one(
        &mut self,
        roll_number: RollNumber,
    ) -> Result<Option<UserRecord>, UserRecordPersistenceError> {
        let row: Option<StuRow> = stu::table
            .filter(stu::rn.eq(roll_number.get()))
            .select(StuRow::as_select())
            .first(&mut self.conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "fetch one"))?;

        Ok(row.map(UserRecord::from))
    }

    async fn insert(&mut self, record: &UserRecord) -> Result<(), UserRecordPersistenceError> {
        let row = NewStuRow::from(record);
        self.conn
            .transaction(|conn| {
                async move {
                    diesel::insert_into(stu::table)
                        .values(&row)
                        .execute(conn)
                        .await
                        .map(|_| ())
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, "insert"))
    }

    async fn update(
        &mut self,
        roll_number: RollNumber,
        changes: &[UserRecordChange],
    ) -> Result<(), UserRecordPersistenceError> {
        let changeset = StuChangeset::from_changes(changes);
        // Diesel refuses to build an UPDATE without a SET clause.
        if changeset.is_empty() {
            return Ok(());
        }

        let key = roll_number.get();
        self.conn
            .transaction(|conn| {
                async move {
                    diesel::update(stu::table.filter(stu::rn.eq(key)))
                        .set(&changeset)
                        .execute(conn)
                        .await
                        .map(|_| ())
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, "update"))
    }

    async fn delete(&mut self, roll_number: RollNumber) -> Result<(), UserRecordPersistenceError> {
        let key = roll_number.get();
        self.conn
            .transaction(|conn| {
                async move {
                    diesel::delete(stu::table.filter(stu::rn.eq(key)))
                        .execute(conn)
                        .await
                        .map(|_| ())
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, "delete"))
    }
}
