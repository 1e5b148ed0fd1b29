//! Internal Diesel row structs for the `stu` table.
//!
//! These types stay inside the persistence layer; sessions convert them to
//! and from domain records.

use diesel::prelude::*;

use crate::domain::{RollNumber, UserRecord, UserRecordChange};

use super::schema::stu;

/// Row read from `stu`, addressed by column name.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = stu)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StuRow {
    pub rn: i32,
    pub na: String,
    pub m: i32,
}

impl From<StuRow> for UserRecord {
    fn from(row: StuRow) -> Self {
        UserRecord::new(RollNumber::new(row.rn), row.na, row.m)
    }
}

/// Insertable row for a new record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = stu)]
pub(crate) struct NewStuRow<'a> {
    pub rn: i32,
    pub na: &'a str,
    pub m: i32,
}

impl<'a> From<&'a UserRecord> for NewStuRow<'a> {
    fn from(record: &'a UserRecord) -> Self {
        Self {
            rn: record.roll_number().get(),
            na: record.name(),
            m: record.mark(),
        }
    }
}

/// Changeset for partial updates.
///
/// `None` fields are left out of the generated `SET` clause, so the
/// statement names exactly the supplied columns. These two fields are the
/// only columns an update can ever touch.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = stu)]
pub(crate) struct StuChangeset<'a> {
    pub na: Option<&'a str>,
    pub m: Option<i32>,
}

impl<'a> StuChangeset<'a> {
    pub fn from_changes(changes: &'a [UserRecordChange]) -> Self {
        changes
            .iter()
            .fold(Self::default(), |mut changeset, change| {
                match change {
                    UserRecordChange::Name(name) => changeset.na = Some(name.as_str()),
                    UserRecordChange::Mark(mark) => changeset.m = Some(*mark),
                }
                changeset
            })
    }

    pub fn is_empty(&self) -> bool {
        self.na.is_none() && self.m.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::debug_query;
    use diesel::pg::Pg;

    #[test]
    fn update_sets_only_supplied_columns() {
        let changes = [UserRecordChange::Mark(92)];
        let changeset = StuChangeset::from_changes(&changes);
        let query = diesel::update(stu::table.filter(stu::rn.eq(101))).set(&changeset);
        let sql = debug_query::<Pg, _>(&query).to_string();

        assert!(sql.contains(r#"SET "m" = $1"#), "unexpected SQL: {sql}");
        assert!(!sql.contains(r#""na""#), "unexpected SQL: {sql}");
        assert!(sql.contains(r#""stu"."rn" = $2"#), "unexpected SQL: {sql}");
    }

    #[test]
    fn update_binds_name_before_mark() {
        let changes = [
            UserRecordChange::Name("Ravi".to_owned()),
            UserRecordChange::Mark(75),
        ];
        let changeset = StuChangeset::from_changes(&changes);
        let query = diesel::update(stu::table.filter(stu::rn.eq(7))).set(&changeset);
        let sql = debug_query::<Pg, _>(&query).to_string();

        assert!(
            sql.contains(r#"SET "na" = $1, "m" = $2"#),
            "unexpected SQL: {sql}"
        );
    }

    #[test]
    fn no_changes_yield_empty_changeset() {
        assert!(StuChangeset::from_changes(&[]).is_empty());
    }
}
