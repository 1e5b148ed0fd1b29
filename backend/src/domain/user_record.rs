//! User record data model.
//!
//! A user record is a roll-number/name/mark triple. The roll number is
//! supplied by the client on creation and never changes afterwards; only the
//! name and mark can be patched.

use std::fmt;

/// Primary key of a user record.
///
/// Roll numbers are chosen by clients, not generated by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RollNumber(i32);

impl RollNumber {
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for RollNumber {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for RollNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored user record.
///
/// # Examples
/// ```
/// use roster::domain::{RollNumber, UserRecord};
///
/// let record = UserRecord::new(RollNumber::new(101), "Asha", 88);
/// assert_eq!(record.roll_number().get(), 101);
/// assert_eq!(record.name(), "Asha");
/// assert_eq!(record.mark(), 88);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    roll_number: RollNumber,
    name: String,
    mark: i32,
}

impl UserRecord {
    pub fn new(roll_number: RollNumber, name: impl Into<String>, mark: i32) -> Self {
        Self {
            roll_number,
            name: name.into(),
            mark,
        }
    }

    pub fn roll_number(&self) -> RollNumber {
        self.roll_number
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn mark(&self) -> i32 {
        self.mark
    }

    /// Apply a set of column changes, returning the patched record.
    ///
    /// Used by stores that keep records in memory; the database adapter
    /// issues an `UPDATE` instead.
    pub fn apply(mut self, changes: &[UserRecordChange]) -> Self {
        for change in changes {
            match change {
                UserRecordChange::Name(name) => self.name = name.clone(),
                UserRecordChange::Mark(mark) => self.mark = *mark,
            }
        }
        self
    }
}

/// Columns a client may change on an existing record.
///
/// This enum names the allow-list for dynamically built updates. The
/// guarantee itself comes from the Diesel changeset in the persistence
/// adapter, whose fixed fields are the only columns a `SET` clause can name;
/// here the names are used for logging the supplied columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRecordColumn {
    Name,
    Mark,
}

impl UserRecordColumn {
    /// Column name in the `stu` table.
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::Name => "na",
            Self::Mark => "m",
        }
    }
}

impl fmt::Display for UserRecordColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// A single supplied column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRecordChange {
    Name(String),
    Mark(i32),
}

impl UserRecordChange {
    pub const fn column(&self) -> UserRecordColumn {
        match self {
            Self::Name(_) => UserRecordColumn::Name,
            Self::Mark(_) => UserRecordColumn::Mark,
        }
    }
}

/// Partial update request: each field is either supplied or absent.
///
/// # Examples
/// ```
/// use roster::domain::{UserRecordChange, UserRecordPatch};
///
/// let patch = UserRecordPatch::new(None, Some(92));
/// assert_eq!(patch.changes(), vec![UserRecordChange::Mark(92)]);
/// assert!(UserRecordPatch::default().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRecordPatch {
    name: Option<String>,
    mark: Option<i32>,
}

impl UserRecordPatch {
    pub fn new(name: Option<String>, mark: Option<i32>) -> Self {
        Self { name, mark }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.mark.is_none()
    }

    /// Supplied values in column order: name first, then mark.
    ///
    /// Adapters bind parameters in exactly this order.
    pub fn changes(&self) -> Vec<UserRecordChange> {
        let mut changes = Vec::with_capacity(2);
        if let Some(name) = &self.name {
            changes.push(UserRecordChange::Name(name.clone()));
        }
        if let Some(mark) = self.mark {
            changes.push(UserRecordChange::Mark(mark));
        }
        changes
    }
}
