//! Driven ports for user record storage.
//!
//! Storage is reached through two ports. [`UserRecordConnectionProvider`]
//! opens a fresh connection per request and hands it out as a
//! [`UserRecordSession`]; the session is exclusively owned by one request and
//! releases its connection when dropped, whichever way the request ends.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::{RollNumber, UserRecord, UserRecordChange};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user record storage adapters.
    pub enum UserRecordPersistenceError {
        /// A connection to the store could not be established.
        Connection { message: String } => "user record connection failed: {message}",
        /// A statement or commit failed.
        Query { message: String } => "user record query failed: {message}",
    }
}

/// One request's exclusive handle on the store.
///
/// Writes commit as soon as their single statement succeeds; there is no
/// transaction spanning several calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRecordSession: Send {
    /// Every stored record, in whatever order the store yields them.
    async fn fetch_all(&mut self) -> Result<Vec<UserRecord>, UserRecordPersistenceError>;

    /// The record keyed by `roll_number`, if one exists.
    async fn fetch_one(
        &mut self,
        roll_number: RollNumber,
    ) -> Result<Option<UserRecord>, UserRecordPersistenceError>;

    /// Insert a record and commit. Duplicate keys surface as `Query` errors.
    async fn insert(&mut self, record: &UserRecord) -> Result<(), UserRecordPersistenceError>;

    /// Set exactly the supplied columns on the keyed record and commit.
    async fn update(
        &mut self,
        roll_number: RollNumber,
        changes: &[UserRecordChange],
    ) -> Result<(), UserRecordPersistenceError>;

    /// Delete the keyed record and commit.
    async fn delete(&mut self, roll_number: RollNumber) -> Result<(), UserRecordPersistenceError>;
}

/// Opens request-scoped sessions.
#[async_trait]
pub trait UserRecordConnectionProvider: Send + Sync {
    /// Open a new connection wrapped in a session.
    async fn open(&self) -> Result<Box<dyn UserRecordSession>, UserRecordPersistenceError>;
}

/// In-memory provider backing tests and local runs without a database.
///
/// Sessions share one ordered map, so records are listed by roll number.
/// The provider counts how many sessions were opened and how many have been
/// released, which lets tests check that every request gives its connection
/// back.
#[derive(Debug, Default, Clone)]
pub struct FixtureUserRecordConnectionProvider {
    records: Arc<Mutex<BTreeMap<RollNumber, UserRecord>>>,
    opened: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl FixtureUserRecordConnectionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider pre-populated with `records`.
    pub fn with_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let map = records
            .into_iter()
            .map(|record| (record.roll_number(), record))
            .collect();
        Self {
            records: Arc::new(Mutex::new(map)),
            ..Self::default()
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Snapshot of the stored record, bypassing the session machinery.
    pub fn stored(&self, roll_number: RollNumber) -> Option<UserRecord> {
        self.records
            .lock()
            .ok()
            .and_then(|records| records.get(&roll_number).cloned())
    }
}

#[async_trait]
impl UserRecordConnectionProvider for FixtureUserRecordConnectionProvider {
    async fn open(&self) -> Result<Box<dyn UserRecordSession>, UserRecordPersistenceError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FixtureUserRecordSession {
            records: Arc::clone(&self.records),
            released: Arc::clone(&self.released),
        }))
    }
}

struct FixtureUserRecordSession {
    records: Arc<Mutex<BTreeMap<RollNumber, UserRecord>>>,
    released: Arc<AtomicUsize>,
}

impl FixtureUserRecordSession {
    fn records(
        &self,
    ) -> Result<MutexGuard<'_, BTreeMap<RollNumber, UserRecord>>, UserRecordPersistenceError> {
        self.records
            .lock()
            .map_err(|_| UserRecordPersistenceError::query("fixture store lock poisoned"))
    }
}

impl Drop for FixtureUserRecordSession {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserRecordSession for FixtureUserRecordSession {
    async fn fetch_all(&mut self) -> Result<Vec<UserRecord>, UserRecordPersistenceError> {
        Ok(self.records()?.values().cloned().collect())
    }

    async fn fetch_one(
        &mut self,
        roll_number: RollNumber,
    ) -> Result<Option<UserRecord>, UserRecordPersistenceError> {
        Ok(self.records()?.get(&roll_number).cloned())
    }

    async fn insert(&mut self, record: &UserRecord) -> Result<(), UserRecordPersistenceError> {
        let mut records = self.records()?;
        if records.contains_key(&record.roll_number()) {
            return Err(UserRecordPersistenceError::query(format!(
                "duplicate key value violates unique constraint: rn={}",
                record.roll_number()
            )));
        }
        records.insert(record.roll_number(), record.clone());
        Ok(())
    }

    async fn update(
        &mut self,
        roll_number: RollNumber,
        changes: &[UserRecordChange],
    ) -> Result<(), UserRecordPersistenceError> {
        let mut records = self.records()?;
        if let Some(current) = records.remove(&roll_number) {
            records.insert(roll_number, current.apply(changes));
        }
        Ok(())
    }

    async fn delete(&mut self, roll_number: RollNumber) -> Result<(), UserRecordPersistenceError> {
        self.records()?.remove(&roll_number);
        Ok(())
    }
}
