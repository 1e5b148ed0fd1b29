//! User record use-cases over a request-scoped session.
//!
//! Every operation opens one session from the connection provider, runs its
//! statements on it and lets it drop at the end of the call, so the
//! connection is released on success and on every error path alike.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use super::ports::{
    UserRecordConnectionProvider, UserRecordError, UserRecordPersistenceError, UserRecordSession,
    UserRecords,
};
use super::{RollNumber, UserRecord, UserRecordChange, UserRecordPatch};

/// Implements [`UserRecords`] on top of a [`UserRecordConnectionProvider`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use roster::domain::ports::{FixtureUserRecordConnectionProvider, UserRecords};
/// use roster::domain::{RollNumber, UserRecord, UserRecordService};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let service = UserRecordService::new(Arc::new(FixtureUserRecordConnectionProvider::new()));
/// service
///     .create(UserRecord::new(RollNumber::new(101), "Asha", 88))
///     .await
///     .expect("create succeeds");
/// let record = service.get(RollNumber::new(101)).await.expect("record exists");
/// assert_eq!(record.mark(), 88);
/// # });
/// ```
#[derive(Clone)]
pub struct UserRecordService {
    connections: Arc<dyn UserRecordConnectionProvider>,
}

impl UserRecordService {
    pub fn new(connections: Arc<dyn UserRecordConnectionProvider>) -> Self {
        Self { connections }
    }

    async fn open(&self) -> Result<Box<dyn UserRecordSession>, UserRecordError> {
        self.connections
            .open()
            .await
            .map_err(|err| data_access("open connection", err))
    }
}

/// Log the storage failure and reduce it to a `DataAccess` outcome.
fn data_access(operation: &'static str, err: UserRecordPersistenceError) -> UserRecordError {
    error!(operation, error = %err, "user record data access failed");
    UserRecordError::data_access(err.to_string())
}

/// Fetch the keyed record or fail with `NotFound`.
async fn require_existing(
    session: &mut dyn UserRecordSession,
    roll_number: RollNumber,
    operation: &'static str,
) -> Result<UserRecord, UserRecordError> {
    match session.fetch_one(roll_number).await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => {
            debug!(%roll_number, operation, "user record not found");
            Err(UserRecordError::not_found(roll_number))
        }
        Err(err) => Err(data_access(operation, err)),
    }
}

fn column_names(changes: &[UserRecordChange]) -> Vec<&'static str> {
    changes
        .iter()
        .map(|change| change.column().column_name())
        .collect()
}

#[async_trait]
impl UserRecords for UserRecordService {
    async fn list(&self) -> Result<Vec<UserRecord>, UserRecordError> {
        let mut session = self.open().await?;
        session
            .fetch_all()
            .await
            .map_err(|err| data_access("list", err))
    }

    async fn get(&self, roll_number: RollNumber) -> Result<UserRecord, UserRecordError> {
        let mut session = self.open().await?;
        require_existing(session.as_mut(), roll_number, "get").await
    }

    async fn create(&self, record: UserRecord) -> Result<(), UserRecordError> {
        let mut session = self.open().await?;
        session
            .insert(&record)
            .await
            .map_err(|err| data_access("create", err))?;
        debug!(
            roll_number = %record.roll_number(),
            name = record.name(),
            mark = record.mark(),
            "user record created"
        );
        Ok(())
    }

    async fn update(
        &self,
        roll_number: RollNumber,
        patch: UserRecordPatch,
    ) -> Result<UserRecord, UserRecordError> {
        let mut session = self.open().await?;
        require_existing(session.as_mut(), roll_number, "update").await?;

        let changes = patch.changes();
        if changes.is_empty() {
            debug!(%roll_number, "no fields supplied, skipping update statement");
        } else {
            debug!(%roll_number, columns = ?column_names(&changes), "updating user record");
            session
                .update(roll_number, &changes)
                .await
                .map_err(|err| data_access("update", err))?;
        }

        require_existing(session.as_mut(), roll_number, "update").await
    }

    async fn delete(&self, roll_number: RollNumber) -> Result<(), UserRecordError> {
        let mut session = self.open().await?;
        let existing = require_existing(session.as_mut(), roll_number, "delete").await?;
        debug!(
            %roll_number,
            name = existing.name(),
            mark = existing.mark(),
            "deleting user record"
        );

        session
            .delete(roll_number)
            .await
            .map_err(|err| data_access("delete", err))?;

        let remaining = session
            .fetch_one(roll_number)
            .await
            .map_err(|err| data_access("delete", err))?;
        debug!(
            %roll_number,
            still_present = remaining.is_some(),
            "user record after deletion"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::ports::{FixtureUserRecordConnectionProvider, MockUserRecordSession};
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    /// Hands out one pre-programmed mock session.
    struct MockProvider {
        session: Mutex<Option<MockUserRecordSession>>,
    }

    impl MockProvider {
        fn service(session: MockUserRecordSession) -> UserRecordService {
            UserRecordService::new(Arc::new(Self {
                session: Mutex::new(Some(session)),
            }))
        }
    }

    #[async_trait]
    impl UserRecordConnectionProvider for MockProvider {
        async fn open(&self) -> Result<Box<dyn UserRecordSession>, UserRecordPersistenceError> {
            let session = self
                .session
                .lock()
                .expect("provider lock")
                .take()
                .expect("one session per test");
            Ok(Box::new(session))
        }
    }

    struct UnreachableProvider;

    #[async_trait]
    impl UserRecordConnectionProvider for UnreachableProvider {
        async fn open(&self) -> Result<Box<dyn UserRecordSession>, UserRecordPersistenceError> {
            Err(UserRecordPersistenceError::connection("connection refused"))
        }
    }

    fn asha() -> UserRecord {
        UserRecord::new(RollNumber::new(101), "Asha", 88)
    }

    #[fixture]
    fn fixture_provider() -> FixtureUserRecordConnectionProvider {
        FixtureUserRecordConnectionProvider::new()
    }

    fn service_over(provider: &FixtureUserRecordConnectionProvider) -> UserRecordService {
        UserRecordService::new(Arc::new(provider.clone()))
    }

    #[rstest]
    #[tokio::test]
    async fn create_then_get_returns_created_record(
        fixture_provider: FixtureUserRecordConnectionProvider,
    ) {
        let service = service_over(&fixture_provider);
        service.create(asha()).await.expect("create succeeds");

        let fetched = service.get(RollNumber::new(101)).await.expect("get succeeds");
        assert_eq!(fetched, asha());
    }

    #[rstest]
    #[tokio::test]
    async fn list_is_empty_before_any_create(fixture_provider: FixtureUserRecordConnectionProvider) {
        let service = service_over(&fixture_provider);
        assert!(service.list().await.expect("list succeeds").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_key_is_not_found_for_get_update_and_delete(
        fixture_provider: FixtureUserRecordConnectionProvider,
    ) {
        let service = service_over(&fixture_provider);
        let roll_number = RollNumber::new(404);

        let expected = UserRecordError::not_found(roll_number);
        assert_eq!(service.get(roll_number).await, Err(expected.clone()));
        assert_eq!(
            service
                .update(roll_number, UserRecordPatch::new(None, Some(1)))
                .await,
            Err(expected.clone())
        );
        assert_eq!(service.delete(roll_number).await, Err(expected));
    }

    #[rstest]
    #[tokio::test]
    async fn second_delete_reports_not_found(fixture_provider: FixtureUserRecordConnectionProvider) {
        let service = service_over(&fixture_provider);
        service.create(asha()).await.expect("create succeeds");

        service
            .delete(RollNumber::new(101))
            .await
            .expect("first delete succeeds");
        assert_eq!(
            service.delete(RollNumber::new(101)).await,
            Err(UserRecordError::not_found(101))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn empty_patch_returns_unchanged_record(
        fixture_provider: FixtureUserRecordConnectionProvider,
    ) {
        let service = service_over(&fixture_provider);
        service.create(asha()).await.expect("create succeeds");

        let updated = service
            .update(RollNumber::new(101), UserRecordPatch::default())
            .await
            .expect("empty update succeeds");
        assert_eq!(updated, asha());
        assert_eq!(fixture_provider.stored(RollNumber::new(101)), Some(asha()));
    }

    #[rstest]
    #[tokio::test]
    async fn every_operation_releases_its_connection(
        fixture_provider: FixtureUserRecordConnectionProvider,
    ) {
        let service = service_over(&fixture_provider);
        service.create(asha()).await.expect("create succeeds");
        let _ = service.create(asha()).await;
        let _ = service.get(RollNumber::new(7)).await;
        let _ = service.delete(RollNumber::new(7)).await;
        let _ = service.list().await;

        assert_eq!(fixture_provider.opened(), 5);
        assert_eq!(fixture_provider.released(), 5);
    }

    #[tokio::test]
    async fn empty_patch_issues_no_update_statement() {
        let mut session = MockUserRecordSession::new();
        session
            .expect_fetch_one()
            .with(eq(RollNumber::new(101)))
            .times(2)
            .returning(|_| Ok(Some(asha())));
        session.expect_update().never();

        let service = MockProvider::service(session);
        let record = service
            .update(RollNumber::new(101), UserRecordPatch::default())
            .await
            .expect("no-op update succeeds");
        assert_eq!(record, asha());
    }

    #[tokio::test]
    async fn update_binds_only_supplied_columns() {
        let mut session = MockUserRecordSession::new();
        let mut fetches = 0;
        session.expect_fetch_one().times(2).returning(move |_| {
            fetches += 1;
            let mark = if fetches == 1 { 88 } else { 92 };
            Ok(Some(UserRecord::new(RollNumber::new(101), "Asha", mark)))
        });
        session
            .expect_update()
            .withf(|roll_number, changes| {
                *roll_number == RollNumber::new(101)
                    && changes.to_vec() == vec![UserRecordChange::Mark(92)]
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = MockProvider::service(session);
        let record = service
            .update(RollNumber::new(101), UserRecordPatch::new(None, Some(92)))
            .await
            .expect("update succeeds");
        assert_eq!(record, UserRecord::new(RollNumber::new(101), "Asha", 92));
    }

    #[tokio::test]
    async fn failed_update_statement_is_data_access() {
        let mut session = MockUserRecordSession::new();
        session
            .expect_fetch_one()
            .times(1)
            .returning(|_| Ok(Some(asha())));
        session
            .expect_update()
            .returning(|_, _| Err(UserRecordPersistenceError::query("deadlock detected")));

        let service = MockProvider::service(session);
        let err = service
            .update(RollNumber::new(101), UserRecordPatch::new(Some("Ravi".into()), None))
            .await
            .expect_err("statement failure surfaces");
        assert!(matches!(err, UserRecordError::DataAccess { .. }));
    }

    #[tokio::test]
    async fn delete_of_missing_key_stays_not_found() {
        let mut session = MockUserRecordSession::new();
        session.expect_fetch_one().times(1).returning(|_| Ok(None));
        session.expect_delete().never();

        let service = MockProvider::service(session);
        assert_eq!(
            service.delete(RollNumber::new(101)).await,
            Err(UserRecordError::not_found(101))
        );
    }

    #[tokio::test]
    async fn delete_confirms_absence_after_commit() {
        let mut session = MockUserRecordSession::new();
        let mut fetches = 0;
        session.expect_fetch_one().times(2).returning(move |_| {
            fetches += 1;
            Ok((fetches == 1).then(asha))
        });
        session
            .expect_delete()
            .with(eq(RollNumber::new(101)))
            .times(1)
            .returning(|_| Ok(()));

        let service = MockProvider::service(session);
        service
            .delete(RollNumber::new(101))
            .await
            .expect("delete succeeds");
    }

    #[tokio::test]
    async fn record_vanishing_before_refetch_is_not_found() {
        let mut session = MockUserRecordSession::new();
        let mut fetches = 0;
        session.expect_fetch_one().times(2).returning(move |_| {
            fetches += 1;
            Ok((fetches == 1).then(asha))
        });
        session.expect_update().times(1).returning(|_, _| Ok(()));

        let service = MockProvider::service(session);
        assert_eq!(
            service
                .update(RollNumber::new(101), UserRecordPatch::new(None, Some(92)))
                .await,
            Err(UserRecordError::not_found(101))
        );
    }

    #[tokio::test]
    async fn failed_confirmation_read_after_delete_is_data_access() {
        let mut session = MockUserRecordSession::new();
        let mut fetches = 0;
        session.expect_fetch_one().times(2).returning(move |_| {
            fetches += 1;
            if fetches == 1 {
                Ok(Some(asha()))
            } else {
                Err(UserRecordPersistenceError::connection("server closed the connection"))
            }
        });
        session.expect_delete().times(1).returning(|_| Ok(()));

        let service = MockProvider::service(session);
        let err = service
            .delete(RollNumber::new(101))
            .await
            .expect_err("confirmation read fails");
        assert!(matches!(err, UserRecordError::DataAccess { .. }));
    }

    #[tokio::test]
    async fn failed_insert_is_data_access() {
        let mut session = MockUserRecordSession::new();
        session
            .expect_insert()
            .returning(|_| Err(UserRecordPersistenceError::query("duplicate key")));

        let service = MockProvider::service(session);
        let err = service.create(asha()).await.expect_err("insert fails");
        assert!(matches!(err, UserRecordError::DataAccess { .. }));
    }

    #[tokio::test]
    async fn unreachable_database_is_data_access() {
        let service = UserRecordService::new(Arc::new(UnreachableProvider));
        let err = service.list().await.expect_err("open fails");
        assert!(matches!(err, UserRecordError::DataAccess { .. }));
    }
}
