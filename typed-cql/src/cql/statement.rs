//! This module contains the terminal capability of every query builder: the
//! executable statement, which submits a finished fragment through a
//! [`Session`] and maps the deferred result into the requested shape.

use std::marker::PhantomData;

use tracing::{debug, warn};

use crate::cql::fragment::QueryFragment;
use crate::cql::session::{ExecutionError, ResultSet, Session};
use crate::cql::table::{FromRow, TableSchema};

/// The single execution primitive every result-shape accessor derives from.
/// The rendered text is submitted verbatim, once per call.
pub(crate) async fn submit(
    session: &dyn Session,
    fragment: &QueryFragment,
    keyspace: &str,
) -> Result<ResultSet, ExecutionError> {
    debug!(statement = fragment.query_string(), keyspace, "submitting statement");
    session.submit(fragment.query_string(), keyspace).await
}

/// A finished statement paired with the keyspace context required to run it.
///
/// Holds no mutable state; every accessor call re-submits the statement
/// (submission is not idempotent by construction). The accessor pairs
/// [`one`](ExecutableStatement::one)/[`get`](ExecutableStatement::get) and
/// [`fetch`](ExecutableStatement::fetch)/[`collect`](ExecutableStatement::collect)
/// are aliases kept for both historical accessor families; each pair shares
/// the one execution primitive and never issues the statement twice.
#[derive(Debug, Clone)]
pub struct ExecutableStatement<T>
where
    T: TableSchema,
{
    fragment: QueryFragment,
    keyspace: &'static str,
    _marker: PhantomData<T>,
}

impl<T> ExecutableStatement<T>
where
    T: TableSchema,
{
    pub(crate) fn new(fragment: QueryFragment) -> Self {
        Self {
            fragment,
            keyspace: T::keyspace(),
            _marker: PhantomData,
        }
    }

    /// The rendered statement text.
    pub fn query_string(&self) -> &str {
        self.fragment.query_string()
    }

    /// The keyspace the statement is bound to.
    pub fn keyspace(&self) -> &'static str {
        self.keyspace
    }

    pub(crate) fn into_fragment(self) -> QueryFragment {
        self.fragment
    }

    /// Submits the statement and returns the raw result set.
    pub async fn execute(&self, session: &dyn Session) -> Result<ResultSet, ExecutionError> {
        submit(session, &self.fragment, self.keyspace).await
    }

    /// Submits the statement and decodes the first row into a typed record.
    ///
    /// Zero rows yield `Ok(None)`, never an error. When more than one row is
    /// returned only the first is taken.
    pub async fn one(&self, session: &dyn Session) -> Result<Option<T::Record>, ExecutionError> {
        let result = self.execute(session).await?;
        match result.rows().first() {
            Some(row) => Ok(Some(T::Record::from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Alias of [`ExecutableStatement::one`].
    pub async fn get(&self, session: &dyn Session) -> Result<Option<T::Record>, ExecutionError> {
        self.one(session).await
    }

    /// Submits the statement and decodes every row into a typed record,
    /// eagerly materialized.
    pub async fn fetch(&self, session: &dyn Session) -> Result<Vec<T::Record>, ExecutionError> {
        let result = self.execute(session).await?;
        result
            .rows()
            .iter()
            .map(|row| T::Record::from_row(row).map_err(ExecutionError::from))
            .collect()
    }

    /// Alias of [`ExecutableStatement::fetch`].
    pub async fn collect(&self, session: &dyn Session) -> Result<Vec<T::Record>, ExecutionError> {
        self.fetch(session).await
    }
}

/// A finished CREATE TABLE statement plus its follow-up CREATE INDEX
/// statements.
#[derive(Debug, Clone)]
pub struct CreateStatement<T>
where
    T: TableSchema,
{
    base: QueryFragment,
    indexes: Vec<QueryFragment>,
    keyspace: &'static str,
    _marker: PhantomData<T>,
}

impl<T> CreateStatement<T>
where
    T: TableSchema,
{
    pub(crate) fn new(base: QueryFragment, indexes: Vec<QueryFragment>) -> Self {
        Self {
            base,
            indexes,
            keyspace: T::keyspace(),
            _marker: PhantomData,
        }
    }

    /// The rendered CREATE TABLE text.
    pub fn query_string(&self) -> &str {
        self.base.query_string()
    }

    /// The rendered CREATE INDEX texts, one per secondary-index column.
    pub fn index_query_strings(&self) -> Vec<&str> {
        self.indexes
            .iter()
            .map(QueryFragment::query_string)
            .collect()
    }

    /// Submits the base CREATE TABLE, then all CREATE INDEX statements
    /// concurrently once the base has completed.
    ///
    /// Resolves when the base and every index creation complete; fails with
    /// the first index-creation failure, leaving already-created indexes in
    /// place (no rollback). Issues exactly `1 + M` submissions for `M`
    /// secondary-index columns.
    pub async fn execute(&self, session: &dyn Session) -> Result<ResultSet, ExecutionError> {
        let result = submit(session, &self.base, self.keyspace).await?;

        let creations = self
            .indexes
            .iter()
            .map(|fragment| submit(session, fragment, self.keyspace));
        if let Err(error) = futures::future::try_join_all(creations).await {
            warn!(table = T::table_name(), %error, "index creation failed");
            return Err(error);
        }

        Ok(result)
    }
}

/// A finished BATCH statement.
#[derive(Debug, Clone)]
pub struct BatchStatement {
    fragment: QueryFragment,
    keyspace: &'static str,
}

impl BatchStatement {
    pub(crate) fn new(fragment: QueryFragment, keyspace: &'static str) -> Self {
        Self { fragment, keyspace }
    }

    /// The rendered batch text.
    pub fn query_string(&self) -> &str {
        self.fragment.query_string()
    }

    /// The keyspace the batch is bound to.
    pub fn keyspace(&self) -> &'static str {
        self.keyspace
    }

    /// Submits the batch and returns the raw result set.
    pub async fn execute(&self, session: &dyn Session) -> Result<ResultSet, ExecutionError> {
        submit(session, &self.fragment, self.keyspace).await
    }
}

#[cfg(test)]
mod tests {

    use std::net::{IpAddr, Ipv4Addr};

    use super::*;
    use crate::cql::query::{CreateQuery, Predicate, SelectQuery};
    use crate::cql::session::{MemorySession, Row};
    use crate::cql::value::CqlValue;
    use crate::tests::{Primitives, Series, SeriesReading, primitives_row, series_reading_row};

    fn sample() -> Primitives {
        Primitives {
            pkey: "row-1".to_string(),
            long: 42,
            boolean: true,
            decimal: rust_decimal::Decimal::new(12345, 2),
            double: 0.25,
            float: 1.5,
            inet: IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
            int: 7,
        }
    }

    #[tokio::test]
    async fn test_should_execute_and_decode_single_row() {
        let session = MemorySession::new();
        let record = sample();
        session.respond_with(vec![primitives_row(&record)]);

        let decoded = SelectQuery::<Primitives>::new()
            .filter(Predicate::eq("pkey", "row-1"))
            .unwrap()
            .build()
            .one(&session)
            .await
            .unwrap();
        assert_eq!(decoded, Some(record));
    }

    #[tokio::test]
    async fn test_should_return_empty_optional_for_missing_row() {
        let session = MemorySession::new();

        let decoded = SelectQuery::<Primitives>::new()
            .filter(Predicate::eq("pkey", "absent"))
            .unwrap()
            .build()
            .one(&session)
            .await
            .unwrap();
        assert_eq!(decoded, None);
    }

    #[tokio::test]
    async fn test_should_take_first_row_when_more_than_one_is_returned() {
        let session = MemorySession::new();
        let first = sample();
        let mut second = sample();
        second.pkey = "row-2".to_string();
        session.respond_with(vec![primitives_row(&first), primitives_row(&second)]);

        let decoded = SelectQuery::<Primitives>::new()
            .build()
            .get(&session)
            .await
            .unwrap();
        assert_eq!(decoded, Some(first));
    }

    #[tokio::test]
    async fn test_should_decode_projected_subset_into_narrow_record() {
        let session = MemorySession::new();
        let record = SeriesReading {
            sensor: uuid::Uuid::nil(),
            day: "2024-02-01".to_string(),
            reading: 21.5,
        };
        session.respond_with(vec![series_reading_row(&record)]);

        let statement =
            SelectQuery::<SeriesReading>::with_columns(&["sensor", "day", "reading"])
                .unwrap()
                .build();
        assert_eq!(
            statement.query_string(),
            "SELECT sensor, day, reading FROM demo.series;"
        );

        let decoded = statement.get(&session).await.unwrap();
        assert_eq!(decoded, Some(record));
    }

    #[tokio::test]
    async fn test_should_fetch_projected_subset_rows() {
        let session = MemorySession::new();
        let first = SeriesReading {
            sensor: uuid::Uuid::nil(),
            day: "2024-02-01".to_string(),
            reading: 21.5,
        };
        let mut second = first.clone();
        second.reading = 18.0;
        session.respond_with(vec![series_reading_row(&first), series_reading_row(&second)]);

        let records = SelectQuery::<SeriesReading>::with_columns(&["sensor", "day", "reading"])
            .unwrap()
            .build()
            .fetch(&session)
            .await
            .unwrap();
        assert_eq!(records, vec![first, second]);
    }

    #[tokio::test]
    async fn test_should_fetch_all_rows_eagerly() {
        let session = MemorySession::new();
        let first = sample();
        let mut second = sample();
        second.pkey = "row-2".to_string();
        session.respond_with(vec![primitives_row(&first), primitives_row(&second)]);

        let records = SelectQuery::<Primitives>::new()
            .build()
            .collect(&session)
            .await
            .unwrap();
        assert_eq!(records, vec![first, second]);
        assert_eq!(session.submission_count(), 1);
    }

    #[tokio::test]
    async fn test_should_submit_statement_once_per_accessor_call() {
        let session = MemorySession::new();
        let statement = SelectQuery::<Primitives>::new().build();

        statement.one(&session).await.unwrap();
        statement.fetch(&session).await.unwrap();
        assert_eq!(session.submission_count(), 2);
    }

    #[tokio::test]
    async fn test_should_fail_deferred_result_on_deserialization_error() {
        let session = MemorySession::new();
        session.respond_with(vec![
            [("pkey", CqlValue::Int(1))].into_iter().collect::<Row>(),
        ]);

        let err = SelectQuery::<Primitives>::new()
            .build()
            .one(&session)
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::Deserialization(_)));
    }

    #[tokio::test]
    async fn test_should_pass_remote_failure_through_unmodified() {
        let session = MemorySession::new();
        session.fail_with(ExecutionError::Remote("write timeout".to_string()));

        let err = SelectQuery::<Primitives>::new()
            .build()
            .execute(&session)
            .await
            .unwrap_err();
        assert_eq!(err, ExecutionError::Remote("write timeout".to_string()));
    }

    #[tokio::test]
    async fn test_should_issue_one_plus_m_submissions_for_create() {
        let session = MemorySession::new();

        CreateQuery::<Series>::new()
            .unwrap()
            .build()
            .execute(&session)
            .await
            .unwrap();

        let submissions = session.submissions();
        assert_eq!(submissions.len(), 2);
        assert!(submissions[0].starts_with("CREATE TABLE IF NOT EXISTS demo.series"));
        assert_eq!(
            submissions[1],
            "CREATE INDEX IF NOT EXISTS ON demo.series (origin);"
        );
    }

    #[tokio::test]
    async fn test_should_fail_create_on_index_creation_failure() {
        let session = MemorySession::new();
        // base succeeds, index creation fails
        session.respond_with(vec![]);
        session.fail_with(ExecutionError::Remote("index failed".to_string()));

        let err = CreateQuery::<Series>::new()
            .unwrap()
            .build()
            .execute(&session)
            .await
            .unwrap_err();
        assert_eq!(err, ExecutionError::Remote("index failed".to_string()));
        // the base submission is not rolled back
        assert_eq!(session.submission_count(), 2);
    }
}
