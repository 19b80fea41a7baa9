//! This module contains the session capability consumed by executable
//! statements, together with the result-set model it returns.
//!
//! The actual network driver (connection pooling, cluster topology, protocol
//! encoding) is an external collaborator: this crate only submits rendered
//! statement text through the [`Session`] trait and maps the returned rows.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;

use crate::cql::table::{DeserializationError, FromCqlValue};
use crate::cql::value::CqlValue;

/// An enum representing possible errors while executing a statement.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExecutionError {
    /// Whatever the session capability reported (timeout, unavailable,
    /// read/write consistency failure). Passed through unmodified; this crate
    /// performs no retry policy of its own.
    #[error("remote execution failure: {0}")]
    Remote(String),

    /// Row-to-record mapping failed.
    #[error("deserialization failure: {0}")]
    Deserialization(#[from] DeserializationError),

    /// No session is registered for the requested keyspace.
    #[error("no session registered for keyspace '{0}'")]
    UnknownKeyspace(String),
}

/// The session capability: submits rendered statement text against a keyspace
/// and returns a deferred [`ResultSet`].
///
/// Implementations must support concurrent invocation from multiple logical
/// statements; this crate never synchronizes access to the session itself.
#[async_trait]
pub trait Session: Send + Sync {
    /// Submits the rendered statement text verbatim.
    async fn submit(&self, statement: &str, keyspace: &str) -> Result<ResultSet, ExecutionError>;
}

/// Resolves a [`Session`] bound to a named keyspace.
///
/// The discovery mechanism behind the lookup (static map, dynamic host list)
/// is an external concern.
pub trait KeyspaceProvider {
    /// Returns the session capability for the given keyspace name.
    fn resolve(&self, keyspace: &str) -> Result<Arc<dyn Session>, ExecutionError>;
}

/// A [`KeyspaceProvider`] backed by a static keyspace-to-session map.
#[derive(Default, Clone)]
pub struct SessionRegistry {
    sessions: HashMap<String, Arc<dyn Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the session serving the given keyspace, replacing any
    /// previous registration.
    pub fn register(&mut self, keyspace: impl Into<String>, session: Arc<dyn Session>) {
        self.sessions.insert(keyspace.into(), session);
    }
}

impl KeyspaceProvider for SessionRegistry {
    fn resolve(&self, keyspace: &str) -> Result<Arc<dyn Session>, ExecutionError> {
        self.sessions
            .get(keyspace)
            .cloned()
            .ok_or_else(|| ExecutionError::UnknownKeyspace(keyspace.to_string()))
    }
}

/// A single result row: ordered column name/value pairs.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Row {
    columns: Vec<(String, CqlValue)>,
}

impl Row {
    pub fn new(columns: Vec<(String, CqlValue)>) -> Self {
        Self { columns }
    }

    /// Returns the raw value of the named column, if present.
    pub fn get(&self, name: &str) -> Option<&CqlValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    /// Decodes the named column into a typed field value.
    pub fn column<V>(&self, name: &str) -> Result<V, DeserializationError>
    where
        V: FromCqlValue,
    {
        let value = self
            .get(name)
            .ok_or_else(|| DeserializationError::MissingColumn {
                column: name.to_string(),
            })?;
        V::from_cql(name, value)
    }

    /// Returns the column name/value pairs in result order.
    pub fn columns(&self) -> &[(String, CqlValue)] {
        &self.columns
    }
}

impl<N> FromIterator<(N, CqlValue)> for Row
where
    N: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, CqlValue)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }
}

/// The raw result of a statement submission.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResultSet {
    rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// The rows returned by the store, in result order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Consumes the result set, yielding its rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// An in-memory [`Session`] recording every submission and serving canned
/// responses in FIFO order.
///
/// A submission with no canned response resolves to an empty [`ResultSet`].
/// Used by the crate's tests and by the example; it performs no query
/// evaluation of its own.
#[derive(Default)]
pub struct MemorySession {
    submissions: Mutex<Vec<(String, String)>>,
    responses: Mutex<VecDeque<Result<ResultSet, ExecutionError>>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response carrying the given rows.
    pub fn respond_with(&self, rows: Vec<Row>) {
        self.responses
            .lock()
            .expect("responses lock poisoned")
            .push_back(Ok(ResultSet::new(rows)));
    }

    /// Queues a failed response.
    pub fn fail_with(&self, error: ExecutionError) {
        self.responses
            .lock()
            .expect("responses lock poisoned")
            .push_back(Err(error));
    }

    /// Returns the statements submitted so far, in submission order.
    pub fn submissions(&self) -> Vec<String> {
        self.submissions
            .lock()
            .expect("submissions lock poisoned")
            .iter()
            .map(|(statement, _)| statement.clone())
            .collect()
    }

    /// Returns the number of statements submitted so far.
    pub fn submission_count(&self) -> usize {
        self.submissions
            .lock()
            .expect("submissions lock poisoned")
            .len()
    }
}

#[async_trait]
impl Session for MemorySession {
    async fn submit(&self, statement: &str, keyspace: &str) -> Result<ResultSet, ExecutionError> {
        self.submissions
            .lock()
            .expect("submissions lock poisoned")
            .push((statement.to_string(), keyspace.to_string()));

        self.responses
            .lock()
            .expect("responses lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(ResultSet::default()))
    }
}
