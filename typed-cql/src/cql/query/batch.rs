use std::marker::PhantomData;

use crate::cql::consistency::ConsistencyLevel;
use crate::cql::fragment::QueryFragment;
use crate::cql::query::QueryShapeError;
use crate::cql::query::markers::{Specified, Unspecified};
use crate::cql::statement::{BatchStatement, ExecutableStatement};
use crate::cql::table::TableSchema;

/// The kind of a CQL batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BatchType {
    #[default]
    Logged,
    Unlogged,
    Counter,
}

impl BatchType {
    fn opening_clause(&self) -> &'static str {
        match self {
            BatchType::Logged => "BEGIN BATCH",
            BatchType::Unlogged => "BEGIN UNLOGGED BATCH",
            BatchType::Counter => "BEGIN COUNTER BATCH",
        }
    }
}

/// A BATCH statement builder.
///
/// Accumulates finished INSERT/UPDATE/DELETE statements (possibly over
/// different tables of the same keyspace) and renders them under a single
/// `BEGIN ... APPLY BATCH` envelope. The batch is submitted against the
/// keyspace of the first added statement. `Cons` tracks the batch-level
/// consistency level, applicable at most once and rendered as a
/// `USING CONSISTENCY` clause after the opening keyword.
#[derive(Debug, Clone)]
pub struct BatchQuery<Cons = Unspecified> {
    batch_type: BatchType,
    keyspace: Option<&'static str>,
    statements: Vec<QueryFragment>,
    consistency: Option<ConsistencyLevel>,
    _marker: PhantomData<Cons>,
}

impl BatchQuery {
    pub fn new(batch_type: BatchType) -> Self {
        Self {
            batch_type,
            keyspace: None,
            statements: Vec::new(),
            consistency: None,
            _marker: PhantomData,
        }
    }
}

impl Default for BatchQuery {
    fn default() -> Self {
        Self::new(BatchType::default())
    }
}

impl<Cons> BatchQuery<Cons> {
    fn cast<C2>(self) -> BatchQuery<C2> {
        BatchQuery {
            batch_type: self.batch_type,
            keyspace: self.keyspace,
            statements: self.statements,
            consistency: self.consistency,
            _marker: PhantomData,
        }
    }

    /// Appends a finished statement to the batch.
    pub fn add<T>(mut self, statement: ExecutableStatement<T>) -> Self
    where
        T: TableSchema,
    {
        self.keyspace.get_or_insert(statement.keyspace());
        self.statements.push(statement.into_fragment());
        self
    }

    /// Converts the builder into an executable statement. A batch with no
    /// statements is rejected.
    pub fn build(self) -> Result<BatchStatement, QueryShapeError> {
        let keyspace = self.keyspace.ok_or(QueryShapeError::EmptyBatch)?;

        let mut fragment = QueryFragment::new(self.batch_type.opening_clause());
        if let Some(level) = self.consistency {
            fragment = fragment
                .force_pad()
                .append(format!("USING CONSISTENCY {level}"));
        }
        for statement in &self.statements {
            fragment = fragment.force_pad().append(statement.query_string());
        }
        fragment = fragment.force_pad().append("APPLY BATCH");

        Ok(BatchStatement::new(fragment.terminate(), keyspace))
    }
}

impl BatchQuery<Unspecified> {
    /// Specifies the batch-level consistency level, at most once.
    pub fn consistency(self, level: ConsistencyLevel) -> BatchQuery<Specified> {
        let mut next: BatchQuery<Specified> = self.cast();
        next.consistency = Some(level);
        next
    }
}
