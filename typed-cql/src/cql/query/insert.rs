use std::marker::PhantomData;
use std::time::Duration;

use crate::cql::consistency::ConsistencyLevel;
use crate::cql::fragment::QueryFragment;
use crate::cql::query::markers::{Assigned, Specified, Unassigned, Unspecified};
use crate::cql::query::{QueryShapeError, using_clause};
use crate::cql::statement::ExecutableStatement;
use crate::cql::table::TableSchema;
use crate::cql::value::CqlValue;

/// An INSERT statement builder.
///
/// `Val` tracks whether at least one column/value pair has been assigned;
/// `build` only exists once it has. `if_not_exists` turns the statement into
/// a lightweight transaction, which the target store forbids in combination
/// with consistency level ANY; both orders of that combination are rejected
/// at construction time.
#[derive(Debug, Clone)]
pub struct InsertQuery<T, Val = Unassigned, Cons = Unspecified>
where
    T: TableSchema,
{
    values: Vec<(&'static str, CqlValue)>,
    if_not_exists: bool,
    ttl_seconds: Option<u64>,
    timestamp: Option<i64>,
    consistency: Option<ConsistencyLevel>,
    _marker: PhantomData<(T, Val, Cons)>,
}

impl<T> InsertQuery<T>
where
    T: TableSchema,
{
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            if_not_exists: false,
            ttl_seconds: None,
            timestamp: None,
            consistency: None,
            _marker: PhantomData,
        }
    }
}

impl<T> Default for InsertQuery<T>
where
    T: TableSchema,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, Val, Cons> InsertQuery<T, Val, Cons>
where
    T: TableSchema,
{
    fn cast<V2, C2>(self) -> InsertQuery<T, V2, C2> {
        InsertQuery {
            values: self.values,
            if_not_exists: self.if_not_exists,
            ttl_seconds: self.ttl_seconds,
            timestamp: self.timestamp,
            consistency: self.consistency,
            _marker: PhantomData,
        }
    }

    /// Assigns one column/value pair. Repeatable; assigning the same column
    /// twice overwrites the earlier value (last write wins).
    pub fn value(
        self,
        column: &'static str,
        value: impl Into<CqlValue>,
    ) -> Result<InsertQuery<T, Assigned, Cons>, QueryShapeError> {
        if T::column(column).is_none() {
            return Err(QueryShapeError::UnknownColumn {
                table: T::table_name(),
                column,
            });
        }

        let mut next: InsertQuery<T, Assigned, Cons> = self.cast();
        let value = value.into();
        match next.values.iter_mut().find(|(name, _)| *name == column) {
            Some(pair) => pair.1 = value,
            None => next.values.push((column, value)),
        }
        Ok(next)
    }

    /// Marks the insert as a lightweight transaction (`IF NOT EXISTS`).
    pub fn if_not_exists(mut self) -> Result<Self, QueryShapeError> {
        if self.consistency == Some(ConsistencyLevel::Any) {
            return Err(QueryShapeError::LightweightTransactionWithAnyConsistency);
        }
        self.if_not_exists = true;
        Ok(self)
    }

    /// Sets a time-to-live for the inserted columns, rendered as whole
    /// seconds.
    pub fn using_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_seconds = Some(ttl.as_secs());
        self
    }

    /// Sets an explicit write timestamp in microseconds.
    pub fn using_timestamp(mut self, micros: i64) -> Self {
        self.timestamp = Some(micros);
        self
    }
}

impl<T, Val> InsertQuery<T, Val, Unspecified>
where
    T: TableSchema,
{
    /// Specifies the consistency level, at most once per statement.
    pub fn consistency(
        self,
        level: ConsistencyLevel,
    ) -> Result<InsertQuery<T, Val, Specified>, QueryShapeError> {
        if level == ConsistencyLevel::Any && self.if_not_exists {
            return Err(QueryShapeError::LightweightTransactionWithAnyConsistency);
        }

        let mut next: InsertQuery<T, Val, Specified> = self.cast();
        next.consistency = Some(level);
        Ok(next)
    }
}

impl<T, Cons> InsertQuery<T, Assigned, Cons>
where
    T: TableSchema,
{
    /// Converts the builder into an executable statement.
    pub fn build(self) -> ExecutableStatement<T> {
        let columns = self
            .values
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ");
        let terms = self
            .values
            .iter()
            .map(|(_, value)| value.to_cql_literal())
            .collect::<Vec<_>>()
            .join(", ");

        let mut fragment = QueryFragment::new(format!(
            "INSERT INTO {} ({columns}) VALUES ({terms})",
            T::qualified_name()
        ));
        if self.if_not_exists {
            fragment = fragment.force_pad().append("IF NOT EXISTS");
        }
        if let Some(using) = using_clause(self.consistency, self.ttl_seconds, self.timestamp) {
            fragment = fragment.force_pad().append(using);
        }

        ExecutableStatement::new(fragment.terminate())
    }
}
