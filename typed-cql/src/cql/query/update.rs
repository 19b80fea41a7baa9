use std::marker::PhantomData;
use std::time::Duration;

use crate::cql::consistency::ConsistencyLevel;
use crate::cql::fragment::QueryFragment;
use crate::cql::query::markers::{
    Assigned, Chained, Specified, Unassigned, Unchained, Unspecified,
};
use crate::cql::query::{Predicate, QueryShapeError, using_clause};
use crate::cql::statement::ExecutableStatement;
use crate::cql::table::{CollectionKind, ColumnDef, TableSchema};
use crate::cql::value::CqlValue;

/// An UPDATE statement builder.
///
/// `Val` tracks the SET chain, `Where` the WHERE chain; `build` only exists
/// once both have been started. WHERE predicates are restricted to key and
/// indexed columns, with no `ALLOW FILTERING` escape hatch for writes.
/// Collection mutators are checked against the column's collection kind.
#[derive(Debug, Clone)]
pub struct UpdateQuery<T, Val = Unassigned, Where = Unchained, Cons = Unspecified>
where
    T: TableSchema,
{
    assignments: Vec<String>,
    where_fragment: QueryFragment,
    condition: Option<String>,
    ttl_seconds: Option<u64>,
    timestamp: Option<i64>,
    consistency: Option<ConsistencyLevel>,
    _marker: PhantomData<(T, Val, Where, Cons)>,
}

impl<T> UpdateQuery<T>
where
    T: TableSchema,
{
    pub fn new() -> Self {
        Self {
            assignments: Vec::new(),
            where_fragment: QueryFragment::default(),
            condition: None,
            ttl_seconds: None,
            timestamp: None,
            consistency: None,
            _marker: PhantomData,
        }
    }
}

impl<T> Default for UpdateQuery<T>
where
    T: TableSchema,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, Val, Where, Cons> UpdateQuery<T, Val, Where, Cons>
where
    T: TableSchema,
{
    fn cast<V2, W2, C2>(self) -> UpdateQuery<T, V2, W2, C2> {
        UpdateQuery {
            assignments: self.assignments,
            where_fragment: self.where_fragment,
            condition: self.condition,
            ttl_seconds: self.ttl_seconds,
            timestamp: self.timestamp,
            consistency: self.consistency,
            _marker: PhantomData,
        }
    }

    fn lookup_column(&self, column: &'static str) -> Result<&'static ColumnDef, QueryShapeError> {
        T::column(column).ok_or(QueryShapeError::UnknownColumn {
            table: T::table_name(),
            column,
        })
    }

    fn lookup_collection(
        &self,
        column: &'static str,
        operation: &'static str,
        expected: &[CollectionKind],
        expected_name: &'static str,
    ) -> Result<&'static ColumnDef, QueryShapeError> {
        let def = self.lookup_column(column)?;
        match def.collection_kind() {
            Some(kind) if expected.contains(&kind) => Ok(def),
            _ => Err(QueryShapeError::NotACollectionColumn {
                column,
                operation,
                expected: expected_name,
            }),
        }
    }

    fn push_assignment(
        self,
        assignment: String,
    ) -> UpdateQuery<T, Assigned, Where, Cons> {
        let mut next: UpdateQuery<T, Assigned, Where, Cons> = self.cast();
        next.assignments.push(assignment);
        next
    }

    /// Assigns `column = value`.
    pub fn modify(
        self,
        column: &'static str,
        value: impl Into<CqlValue>,
    ) -> Result<UpdateQuery<T, Assigned, Where, Cons>, QueryShapeError> {
        self.lookup_column(column)?;
        let literal = value.into().to_cql_literal();
        Ok(self.push_assignment(format!("{column} = {literal}")))
    }

    /// Appends an item to a list column: `col = col + [item]`.
    pub fn append(
        self,
        column: &'static str,
        item: impl Into<CqlValue>,
    ) -> Result<UpdateQuery<T, Assigned, Where, Cons>, QueryShapeError> {
        self.lookup_collection(column, "append", &[CollectionKind::List], "list")?;
        let literal = item.into().to_cql_literal();
        Ok(self.push_assignment(format!("{column} = {column} + [{literal}]")))
    }

    /// Prepends an item to a list column: `col = [item] + col`.
    pub fn prepend(
        self,
        column: &'static str,
        item: impl Into<CqlValue>,
    ) -> Result<UpdateQuery<T, Assigned, Where, Cons>, QueryShapeError> {
        self.lookup_collection(column, "prepend", &[CollectionKind::List], "list")?;
        let literal = item.into().to_cql_literal();
        Ok(self.push_assignment(format!("{column} = [{literal}] + {column}")))
    }

    /// Adds an item to a set or list column.
    pub fn add(
        self,
        column: &'static str,
        item: impl Into<CqlValue>,
    ) -> Result<UpdateQuery<T, Assigned, Where, Cons>, QueryShapeError> {
        let def = self.lookup_collection(
            column,
            "add",
            &[CollectionKind::List, CollectionKind::Set],
            "list or set",
        )?;
        let literal = item.into().to_cql_literal();
        let assignment = match def.collection_kind() {
            Some(CollectionKind::Set) => format!("{column} = {column} + {{{literal}}}"),
            _ => format!("{column} = {column} + [{literal}]"),
        };
        Ok(self.push_assignment(assignment))
    }

    /// Removes an item from a set or list column.
    pub fn remove(
        self,
        column: &'static str,
        item: impl Into<CqlValue>,
    ) -> Result<UpdateQuery<T, Assigned, Where, Cons>, QueryShapeError> {
        let def = self.lookup_collection(
            column,
            "remove",
            &[CollectionKind::List, CollectionKind::Set],
            "list or set",
        )?;
        let literal = item.into().to_cql_literal();
        let assignment = match def.collection_kind() {
            Some(CollectionKind::Set) => format!("{column} = {column} - {{{literal}}}"),
            _ => format!("{column} = {column} - [{literal}]"),
        };
        Ok(self.push_assignment(assignment))
    }

    /// Puts a key/value entry into a map column: `col[key] = value`.
    pub fn put_item(
        self,
        column: &'static str,
        key: impl Into<CqlValue>,
        value: impl Into<CqlValue>,
    ) -> Result<UpdateQuery<T, Assigned, Where, Cons>, QueryShapeError> {
        self.lookup_collection(column, "put_item", &[CollectionKind::Map], "map")?;
        let key = key.into().to_cql_literal();
        let value = value.into().to_cql_literal();
        Ok(self.push_assignment(format!("{column}[{key}] = {value}")))
    }

    /// Makes the update conditional (`IF ...`); repeated conditions are
    /// joined with AND.
    pub fn only_if(mut self, predicate: Predicate) -> Self {
        self.condition = Some(match self.condition {
            Some(existing) => format!("{existing} AND {}", predicate.render()),
            None => predicate.render(),
        });
        self
    }

    /// Sets a time-to-live for the updated columns, rendered as whole
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

    fn check_key_predicate(&self, predicate: &Predicate) -> Result<(), QueryShapeError> {
        let column = self.lookup_column(predicate.column())?;
        if !column.is_key_or_index() {
            return Err(QueryShapeError::FilterOnNonKeyColumn {
                column: column.name,
            });
        }
        Ok(())
    }
}

impl<T, Val, Cons> UpdateQuery<T, Val, Unchained, Cons>
where
    T: TableSchema,
{
    /// Starts the WHERE chain with a predicate on a key column.
    pub fn filter(
        self,
        predicate: Predicate,
    ) -> Result<UpdateQuery<T, Val, Chained, Cons>, QueryShapeError> {
        self.check_key_predicate(&predicate)?;

        let mut next: UpdateQuery<T, Val, Chained, Cons> = self.cast();
        next.where_fragment = next
            .where_fragment
            .append(format!("WHERE {}", predicate.render()));
        Ok(next)
    }
}

impl<T, Val, Cons> UpdateQuery<T, Val, Chained, Cons>
where
    T: TableSchema,
{
    /// Chains a further predicate onto the WHERE chain.
    pub fn and(mut self, predicate: Predicate) -> Result<Self, QueryShapeError> {
        self.check_key_predicate(&predicate)?;
        self.where_fragment = self
            .where_fragment
            .append(format!(" AND {}", predicate.render()));
        Ok(self)
    }
}

impl<T, Val, Where> UpdateQuery<T, Val, Where, Unspecified>
where
    T: TableSchema,
{
    /// Specifies the consistency level, at most once per statement.
    pub fn consistency(
        self,
        level: ConsistencyLevel,
    ) -> UpdateQuery<T, Val, Where, Specified> {
        let mut next: UpdateQuery<T, Val, Where, Specified> = self.cast();
        next.consistency = Some(level);
        next
    }
}

impl<T, Cons> UpdateQuery<T, Assigned, Chained, Cons>
where
    T: TableSchema,
{
    /// Converts the builder into an executable statement.
    pub fn build(self) -> ExecutableStatement<T> {
        let mut fragment = QueryFragment::new(format!("UPDATE {}", T::qualified_name()));
        if let Some(using) = using_clause(self.consistency, self.ttl_seconds, self.timestamp) {
            fragment = fragment.force_pad().append(using);
        }
        fragment = fragment
            .force_pad()
            .append(format!("SET {}", self.assignments.join(", ")))
            .force_pad()
            .append(self.where_fragment.query_string());
        if let Some(condition) = &self.condition {
            fragment = fragment.force_pad().append(format!("IF {condition}"));
        }

        ExecutableStatement::new(fragment.terminate())
    }
}
