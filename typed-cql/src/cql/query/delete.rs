use std::marker::PhantomData;

use crate::cql::consistency::ConsistencyLevel;
use crate::cql::fragment::QueryFragment;
use crate::cql::query::markers::{Chained, Specified, Unchained, Unspecified};
use crate::cql::query::{Predicate, QueryShapeError, using_clause};
use crate::cql::statement::ExecutableStatement;
use crate::cql::table::TableSchema;

/// A DELETE statement builder.
///
/// Deletes a whole row or, through [`DeleteQuery::columns`], a restricted
/// column list. The WHERE chain is mandatory (`build` only exists once it has
/// been started) and restricted to key and indexed columns.
#[derive(Debug, Clone)]
pub struct DeleteQuery<T, Where = Unchained, Cons = Unspecified>
where
    T: TableSchema,
{
    columns: Vec<&'static str>,
    where_fragment: QueryFragment,
    consistency: Option<ConsistencyLevel>,
    _marker: PhantomData<(T, Where, Cons)>,
}

impl<T> DeleteQuery<T>
where
    T: TableSchema,
{
    /// Starts a whole-row DELETE.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            where_fragment: QueryFragment::default(),
            consistency: None,
            _marker: PhantomData,
        }
    }

    /// Starts a DELETE restricted to specific columns.
    pub fn columns(columns: &[&'static str]) -> Result<Self, QueryShapeError> {
        for column in columns {
            if T::column(column).is_none() {
                return Err(QueryShapeError::UnknownColumn {
                    table: T::table_name(),
                    column,
                });
            }
        }

        let mut query = Self::new();
        query.columns = columns.to_vec();
        Ok(query)
    }
}

impl<T> Default for DeleteQuery<T>
where
    T: TableSchema,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, Where, Cons> DeleteQuery<T, Where, Cons>
where
    T: TableSchema,
{
    fn cast<W2, C2>(self) -> DeleteQuery<T, W2, C2> {
        DeleteQuery {
            columns: self.columns,
            where_fragment: self.where_fragment,
            consistency: self.consistency,
            _marker: PhantomData,
        }
    }

    fn check_key_predicate(&self, predicate: &Predicate) -> Result<(), QueryShapeError> {
        let column =
            T::column(predicate.column()).ok_or_else(|| QueryShapeError::UnknownColumn {
                table: T::table_name(),
                column: predicate.column(),
            })?;
        if !column.is_key_or_index() {
            return Err(QueryShapeError::FilterOnNonKeyColumn {
                column: column.name,
            });
        }
        Ok(())
    }
}

impl<T, Cons> DeleteQuery<T, Unchained, Cons>
where
    T: TableSchema,
{
    /// Starts the WHERE chain with a predicate on a key column.
    pub fn filter(
        self,
        predicate: Predicate,
    ) -> Result<DeleteQuery<T, Chained, Cons>, QueryShapeError> {
        self.check_key_predicate(&predicate)?;

        let mut next: DeleteQuery<T, Chained, Cons> = self.cast();
        next.where_fragment = next
            .where_fragment
            .append(format!("WHERE {}", predicate.render()));
        Ok(next)
    }
}

impl<T, Cons> DeleteQuery<T, Chained, Cons>
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

    /// Converts the builder into an executable statement.
    pub fn build(self) -> ExecutableStatement<T> {
        let mut fragment = QueryFragment::new("DELETE");
        if !self.columns.is_empty() {
            fragment = fragment.force_pad().append(self.columns.join(", "));
        }
        fragment = fragment
            .force_pad()
            .append(format!("FROM {}", T::qualified_name()));
        if let Some(using) = using_clause(self.consistency, None, None) {
            fragment = fragment.force_pad().append(using);
        }
        fragment = fragment
            .force_pad()
            .append(self.where_fragment.query_string());

        ExecutableStatement::new(fragment.terminate())
    }
}

impl<T, Where> DeleteQuery<T, Where, Unspecified>
where
    T: TableSchema,
{
    /// Specifies the consistency level, at most once per statement.
    pub fn consistency(self, level: ConsistencyLevel) -> DeleteQuery<T, Where, Specified> {
        let mut next: DeleteQuery<T, Where, Specified> = self.cast();
        next.consistency = Some(level);
        next
    }
}
