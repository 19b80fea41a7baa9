use std::marker::PhantomData;

use crate::cql::consistency::ConsistencyLevel;
use crate::cql::fragment::QueryFragment;
use crate::cql::query::markers::{
    Chained, Limited, Ordered, Specified, Unchained, Unlimited, Unordered, Unspecified,
};
use crate::cql::query::{Predicate, QueryShapeError};
use crate::cql::statement::ExecutableStatement;
use crate::cql::table::{SortOrder, TableSchema};

/// A SELECT statement builder.
///
/// The marker parameters track, at compile time, whether a WHERE chain has
/// been started, whether an ORDER BY has been applied, whether a LIMIT has
/// been applied and whether a consistency level has been specified. Illegal
/// clause sequences (an `and` without a prior `filter`, an `order_by` after
/// `limit`, a second `order_by` or `limit`) do not compile.
///
/// Column-role rules are value-dependent and checked at construction time:
/// filtering a column that is neither a partition key, clustering key nor
/// secondary index is rejected unless [`SelectQuery::allow_filtering`] was
/// requested first.
#[derive(Debug, Clone)]
pub struct SelectQuery<T, Where = Unchained, Order = Unordered, Lim = Unlimited, Cons = Unspecified>
where
    T: TableSchema,
{
    projection: Vec<&'static str>,
    where_fragment: QueryFragment,
    order_clause: Option<String>,
    limit: Option<u64>,
    allow_filtering: bool,
    partition_restricted: bool,
    consistency: Option<ConsistencyLevel>,
    _marker: PhantomData<(T, Where, Order, Lim, Cons)>,
}

impl<T> SelectQuery<T>
where
    T: TableSchema,
{
    /// Starts a SELECT over all columns of the table.
    pub fn new() -> Self {
        Self {
            projection: Vec::new(),
            where_fragment: QueryFragment::default(),
            order_clause: None,
            limit: None,
            allow_filtering: false,
            partition_restricted: false,
            consistency: None,
            _marker: PhantomData,
        }
    }

    /// Starts a SELECT over a projected subset of columns.
    pub fn with_columns(columns: &[&'static str]) -> Result<Self, QueryShapeError> {
        for column in columns {
            if T::column(column).is_none() {
                return Err(QueryShapeError::UnknownColumn {
                    table: T::table_name(),
                    column,
                });
            }
        }

        let mut query = Self::new();
        query.projection = columns.to_vec();
        Ok(query)
    }
}

impl<T> Default for SelectQuery<T>
where
    T: TableSchema,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, Where, Order, Lim, Cons> SelectQuery<T, Where, Order, Lim, Cons>
where
    T: TableSchema,
{
    /// Rebinds the marker set; fields carry over unchanged.
    fn cast<W2, O2, L2, C2>(self) -> SelectQuery<T, W2, O2, L2, C2> {
        SelectQuery {
            projection: self.projection,
            where_fragment: self.where_fragment,
            order_clause: self.order_clause,
            limit: self.limit,
            allow_filtering: self.allow_filtering,
            partition_restricted: self.partition_restricted,
            consistency: self.consistency,
            _marker: PhantomData,
        }
    }

    /// Validates a predicate column against the filtering rules.
    fn check_predicate(&self, predicate: &Predicate) -> Result<bool, QueryShapeError> {
        let column =
            T::column(predicate.column()).ok_or_else(|| QueryShapeError::UnknownColumn {
                table: T::table_name(),
                column: predicate.column(),
            })?;

        if !column.is_key_or_index() && !self.allow_filtering {
            return Err(QueryShapeError::FilterOnNonKeyColumn {
                column: column.name,
            });
        }

        Ok(column.is_partition_key())
    }

    /// Converts the builder into an executable statement. Any marker state is
    /// terminal for submission.
    pub fn build(self) -> ExecutableStatement<T> {
        let columns = if self.projection.is_empty() {
            T::columns()
                .iter()
                .map(|column| column.name)
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            self.projection.join(", ")
        };

        let mut fragment =
            QueryFragment::new(format!("SELECT {columns} FROM {}", T::qualified_name()));
        if let Some(level) = self.consistency {
            fragment = fragment.force_pad().append(format!("USING CONSISTENCY {level}"));
        }
        if !self.where_fragment.query_string().is_empty() {
            fragment = fragment.force_pad().append(self.where_fragment.query_string());
        }
        if let Some(order) = &self.order_clause {
            fragment = fragment.force_pad().append(order);
        }
        if let Some(limit) = self.limit {
            fragment = fragment.force_pad().append(format!("LIMIT {limit}"));
        }
        if self.allow_filtering {
            fragment = fragment.force_pad().append("ALLOW FILTERING");
        }

        ExecutableStatement::new(fragment.terminate())
    }
}

impl<T, Order, Lim, Cons> SelectQuery<T, Unchained, Order, Lim, Cons>
where
    T: TableSchema,
{
    /// Opts in to server-side filtering on non-indexed columns. Must be
    /// requested before the WHERE chain starts; rendered as a trailing
    /// `ALLOW FILTERING`.
    pub fn allow_filtering(mut self) -> Self {
        self.allow_filtering = true;
        self
    }

    /// Starts the WHERE chain with a predicate on a partition key, clustering
    /// key or secondary-index column.
    pub fn filter(
        self,
        predicate: Predicate,
    ) -> Result<SelectQuery<T, Chained, Order, Lim, Cons>, QueryShapeError> {
        let on_partition_key = self.check_predicate(&predicate)?;

        let mut next: SelectQuery<T, Chained, Order, Lim, Cons> = self.cast();
        next.partition_restricted |= on_partition_key;
        next.where_fragment = next
            .where_fragment
            .append(format!("WHERE {}", predicate.render()));
        Ok(next)
    }
}

impl<T, Order, Lim, Cons> SelectQuery<T, Chained, Order, Lim, Cons>
where
    T: TableSchema,
{
    /// Chains a further predicate onto the WHERE chain.
    pub fn and(mut self, predicate: Predicate) -> Result<Self, QueryShapeError> {
        let on_partition_key = self.check_predicate(&predicate)?;

        self.partition_restricted |= on_partition_key;
        self.where_fragment = self
            .where_fragment
            .append(format!(" AND {}", predicate.render()));
        Ok(self)
    }
}

impl<T, Cons> SelectQuery<T, Chained, Unordered, Unlimited, Cons>
where
    T: TableSchema,
{
    /// Orders the result by a clustering key column. Requires a prior WHERE
    /// predicate on a partition key and is only legal before `limit`.
    pub fn order_by(
        self,
        column: &'static str,
        order: SortOrder,
    ) -> Result<SelectQuery<T, Chained, Ordered, Unlimited, Cons>, QueryShapeError> {
        let def = T::column(column).ok_or(QueryShapeError::UnknownColumn {
            table: T::table_name(),
            column,
        })?;
        if !def.is_clustering_key() {
            return Err(QueryShapeError::NotAClusteringColumn { column });
        }
        if !self.partition_restricted {
            return Err(QueryShapeError::OrderByWithoutPartitionFilter);
        }

        let mut next: SelectQuery<T, Chained, Ordered, Unlimited, Cons> = self.cast();
        next.order_clause = Some(format!("ORDER BY {column} {}", order.as_cql()));
        Ok(next)
    }
}

impl<T, Where, Order, Cons> SelectQuery<T, Where, Order, Unlimited, Cons>
where
    T: TableSchema,
{
    /// Limits the number of returned rows.
    pub fn limit(self, limit: u64) -> SelectQuery<T, Where, Order, Limited, Cons> {
        let mut next: SelectQuery<T, Where, Order, Limited, Cons> = self.cast();
        next.limit = Some(limit);
        next
    }
}

impl<T, Where, Order, Lim> SelectQuery<T, Where, Order, Lim, Unspecified>
where
    T: TableSchema,
{
    /// Specifies the consistency level, at most once per statement.
    pub fn consistency(
        self,
        level: ConsistencyLevel,
    ) -> SelectQuery<T, Where, Order, Lim, Specified> {
        let mut next: SelectQuery<T, Where, Order, Lim, Specified> = self.cast();
        next.consistency = Some(level);
        next
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::tests::Series;

    #[test]
    fn test_should_render_select_all_columns() {
        let statement = SelectQuery::<Series>::new().build();
        assert_eq!(
            statement.query_string(),
            "SELECT sensor, day, at, origin, owner, tags, events, counters, reading, location, \
             note FROM demo.series;"
        );
    }

    #[test]
    fn test_should_render_projected_select_with_where_chain() {
        let statement = SelectQuery::<Series>::with_columns(&["sensor", "reading"])
            .unwrap()
            .filter(Predicate::eq("sensor", uuid::Uuid::nil()))
            .unwrap()
            .and(Predicate::eq("day", "2024-02-01"))
            .unwrap()
            .build();
        assert_eq!(
            statement.query_string(),
            "SELECT sensor, reading FROM demo.series \
             WHERE sensor = 00000000-0000-0000-0000-000000000000 AND day = '2024-02-01';"
        );
    }

    #[test]
    fn test_should_render_order_by_and_limit() {
        let statement = SelectQuery::<Series>::new()
            .filter(Predicate::eq("sensor", uuid::Uuid::nil()))
            .unwrap()
            .order_by("at", SortOrder::Descending)
            .unwrap()
            .limit(10)
            .build();
        assert!(statement.query_string().ends_with(
            "WHERE sensor = 00000000-0000-0000-0000-000000000000 ORDER BY at DESC LIMIT 10;"
        ));
    }

    #[test]
    fn test_should_render_consistency_clause() {
        let statement = SelectQuery::<Series>::new()
            .consistency(ConsistencyLevel::Quorum)
            .build();
        assert!(
            statement
                .query_string()
                .contains("FROM demo.series USING CONSISTENCY QUORUM")
        );
    }

    #[test]
    fn test_should_reject_filter_on_non_key_column() {
        let err = SelectQuery::<Series>::new()
            .filter(Predicate::gt("reading", 3.5f64))
            .unwrap_err();
        assert_eq!(
            err,
            QueryShapeError::FilterOnNonKeyColumn { column: "reading" }
        );
    }

    #[test]
    fn test_should_accept_filter_on_non_key_column_with_allow_filtering() {
        let statement = SelectQuery::<Series>::new()
            .allow_filtering()
            .filter(Predicate::gt("reading", 3.5f64))
            .unwrap()
            .build();
        assert_eq!(
            statement.query_string(),
            "SELECT sensor, day, at, origin, owner, tags, events, counters, reading, location, \
             note FROM demo.series WHERE reading > 3.5 ALLOW FILTERING;"
        );
    }

    #[test]
    fn test_should_accept_filter_on_secondary_index_column() {
        assert!(
            SelectQuery::<Series>::new()
                .filter(Predicate::eq("origin", "probe-1"))
                .is_ok()
        );
    }

    #[test]
    fn test_should_reject_unknown_projection_column() {
        let err = SelectQuery::<Series>::with_columns(&["sensor", "missing"]).unwrap_err();
        assert_eq!(
            err,
            QueryShapeError::UnknownColumn {
                table: "series",
                column: "missing",
            }
        );
    }

    #[test]
    fn test_should_reject_order_by_without_partition_filter() {
        let err = SelectQuery::<Series>::new()
            .filter(Predicate::eq("origin", "probe-1"))
            .unwrap()
            .order_by("at", SortOrder::Descending)
            .unwrap_err();
        assert_eq!(err, QueryShapeError::OrderByWithoutPartitionFilter);
    }

    #[test]
    fn test_should_reject_order_by_on_non_clustering_column() {
        let err = SelectQuery::<Series>::new()
            .filter(Predicate::eq("sensor", uuid::Uuid::nil()))
            .unwrap()
            .order_by("origin", SortOrder::Ascending)
            .unwrap_err();
        assert_eq!(err, QueryShapeError::NotAClusteringColumn { column: "origin" });
    }

    #[test]
    fn test_should_render_deterministically() {
        let build = || {
            SelectQuery::<Series>::new()
                .filter(Predicate::eq("sensor", uuid::Uuid::nil()))
                .unwrap()
                .limit(5)
                .build()
                .query_string()
                .to_string()
        };
        assert_eq!(build(), build());
    }
}
