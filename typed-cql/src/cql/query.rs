//! This module exposes the type-state query builders, one state machine per
//! statement kind.
//!
//! Clause-sequencing rules (a second `with` without an intervening `and`, an
//! `and` without a prior `where`, ORDER BY after LIMIT) are enforced at
//! compile time through the phantom markers in [`markers`]: the offending
//! method simply does not exist for the marker combination. Rules that depend
//! on runtime values (column roles, consistency-level conflicts) are checked
//! at construction time and fail with a [`QueryShapeError`] before any
//! statement reaches a session.

pub mod batch;
pub mod create;
pub mod delete;
pub mod insert;
pub mod markers;
mod predicate;
pub mod select;
pub mod update;

use thiserror::Error;

pub use self::batch::{BatchQuery, BatchType};
pub use self::create::{
    CachingMode, CompactionStrategy, Compressor, CreateQuery, TableProperty,
};
pub use self::delete::DeleteQuery;
pub use self::insert::InsertQuery;
pub use self::predicate::Predicate;
pub use self::select::SelectQuery;
pub use self::update::UpdateQuery;
use crate::cql::consistency::ConsistencyLevel;

/// An enum representing query shapes that the type-state rules forbid.
///
/// These errors are raised at query-construction time, before any network
/// submission, and are always surfaced to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryShapeError {
    /// The referenced column does not exist in the table schema.
    #[error("unknown column '{column}' in table '{table}'")]
    UnknownColumn {
        table: &'static str,
        column: &'static str,
    },

    /// A WHERE predicate restricts a column that is neither a partition key,
    /// a clustering key, nor a secondary index, and `ALLOW FILTERING` was not
    /// requested.
    #[error("cannot filter on column '{column}': not a key or indexed column")]
    FilterOnNonKeyColumn { column: &'static str },

    /// ORDER BY references a column that is not a clustering key.
    #[error("cannot order by column '{column}': not a clustering key")]
    NotAClusteringColumn { column: &'static str },

    /// ORDER BY requires at least one WHERE predicate on a partition key.
    #[error("ORDER BY requires a WHERE predicate on a partition key")]
    OrderByWithoutPartitionFilter,

    /// A collection mutator was applied to a column of the wrong kind.
    #[error("cannot apply {operation} to column '{column}': not a {expected} column")]
    NotACollectionColumn {
        column: &'static str,
        operation: &'static str,
        expected: &'static str,
    },

    /// `IF NOT EXISTS` cannot be combined with consistency level ANY.
    #[error("a lightweight transaction cannot be combined with consistency level ANY")]
    LightweightTransactionWithAnyConsistency,

    /// A batch must carry at least one statement.
    #[error("batch contains no statements")]
    EmptyBatch,
}

/// Renders the `USING ...` clause shared by INSERT, UPDATE and DELETE.
pub(crate) fn using_clause(
    consistency: Option<ConsistencyLevel>,
    ttl_seconds: Option<u64>,
    timestamp: Option<i64>,
) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(level) = consistency {
        parts.push(format!("CONSISTENCY {level}"));
    }
    if let Some(seconds) = ttl_seconds {
        parts.push(format!("TTL {seconds}"));
    }
    if let Some(micros) = timestamp {
        parts.push(format!("TIMESTAMP {micros}"));
    }

    if parts.is_empty() {
        None
    } else {
        Some(format!("USING {}", parts.join(" AND ")))
    }
}
