//! Prelude exposes all the public types of the `typed-cql` crate.

pub use typed_cql_macros::FromRow;

pub use crate::cql::consistency::ConsistencyLevel;
pub use crate::cql::fragment::QueryFragment;
pub use crate::cql::query::{
    BatchQuery, BatchType, CachingMode, CompactionStrategy, Compressor, CreateQuery, DeleteQuery,
    InsertQuery, Predicate, QueryShapeError, SelectQuery, TableProperty, UpdateQuery,
};
pub use crate::cql::session::{
    ExecutionError, KeyspaceProvider, MemorySession, ResultSet, Row, Session, SessionRegistry,
};
pub use crate::cql::statement::{BatchStatement, CreateStatement, ExecutableStatement};
pub use crate::cql::table::{
    CollectionKind, ColumnDef, ColumnRole, DeserializationError, FromCqlValue, FromRow,
    SchemaError, SortOrder, TableSchema,
};
pub use crate::cql::value::CqlValue;
pub use crate::{CqlError, CqlResult};
