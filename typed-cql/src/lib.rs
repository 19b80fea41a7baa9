#![crate_name = "typed_cql"]
#![crate_type = "lib"]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # typed-cql
//!
//! A compile-time type-safe query-construction layer sitting atop a
//! wire-protocol CQL driver.
//!
//! Declare a table schema once with [`prelude::TableSchema`] and build CQL
//! statements through phantom type-state builders that make illegal query
//! shapes unrepresentable: an `and` without a prior `filter`, a second `with`
//! on a CREATE, or an `order_by` after `limit` simply do not compile.
//! Column-role rules that depend on runtime values are checked at
//! construction time, before any statement reaches a session.
//!
//! Network I/O, connection pooling and protocol encoding are delegated to an
//! underlying driver consumed through the [`prelude::Session`] capability;
//! finished statements submit their rendered text verbatim and map the
//! deferred result into raw, single-row or typed-record shapes.
//!
//! ```rust
//! use typed_cql::prelude::*;
//!
//! # use typed_cql::prelude::DeserializationError;
//! #[derive(Debug, Clone, PartialEq, FromRow)]
//! struct Account {
//!     id: i64,
//!     name: String,
//! }
//!
//! impl TableSchema for Account {
//!     type Record = Self;
//!
//!     fn keyspace() -> &'static str {
//!         "bank"
//!     }
//!
//!     fn table_name() -> &'static str {
//!         "accounts"
//!     }
//!
//!     fn columns() -> &'static [ColumnDef] {
//!         static COLUMNS: [ColumnDef; 2] = [
//!             ColumnDef {
//!                 name: "id",
//!                 cql_type: "bigint",
//!                 role: ColumnRole::PartitionKey,
//!                 nullable: false,
//!             },
//!             ColumnDef {
//!                 name: "name",
//!                 cql_type: "text",
//!                 role: ColumnRole::Regular,
//!                 nullable: false,
//!             },
//!         ];
//!         &COLUMNS
//!     }
//!
//!     fn to_values(record: &Self) -> Vec<(&'static ColumnDef, CqlValue)> {
//!         Self::columns()
//!             .iter()
//!             .zip([record.id.into(), record.name.clone().into()])
//!             .collect()
//!     }
//! }
//!
//! let statement = SelectQuery::<Account>::new()
//!     .filter(Predicate::eq("id", 42i64))
//!     .unwrap()
//!     .limit(1)
//!     .build();
//! assert_eq!(
//!     statement.query_string(),
//!     "SELECT id, name FROM bank.accounts WHERE id = 42 LIMIT 1;"
//! );
//! ```

// makes the crate accessible as `typed_cql` in macros
extern crate self as typed_cql;

use thiserror::Error;

pub mod cql;
pub mod prelude;
#[cfg(test)]
mod tests;

/// typed-cql error type.
#[derive(Debug, Error)]
pub enum CqlError {
    #[error("schema error: {0}")]
    Schema(#[from] self::cql::table::SchemaError),
    #[error("query shape error: {0}")]
    QueryShape(#[from] self::cql::query::QueryShapeError),
    #[error("deserialization error: {0}")]
    Deserialization(#[from] self::cql::table::DeserializationError),
    #[error("execution error: {0}")]
    Execution(#[from] self::cql::session::ExecutionError),
}

/// typed-cql result type.
pub type CqlResult<T> = Result<T, CqlError>;
