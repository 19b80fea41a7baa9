//! This module contains types related to table schemas.

mod record;
mod schema;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::record::{DeserializationError, FromCqlValue, FromRow};
pub use self::schema::TableSchema;

/// An enum representing possible errors in a table declaration.
///
/// Schema errors are raised at declaration-validation time and are fatal to
/// the table's usability; they are never recovered at query time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// The table declares no partition key column.
    #[error("table '{table}' has no partition key column")]
    NoPartitionKey { table: &'static str },

    /// Two columns in the table share the same name.
    #[error("table '{table}' declares column '{column}' more than once")]
    DuplicateColumn {
        table: &'static str,
        column: &'static str,
    },

    /// A clustering key column is declared before a partition key column.
    #[error("table '{table}' declares clustering key '{column}' before a partition key")]
    ClusteringBeforePartition {
        table: &'static str,
        column: &'static str,
    },
}

/// Sort order of a clustering key column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// The CQL direction keyword.
    pub fn as_cql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// The kind of a collection column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    List,
    Set,
    Map,
}

/// The semantic role a column plays within its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnRole {
    PartitionKey,
    ClusteringKey(SortOrder),
    SecondaryIndex,
    Static,
    Regular,
    Collection(CollectionKind),
    Udt,
}

/// Defines a column in a table schema.
///
/// Column descriptors are declared once, as `'static` data, and are read-only
/// for the lifetime of the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnDef {
    /// The name of the column.
    pub name: &'static str,
    /// The CQL type name of the column (e.g. `text`, `bigint`, `list<int>`).
    pub cql_type: &'static str,
    /// The [`ColumnRole`] of the column.
    pub role: ColumnRole,
    /// Indicates if this column can contain NULL values.
    pub nullable: bool,
}

impl ColumnDef {
    /// Whether this column is part of the partition key.
    pub fn is_partition_key(&self) -> bool {
        matches!(self.role, ColumnRole::PartitionKey)
    }

    /// Whether this column is a clustering key.
    pub fn is_clustering_key(&self) -> bool {
        matches!(self.role, ColumnRole::ClusteringKey(_))
    }

    /// Whether this column carries a secondary index.
    pub fn is_secondary_index(&self) -> bool {
        matches!(self.role, ColumnRole::SecondaryIndex)
    }

    /// Whether a WHERE predicate may restrict this column without
    /// `ALLOW FILTERING`.
    pub fn is_key_or_index(&self) -> bool {
        self.is_partition_key() || self.is_clustering_key() || self.is_secondary_index()
    }

    /// Returns the collection kind if this is a collection column.
    pub fn collection_kind(&self) -> Option<CollectionKind> {
        match self.role {
            ColumnRole::Collection(kind) => Some(kind),
            _ => None,
        }
    }

    /// Returns the clustering sort order if this is a clustering key.
    pub fn sort_order(&self) -> Option<SortOrder> {
        match self.role {
            ColumnRole::ClusteringKey(order) => Some(order),
            _ => None,
        }
    }

    /// Renders the column definition as it appears in a CREATE TABLE body,
    /// e.g. `name text` or `counters map<text, bigint> STATIC`.
    pub fn definition_clause(&self) -> String {
        if matches!(self.role, ColumnRole::Static) {
            format!("{} {} STATIC", self.name, self.cql_type)
        } else {
            format!("{} {}", self.name, self.cql_type)
        }
    }
}
