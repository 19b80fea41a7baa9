use crate::cql::table::{ColumnDef, FromRow, SchemaError, SortOrder};
use crate::cql::value::CqlValue;

/// Table schema representation.
///
/// It is used to define the structure of a table once, at declaration time;
/// query builders derive every clause from it. Column order is significant:
/// partition keys must be declared before clustering keys, and the declared
/// order drives key-clause generation.
///
/// All derived key sets are pure functions of [`TableSchema::columns`].
pub trait TableSchema {
    /// The typed record decoded from a result row of this table.
    type Record: FromRow;

    /// Returns the keyspace the table is bound to.
    fn keyspace() -> &'static str;

    /// Returns the name of the table.
    fn table_name() -> &'static str;

    /// Returns the column definitions of the table, in declared order.
    fn columns() -> &'static [ColumnDef];

    /// Converts a record into column-value pairs, in declared column order.
    fn to_values(record: &Self::Record) -> Vec<(&'static ColumnDef, CqlValue)>;

    /// Returns the keyspace-qualified table name, e.g. `ks.series`.
    fn qualified_name() -> String {
        format!("{}.{}", Self::keyspace(), Self::table_name())
    }

    /// Looks up a column descriptor by name.
    fn column(name: &str) -> Option<&'static ColumnDef> {
        Self::columns().iter().find(|column| column.name == name)
    }

    /// Returns the partition key columns, in declared order.
    fn partition_keys() -> Vec<&'static ColumnDef> {
        Self::columns()
            .iter()
            .filter(|column| column.is_partition_key())
            .collect()
    }

    /// Returns the clustering key columns, in declared order.
    fn clustering_keys() -> Vec<&'static ColumnDef> {
        Self::columns()
            .iter()
            .filter(|column| column.is_clustering_key())
            .collect()
    }

    /// Returns the secondary index columns, in declared order.
    fn secondary_keys() -> Vec<&'static ColumnDef> {
        Self::columns()
            .iter()
            .filter(|column| column.is_secondary_index())
            .collect()
    }

    /// Validates the key structure of the declaration.
    ///
    /// Fails when the table has no partition key, declares a column name
    /// twice, or declares a clustering key before a partition key.
    fn validate() -> Result<(), SchemaError> {
        let columns = Self::columns();

        for (index, column) in columns.iter().enumerate() {
            if columns[..index].iter().any(|prev| prev.name == column.name) {
                return Err(SchemaError::DuplicateColumn {
                    table: Self::table_name(),
                    column: column.name,
                });
            }
        }

        let last_partition = columns.iter().rposition(ColumnDef::is_partition_key);
        let Some(last_partition) = last_partition else {
            return Err(SchemaError::NoPartitionKey {
                table: Self::table_name(),
            });
        };

        if let Some(early_clustering) = columns[..last_partition]
            .iter()
            .find(|column| column.is_clustering_key())
        {
            return Err(SchemaError::ClusteringBeforePartition {
                table: Self::table_name(),
                column: early_clustering.name,
            });
        }

        Ok(())
    }

    /// Renders the composite `PRIMARY KEY (...)` clause.
    ///
    /// Partition keys are parenthesized as a group when more than one exists;
    /// clustering keys follow in declared order, with a trailing direction
    /// qualifier for any clustering key whose declared order is descending.
    fn key_definition_clause() -> Result<String, SchemaError> {
        let partition_keys = Self::partition_keys();
        if partition_keys.is_empty() {
            return Err(SchemaError::NoPartitionKey {
                table: Self::table_name(),
            });
        }

        let partition_names = partition_keys
            .iter()
            .map(|column| column.name)
            .collect::<Vec<_>>()
            .join(", ");
        let mut parts = if partition_keys.len() > 1 {
            vec![format!("({partition_names})")]
        } else {
            vec![partition_names]
        };

        for clustering in Self::clustering_keys() {
            match clustering.sort_order() {
                Some(SortOrder::Descending) => {
                    parts.push(format!("{} DESC", clustering.name));
                }
                _ => parts.push(clustering.name.to_string()),
            }
        }

        Ok(format!("PRIMARY KEY ({})", parts.join(", ")))
    }

    /// Renders the `CLUSTERING ORDER BY (...)` table option when any
    /// clustering key is declared descending.
    fn clustering_order_clause() -> Option<String> {
        let clustering_keys = Self::clustering_keys();
        if clustering_keys
            .iter()
            .all(|column| column.sort_order() != Some(SortOrder::Descending))
        {
            return None;
        }

        let body = clustering_keys
            .iter()
            .map(|column| {
                format!(
                    "{} {}",
                    column.name,
                    column.sort_order().unwrap_or_default().as_cql()
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        Some(format!("CLUSTERING ORDER BY ({body})"))
    }
}
