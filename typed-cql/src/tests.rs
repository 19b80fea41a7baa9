//! Shared table fixtures for the crate's tests.

use std::net::IpAddr;

use typed_cql_macros::FromRow;

use crate::cql::session::Row;
use crate::cql::table::{
    CollectionKind, ColumnDef, ColumnRole, DeserializationError, FromCqlValue, SortOrder,
    TableSchema,
};
use crate::cql::value::CqlValue;

/// A table covering every supported scalar column type.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Primitives {
    pub pkey: String,
    pub long: i64,
    pub boolean: bool,
    pub decimal: rust_decimal::Decimal,
    pub double: f64,
    pub float: f32,
    pub inet: IpAddr,
    pub int: i32,
}

static PRIMITIVES_COLUMNS: [ColumnDef; 8] = [
    ColumnDef {
        name: "pkey",
        cql_type: "text",
        role: ColumnRole::PartitionKey,
        nullable: false,
    },
    ColumnDef {
        name: "long",
        cql_type: "bigint",
        role: ColumnRole::Regular,
        nullable: false,
    },
    ColumnDef {
        name: "boolean",
        cql_type: "boolean",
        role: ColumnRole::Regular,
        nullable: false,
    },
    ColumnDef {
        name: "decimal",
        cql_type: "decimal",
        role: ColumnRole::Regular,
        nullable: false,
    },
    ColumnDef {
        name: "double",
        cql_type: "double",
        role: ColumnRole::Regular,
        nullable: false,
    },
    ColumnDef {
        name: "float",
        cql_type: "float",
        role: ColumnRole::Regular,
        nullable: false,
    },
    ColumnDef {
        name: "inet",
        cql_type: "inet",
        role: ColumnRole::Regular,
        nullable: false,
    },
    ColumnDef {
        name: "int",
        cql_type: "int",
        role: ColumnRole::Regular,
        nullable: false,
    },
];

impl TableSchema for Primitives {
    type Record = Self;

    fn keyspace() -> &'static str {
        "ks"
    }

    fn table_name() -> &'static str {
        "primitives"
    }

    fn columns() -> &'static [ColumnDef] {
        &PRIMITIVES_COLUMNS
    }

    fn to_values(record: &Self) -> Vec<(&'static ColumnDef, CqlValue)> {
        Self::columns()
            .iter()
            .zip([
                record.pkey.clone().into(),
                record.long.into(),
                record.boolean.into(),
                record.decimal.into(),
                record.double.into(),
                record.float.into(),
                record.inet.into(),
                record.int.into(),
            ])
            .collect()
    }
}

/// Builds the result row a driver would return for a [`Primitives`] record.
pub fn primitives_row(record: &Primitives) -> Row {
    Primitives::to_values(record)
        .into_iter()
        .map(|(column, value)| (column.name, value))
        .collect()
}

/// A user-defined type fixture, decoded from a `location` UDT value.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub street: String,
    pub number: i32,
}

impl Location {
    pub fn to_value(&self) -> CqlValue {
        CqlValue::Udt {
            type_name: "location".to_string(),
            fields: vec![
                ("street".to_string(), self.street.clone().into()),
                ("number".to_string(), self.number.into()),
            ],
        }
    }
}

impl FromCqlValue for Location {
    fn from_cql(column: &str, value: &CqlValue) -> Result<Self, DeserializationError> {
        match value {
            CqlValue::Udt { type_name, fields } if type_name == "location" => {
                let field = |name: &str| {
                    fields
                        .iter()
                        .find(|(field, _)| field == name)
                        .map(|(_, value)| value)
                        .ok_or_else(|| DeserializationError::MissingColumn {
                            column: format!("{column}.{name}"),
                        })
                };
                Ok(Location {
                    street: String::from_cql(column, field("street")?)?,
                    number: i32::from_cql(column, field("number")?)?,
                })
            }
            CqlValue::Udt { type_name, .. } => Err(DeserializationError::MissingUdtType {
                column: column.to_string(),
                expected: "location".to_string(),
                found: type_name.clone(),
            }),
            CqlValue::Null => Err(DeserializationError::NullInRequiredColumn {
                column: column.to_string(),
            }),
            other => Err(DeserializationError::TypeMismatch {
                column: column.to_string(),
                expected: "Udt",
                found: other.type_name(),
            }),
        }
    }
}

/// A table with a composite partition key, a descending clustering key, a
/// secondary index, a static column, collections and a UDT column.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Series {
    pub sensor: uuid::Uuid,
    pub day: String,
    pub at: i64,
    pub origin: String,
    pub owner: Option<String>,
    pub tags: Vec<String>,
    pub events: Vec<String>,
    pub counters: CqlValue,
    pub reading: f64,
    pub location: Location,
    pub note: Option<String>,
}

static SERIES_COLUMNS: [ColumnDef; 11] = [
    ColumnDef {
        name: "sensor",
        cql_type: "uuid",
        role: ColumnRole::PartitionKey,
        nullable: false,
    },
    ColumnDef {
        name: "day",
        cql_type: "text",
        role: ColumnRole::PartitionKey,
        nullable: false,
    },
    ColumnDef {
        name: "at",
        cql_type: "timestamp",
        role: ColumnRole::ClusteringKey(SortOrder::Descending),
        nullable: false,
    },
    ColumnDef {
        name: "origin",
        cql_type: "text",
        role: ColumnRole::SecondaryIndex,
        nullable: false,
    },
    ColumnDef {
        name: "owner",
        cql_type: "text",
        role: ColumnRole::Static,
        nullable: true,
    },
    ColumnDef {
        name: "tags",
        cql_type: "set<text>",
        role: ColumnRole::Collection(CollectionKind::Set),
        nullable: true,
    },
    ColumnDef {
        name: "events",
        cql_type: "list<text>",
        role: ColumnRole::Collection(CollectionKind::List),
        nullable: true,
    },
    ColumnDef {
        name: "counters",
        cql_type: "map<text, bigint>",
        role: ColumnRole::Collection(CollectionKind::Map),
        nullable: true,
    },
    ColumnDef {
        name: "reading",
        cql_type: "double",
        role: ColumnRole::Regular,
        nullable: false,
    },
    ColumnDef {
        name: "location",
        cql_type: "frozen<location>",
        role: ColumnRole::Udt,
        nullable: false,
    },
    ColumnDef {
        name: "note",
        cql_type: "text",
        role: ColumnRole::Regular,
        nullable: true,
    },
];

impl TableSchema for Series {
    type Record = Self;

    fn keyspace() -> &'static str {
        "demo"
    }

    fn table_name() -> &'static str {
        "series"
    }

    fn columns() -> &'static [ColumnDef] {
        &SERIES_COLUMNS
    }

    fn to_values(record: &Self) -> Vec<(&'static ColumnDef, CqlValue)> {
        let text_item = |item: &String| CqlValue::Text(item.clone());
        let optional = |value: &Option<String>| match value {
            Some(text) => CqlValue::Text(text.clone()),
            None => CqlValue::Null,
        };

        Self::columns()
            .iter()
            .zip([
                record.sensor.into(),
                record.day.clone().into(),
                CqlValue::timestamp(record.at),
                record.origin.clone().into(),
                optional(&record.owner),
                CqlValue::Set(record.tags.iter().map(text_item).collect()),
                CqlValue::List(record.events.iter().map(text_item).collect()),
                record.counters.clone(),
                record.reading.into(),
                record.location.to_value(),
                optional(&record.note),
            ])
            .collect()
    }
}

/// Builds the result row a driver would return for a [`Series`] record.
pub fn series_row(record: &Series) -> Row {
    Series::to_values(record)
        .into_iter()
        .map(|(column, value)| (column.name, value))
        .collect()
}

/// A narrow view over the `series` table, decoding only its key columns and
/// the reading.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct SeriesReading {
    pub sensor: uuid::Uuid,
    pub day: String,
    pub reading: f64,
}

static SERIES_READING_COLUMNS: [ColumnDef; 3] = [
    ColumnDef {
        name: "sensor",
        cql_type: "uuid",
        role: ColumnRole::PartitionKey,
        nullable: false,
    },
    ColumnDef {
        name: "day",
        cql_type: "text",
        role: ColumnRole::PartitionKey,
        nullable: false,
    },
    ColumnDef {
        name: "reading",
        cql_type: "double",
        role: ColumnRole::Regular,
        nullable: false,
    },
];

impl TableSchema for SeriesReading {
    type Record = Self;

    fn keyspace() -> &'static str {
        "demo"
    }

    fn table_name() -> &'static str {
        "series"
    }

    fn columns() -> &'static [ColumnDef] {
        &SERIES_READING_COLUMNS
    }

    fn to_values(record: &Self) -> Vec<(&'static ColumnDef, CqlValue)> {
        Self::columns()
            .iter()
            .zip([
                record.sensor.into(),
                record.day.clone().into(),
                record.reading.into(),
            ])
            .collect()
    }
}

/// Builds the result row a driver would return for a projected
/// [`SeriesReading`] view.
pub fn series_reading_row(record: &SeriesReading) -> Row {
    SeriesReading::to_values(record)
        .into_iter()
        .map(|(column, value)| (column.name, value))
        .collect()
}

/// A schema declared without any partition key.
#[derive(Debug)]
pub struct BrokenNoKey;

impl TableSchema for BrokenNoKey {
    type Record = Primitives;

    fn keyspace() -> &'static str {
        "demo"
    }

    fn table_name() -> &'static str {
        "no_key"
    }

    fn columns() -> &'static [ColumnDef] {
        static COLUMNS: [ColumnDef; 1] = [ColumnDef {
            name: "value",
            cql_type: "text",
            role: ColumnRole::Regular,
            nullable: false,
        }];
        &COLUMNS
    }

    fn to_values(_record: &Primitives) -> Vec<(&'static ColumnDef, CqlValue)> {
        Vec::new()
    }
}

/// A schema declaring the same column name twice.
#[derive(Debug)]
pub struct BrokenDuplicate;

impl TableSchema for BrokenDuplicate {
    type Record = Primitives;

    fn keyspace() -> &'static str {
        "demo"
    }

    fn table_name() -> &'static str {
        "duplicated"
    }

    fn columns() -> &'static [ColumnDef] {
        static COLUMNS: [ColumnDef; 2] = [
            ColumnDef {
                name: "id",
                cql_type: "text",
                role: ColumnRole::PartitionKey,
                nullable: false,
            },
            ColumnDef {
                name: "id",
                cql_type: "bigint",
                role: ColumnRole::Regular,
                nullable: false,
            },
        ];
        &COLUMNS
    }

    fn to_values(_record: &Primitives) -> Vec<(&'static ColumnDef, CqlValue)> {
        Vec::new()
    }
}

/// A schema declaring a clustering key before its partition key.
#[derive(Debug)]
pub struct BrokenClusteringFirst;

impl TableSchema for BrokenClusteringFirst {
    type Record = Primitives;

    fn keyspace() -> &'static str {
        "demo"
    }

    fn table_name() -> &'static str {
        "inverted"
    }

    fn columns() -> &'static [ColumnDef] {
        static COLUMNS: [ColumnDef; 2] = [
            ColumnDef {
                name: "at",
                cql_type: "timestamp",
                role: ColumnRole::ClusteringKey(SortOrder::Ascending),
                nullable: false,
            },
            ColumnDef {
                name: "id",
                cql_type: "text",
                role: ColumnRole::PartitionKey,
                nullable: false,
            },
        ];
        &COLUMNS
    }

    fn to_values(_record: &Primitives) -> Vec<(&'static ColumnDef, CqlValue)> {
        Vec::new()
    }
}

#[allow(clippy::module_inception)]
#[cfg(test)]
mod tests {

    use std::net::Ipv4Addr;

    use super::*;
    use crate::cql::table::FromRow as _;

    fn sample_series() -> Series {
        Series {
            sensor: uuid::Uuid::nil(),
            day: "2024-02-01".to_string(),
            at: 1_706_745_600_000,
            origin: "probe-1".to_string(),
            owner: Some("ops".to_string()),
            tags: vec!["hot".to_string()],
            events: vec!["boot".to_string()],
            counters: CqlValue::Map(vec![("restarts".into(), CqlValue::BigInt(3))]),
            reading: 21.5,
            location: Location {
                street: "Elm St".to_string(),
                number: 13,
            },
            note: None,
        }
    }

    #[test]
    fn test_should_round_trip_primitives_record_through_row() {
        let record = Primitives {
            pkey: "row-1".to_string(),
            long: 42,
            boolean: true,
            decimal: rust_decimal::Decimal::new(12345, 2),
            double: 0.25,
            float: 1.5,
            inet: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            int: 7,
        };

        let decoded = Primitives::from_row(&primitives_row(&record)).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_should_round_trip_series_record_through_row() {
        let record = sample_series();
        let decoded = Series::from_row(&series_row(&record)).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_should_fail_udt_decode_on_wrong_type_name() {
        let err = Location::from_cql(
            "location",
            &CqlValue::Udt {
                type_name: "address".to_string(),
                fields: Vec::new(),
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            DeserializationError::MissingUdtType {
                column: "location".to_string(),
                expected: "location".to_string(),
                found: "address".to_string(),
            }
        );
    }
}
