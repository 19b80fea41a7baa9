//! Builds the statements for a small time-series table and runs them against
//! an in-memory session, printing every piece of CQL it submits.

use typed_cql::prelude::*;

#[derive(Debug, Clone, PartialEq, FromRow)]
struct Reading {
    sensor: uuid::Uuid,
    at: i64,
    value: f64,
    tags: Vec<String>,
}

static READING_COLUMNS: [ColumnDef; 4] = [
    ColumnDef {
        name: "sensor",
        cql_type: "uuid",
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
        name: "value",
        cql_type: "double",
        role: ColumnRole::Regular,
        nullable: false,
    },
    ColumnDef {
        name: "tags",
        cql_type: "set<text>",
        role: ColumnRole::Collection(CollectionKind::Set),
        nullable: true,
    },
];

impl TableSchema for Reading {
    type Record = Self;

    fn keyspace() -> &'static str {
        "telemetry"
    }

    fn table_name() -> &'static str {
        "readings"
    }

    fn columns() -> &'static [ColumnDef] {
        &READING_COLUMNS
    }

    fn to_values(record: &Self) -> Vec<(&'static ColumnDef, CqlValue)> {
        Self::columns()
            .iter()
            .zip([
                record.sensor.into(),
                CqlValue::timestamp(record.at),
                record.value.into(),
                CqlValue::Set(
                    record
                        .tags
                        .iter()
                        .map(|tag| CqlValue::Text(tag.clone()))
                        .collect(),
                ),
            ])
            .collect()
    }
}

fn reading_row(record: &Reading) -> Row {
    Reading::to_values(record)
        .into_iter()
        .map(|(column, value)| (column.name, value))
        .collect()
}

#[tokio::main]
async fn main() -> CqlResult<()> {
    let session = MemorySession::new();
    let sensor = uuid::Uuid::new_v4();

    let create = CreateQuery::<Reading>::new()?
        .with(TableProperty::Comment("per-sensor readings".to_string()))
        .build();
    create.execute(&session).await?;

    let reading = Reading {
        sensor,
        at: 1_706_745_600_000,
        value: 21.5,
        tags: vec!["hot".to_string()],
    };
    InsertQuery::<Reading>::new()
        .value("sensor", reading.sensor)?
        .value("at", CqlValue::timestamp(reading.at))?
        .value("value", reading.value)?
        .value("tags", CqlValue::Set(vec![CqlValue::Text("hot".to_string())]))?
        .using_ttl(std::time::Duration::from_secs(86_400))
        .build()
        .execute(&session)
        .await?;

    session.respond_with(vec![reading_row(&reading)]);
    let latest = SelectQuery::<Reading>::new()
        .filter(Predicate::eq("sensor", sensor))?
        .limit(1)
        .build()
        .one(&session)
        .await?;
    println!("latest reading: {latest:?}");

    UpdateQuery::<Reading>::new()
        .add("tags", "verified")?
        .filter(Predicate::eq("sensor", sensor))?
        .and(Predicate::eq("at", CqlValue::timestamp(reading.at)))?
        .build()
        .execute(&session)
        .await?;

    let purge = DeleteQuery::<Reading>::new()
        .filter(Predicate::eq("sensor", sensor))?
        .build();
    BatchQuery::new(BatchType::Logged)
        .add(purge)
        .build()?
        .execute(&session)
        .await?;

    println!("submitted statements:");
    for statement in session.submissions() {
        println!("  {statement}");
    }

    Ok(())
}
