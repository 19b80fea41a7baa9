use std::marker::PhantomData;
use std::time::Duration;

use crate::cql::fragment::QueryFragment;
use crate::cql::query::markers::{Chained, Unchained};
use crate::cql::statement::CreateStatement;
use crate::cql::table::{SchemaError, TableSchema};

/// A table property appended to CREATE TABLE through `with`/`and`.
#[derive(Debug, Clone, PartialEq)]
pub enum TableProperty {
    Comment(String),
    Compaction(CompactionStrategy),
    Compression(Compressor),
    Caching(CachingMode),
    GcGraceSeconds(Duration),
    BloomFilterFpChance(f64),
    DefaultTimeToLive(Duration),
}

impl TableProperty {
    /// Renders the property as a `name = value` pair.
    ///
    /// Durations render as whole seconds; double-valued properties render
    /// with the numeric's default `Display` form.
    pub fn render(&self) -> String {
        match self {
            TableProperty::Comment(text) => {
                format!("comment = '{}'", text.replace('\'', "''"))
            }
            TableProperty::Compaction(strategy) => {
                format!("compaction = {}", strategy.render())
            }
            TableProperty::Compression(compressor) => format!(
                "compression = {{'sstable_compression': '{}'}}",
                compressor.class_name()
            ),
            TableProperty::Caching(mode) => format!("caching = '{}'", mode.as_cql()),
            TableProperty::GcGraceSeconds(duration) => {
                format!("gc_grace_seconds = {}", duration.as_secs())
            }
            TableProperty::BloomFilterFpChance(chance) => {
                format!("bloom_filter_fp_chance = {chance}")
            }
            TableProperty::DefaultTimeToLive(duration) => {
                format!("default_time_to_live = {}", duration.as_secs())
            }
        }
    }
}

/// Compaction strategy table property.
#[derive(Debug, Clone, PartialEq)]
pub enum CompactionStrategy {
    SizeTiered {
        bucket_high: Option<f64>,
        bucket_low: Option<f64>,
        min_threshold: Option<u32>,
    },
    Leveled {
        sstable_size_in_mb: Option<u32>,
    },
    TimeWindow,
}

impl CompactionStrategy {
    fn render(&self) -> String {
        let mut entries = vec![format!("'class': '{}'", self.class_name())];
        match self {
            CompactionStrategy::SizeTiered {
                bucket_high,
                bucket_low,
                min_threshold,
            } => {
                if let Some(high) = bucket_high {
                    entries.push(format!("'bucket_high': {high}"));
                }
                if let Some(low) = bucket_low {
                    entries.push(format!("'bucket_low': {low}"));
                }
                if let Some(threshold) = min_threshold {
                    entries.push(format!("'min_threshold': {threshold}"));
                }
            }
            CompactionStrategy::Leveled { sstable_size_in_mb } => {
                if let Some(size) = sstable_size_in_mb {
                    entries.push(format!("'sstable_size_in_mb': {size}"));
                }
            }
            CompactionStrategy::TimeWindow => {}
        }
        format!("{{{}}}", entries.join(", "))
    }

    fn class_name(&self) -> &'static str {
        match self {
            CompactionStrategy::SizeTiered { .. } => "SizeTieredCompactionStrategy",
            CompactionStrategy::Leveled { .. } => "LeveledCompactionStrategy",
            CompactionStrategy::TimeWindow => "TimeWindowCompactionStrategy",
        }
    }
}

/// SSTable compressor table property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compressor {
    Lz4,
    Snappy,
    Deflate,
}

impl Compressor {
    fn class_name(&self) -> &'static str {
        match self {
            Compressor::Lz4 => "LZ4Compressor",
            Compressor::Snappy => "SnappyCompressor",
            Compressor::Deflate => "DeflateCompressor",
        }
    }
}

/// Row/key caching table property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachingMode {
    All,
    KeysOnly,
    RowsOnly,
    None,
}

impl CachingMode {
    fn as_cql(&self) -> &'static str {
        match self {
            CachingMode::All => "all",
            CachingMode::KeysOnly => "keys_only",
            CachingMode::RowsOnly => "rows_only",
            CachingMode::None => "none",
        }
    }
}

/// A CREATE TABLE statement builder.
///
/// Construction validates the table's key structure and fails with a
/// [`SchemaError`] before anything renders. `Props` tracks the
/// table-properties chain: the first property goes through `with`, every
/// further one through `and`; a second `with` does not compile.
///
/// The built statement carries one follow-up CREATE INDEX per secondary-index
/// column; see [`CreateStatement`] for the fan-out semantics.
#[derive(Debug, Clone)]
pub struct CreateQuery<T, Props = Unchained>
where
    T: TableSchema,
{
    base: QueryFragment,
    properties: Vec<String>,
    _marker: PhantomData<(T, Props)>,
}

impl<T> CreateQuery<T>
where
    T: TableSchema,
{
    /// Starts a CREATE TABLE for the schema, validating its key structure.
    pub fn new() -> Result<Self, SchemaError> {
        T::validate()?;

        let definitions = T::columns()
            .iter()
            .map(|column| column.definition_clause())
            .collect::<Vec<_>>()
            .join(", ");
        let key_clause = T::key_definition_clause()?;
        let base = QueryFragment::new(format!(
            "CREATE TABLE IF NOT EXISTS {} ({definitions}, {key_clause})",
            T::qualified_name()
        ));

        Ok(Self {
            base,
            properties: Vec::new(),
            _marker: PhantomData,
        })
    }
}

impl<T, Props> CreateQuery<T, Props>
where
    T: TableSchema,
{
    fn cast<P2>(self) -> CreateQuery<T, P2> {
        CreateQuery {
            base: self.base,
            properties: self.properties,
            _marker: PhantomData,
        }
    }

    /// Converts the builder into an executable create statement, including
    /// one CREATE INDEX fragment per secondary-index column.
    pub fn build(self) -> CreateStatement<T> {
        let mut clauses = Vec::new();
        if let Some(order) = T::clustering_order_clause() {
            clauses.push(order);
        }
        clauses.extend(self.properties);

        let mut fragment = self.base;
        if !clauses.is_empty() {
            fragment = fragment
                .force_pad()
                .append(format!("WITH {}", clauses.join(" AND ")));
        }

        let indexes = T::secondary_keys()
            .into_iter()
            .map(|column| {
                QueryFragment::new(format!(
                    "CREATE INDEX IF NOT EXISTS ON {} ({})",
                    T::qualified_name(),
                    column.name
                ))
                .terminate()
            })
            .collect();

        CreateStatement::new(fragment.terminate(), indexes)
    }
}

impl<T> CreateQuery<T, Unchained>
where
    T: TableSchema,
{
    /// Chains the first table property. Further properties go through
    /// [`CreateQuery::and`].
    pub fn with(self, property: TableProperty) -> CreateQuery<T, Chained> {
        let mut next: CreateQuery<T, Chained> = self.cast();
        next.properties.push(property.render());
        next
    }
}

impl<T> CreateQuery<T, Chained>
where
    T: TableSchema,
{
    /// Chains a further table property.
    pub fn and(mut self, property: TableProperty) -> Self {
        self.properties.push(property.render());
        self
    }
}
