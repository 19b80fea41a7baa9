use std::fmt::Write as _;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// A generic wrapper enum to hold any CQL column value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CqlValue {
    BigInt(i64),
    Blob(Vec<u8>),
    Boolean(bool),
    Decimal(rust_decimal::Decimal),
    Double(f64),
    Float(f32),
    Inet(IpAddr),
    Int(i32),
    List(Vec<CqlValue>),
    Map(Vec<(CqlValue, CqlValue)>),
    Null,
    Set(Vec<CqlValue>),
    Text(String),
    TimeUuid(uuid::Uuid),
    /// Milliseconds since the Unix epoch.
    Timestamp(i64),
    Udt {
        type_name: String,
        fields: Vec<(String, CqlValue)>,
    },
    Uuid(uuid::Uuid),
}

// macro rules for implementing From trait for CqlValue enum variants
macro_rules! impl_conv_for_value {
    ($variant:ident, $ty:ty, $name:ident) => {
        impl From<$ty> for CqlValue {
            fn from(value: $ty) -> Self {
                CqlValue::$variant(value)
            }
        }

        impl CqlValue {
            /// Attempts to extract a reference to the inner value if it matches the variant.
            pub fn $name(&self) -> Option<&$ty> {
                if let CqlValue::$variant(v) = self {
                    Some(v)
                } else {
                    None
                }
            }
        }
    };
}

impl_conv_for_value!(BigInt, i64, as_bigint);
impl_conv_for_value!(Blob, Vec<u8>, as_blob);
impl_conv_for_value!(Boolean, bool, as_boolean);
impl_conv_for_value!(Decimal, rust_decimal::Decimal, as_decimal);
impl_conv_for_value!(Double, f64, as_double);
impl_conv_for_value!(Float, f32, as_float);
impl_conv_for_value!(Inet, IpAddr, as_inet);
impl_conv_for_value!(Int, i32, as_int);
impl_conv_for_value!(Text, String, as_text);
impl_conv_for_value!(Uuid, uuid::Uuid, as_uuid);

impl From<&str> for CqlValue {
    fn from(value: &str) -> Self {
        CqlValue::Text(value.to_string())
    }
}

impl CqlValue {
    /// Creates a `timeuuid` value. `uuid::Uuid` converts to [`CqlValue::Uuid`]
    /// via `From`, so the timeuuid flavor needs an explicit constructor.
    pub fn time_uuid(value: uuid::Uuid) -> Self {
        CqlValue::TimeUuid(value)
    }

    /// Creates a `timestamp` value from milliseconds since the Unix epoch.
    pub fn timestamp(millis: i64) -> Self {
        CqlValue::Timestamp(millis)
    }

    /// Checks if the value is [`CqlValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, CqlValue::Null)
    }

    /// Returns the type name of the value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            CqlValue::BigInt(_) => "BigInt",
            CqlValue::Blob(_) => "Blob",
            CqlValue::Boolean(_) => "Boolean",
            CqlValue::Decimal(_) => "Decimal",
            CqlValue::Double(_) => "Double",
            CqlValue::Float(_) => "Float",
            CqlValue::Inet(_) => "Inet",
            CqlValue::Int(_) => "Int",
            CqlValue::List(_) => "List",
            CqlValue::Map(_) => "Map",
            CqlValue::Null => "Null",
            CqlValue::Set(_) => "Set",
            CqlValue::Text(_) => "Text",
            CqlValue::TimeUuid(_) => "TimeUuid",
            CqlValue::Timestamp(_) => "Timestamp",
            CqlValue::Udt { .. } => "Udt",
            CqlValue::Uuid(_) => "Uuid",
        }
    }

    /// Renders the value as a literal CQL term.
    ///
    /// Text and inet values are single-quoted with embedded quotes doubled.
    /// Floating point values render with the numeric's default `Display` form;
    /// no rounding or precision normalization is performed.
    pub fn to_cql_literal(&self) -> String {
        match self {
            CqlValue::BigInt(v) => v.to_string(),
            CqlValue::Blob(bytes) => {
                let mut out = String::with_capacity(2 + bytes.len() * 2);
                out.push_str("0x");
                for byte in bytes {
                    let _ = write!(out, "{byte:02x}");
                }
                out
            }
            CqlValue::Boolean(v) => v.to_string(),
            CqlValue::Decimal(v) => v.to_string(),
            CqlValue::Double(v) => v.to_string(),
            CqlValue::Float(v) => v.to_string(),
            CqlValue::Inet(v) => format!("'{v}'"),
            CqlValue::Int(v) => v.to_string(),
            CqlValue::List(items) => format!("[{}]", Self::join_literals(items)),
            CqlValue::Map(entries) => {
                let body = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.to_cql_literal(), v.to_cql_literal()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{{{body}}}")
            }
            CqlValue::Null => "NULL".to_string(),
            CqlValue::Set(items) => format!("{{{}}}", Self::join_literals(items)),
            CqlValue::Text(v) => format!("'{}'", v.replace('\'', "''")),
            CqlValue::TimeUuid(v) => v.to_string(),
            CqlValue::Timestamp(millis) => millis.to_string(),
            CqlValue::Udt { fields, .. } => {
                let body = fields
                    .iter()
                    .map(|(name, value)| format!("{name}: {}", value.to_cql_literal()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{{{body}}}")
            }
            CqlValue::Uuid(v) => v.to_string(),
        }
    }

    fn join_literals(items: &[CqlValue]) -> String {
        items
            .iter()
            .map(CqlValue::to_cql_literal)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
