use std::net::IpAddr;

use thiserror::Error;

use crate::cql::session::Row;
use crate::cql::value::CqlValue;

/// An enum representing possible errors while mapping a result row into a
/// typed record.
///
/// Deserialization errors are raised at result-mapping time and fail the
/// deferred result; they are never retried by this crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeserializationError {
    /// The row carries no column with the requested name.
    #[error("missing column '{column}' in result row")]
    MissingColumn { column: String },

    /// The column is NULL but the record field is not optional.
    #[error("column '{column}' is NULL but the field is required")]
    NullInRequiredColumn { column: String },

    /// The column value does not match the requested type.
    #[error("type mismatch on column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The user-defined type of the column is not the expected one.
    #[error("column '{column}' carries user-defined type '{found}', expected '{expected}'")]
    MissingUdtType {
        column: String,
        expected: String,
        found: String,
    },
}

/// This trait decodes a result [`Row`] into a typed record.
///
/// It is usually derived with `#[derive(FromRow)]` from `typed-cql-macros`.
pub trait FromRow: Sized {
    /// Constructs the record from a result row.
    fn from_row(row: &Row) -> Result<Self, DeserializationError>;
}

/// Conversion from a single [`CqlValue`] into a Rust field type.
///
/// `column` is carried only for error reporting.
pub trait FromCqlValue: Sized {
    fn from_cql(column: &str, value: &CqlValue) -> Result<Self, DeserializationError>;
}

// macro rules for implementing FromCqlValue for scalar types
macro_rules! impl_from_cql_for_scalar {
    ($ty:ty, $expected:literal, $($variant:ident)|+) => {
        impl FromCqlValue for $ty {
            fn from_cql(column: &str, value: &CqlValue) -> Result<Self, DeserializationError> {
                match value {
                    $(CqlValue::$variant(v) => Ok(v.clone()),)+
                    CqlValue::Null => Err(DeserializationError::NullInRequiredColumn {
                        column: column.to_string(),
                    }),
                    other => Err(DeserializationError::TypeMismatch {
                        column: column.to_string(),
                        expected: $expected,
                        found: other.type_name(),
                    }),
                }
            }
        }
    };
}

impl_from_cql_for_scalar!(bool, "Boolean", Boolean);
impl_from_cql_for_scalar!(i32, "Int", Int);
impl_from_cql_for_scalar!(i64, "BigInt", BigInt | Timestamp);
impl_from_cql_for_scalar!(f32, "Float", Float);
impl_from_cql_for_scalar!(f64, "Double", Double);
impl_from_cql_for_scalar!(rust_decimal::Decimal, "Decimal", Decimal);
impl_from_cql_for_scalar!(String, "Text", Text);
impl_from_cql_for_scalar!(uuid::Uuid, "Uuid", Uuid | TimeUuid);
impl_from_cql_for_scalar!(IpAddr, "Inet", Inet);
impl_from_cql_for_scalar!(Vec<u8>, "Blob", Blob);

impl FromCqlValue for CqlValue {
    fn from_cql(_column: &str, value: &CqlValue) -> Result<Self, DeserializationError> {
        Ok(value.clone())
    }
}

impl<V> FromCqlValue for Option<V>
where
    V: FromCqlValue,
{
    fn from_cql(column: &str, value: &CqlValue) -> Result<Self, DeserializationError> {
        if value.is_null() {
            Ok(None)
        } else {
            V::from_cql(column, value).map(Some)
        }
    }
}

impl<V> FromCqlValue for Vec<V>
where
    V: FromCqlValue,
{
    fn from_cql(column: &str, value: &CqlValue) -> Result<Self, DeserializationError> {
        match value {
            CqlValue::List(items) | CqlValue::Set(items) => items
                .iter()
                .map(|item| V::from_cql(column, item))
                .collect(),
            CqlValue::Null => Err(DeserializationError::NullInRequiredColumn {
                column: column.to_string(),
            }),
            other => Err(DeserializationError::TypeMismatch {
                column: column.to_string(),
                expected: "List",
                found: other.type_name(),
            }),
        }
    }
}
