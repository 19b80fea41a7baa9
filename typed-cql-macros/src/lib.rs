#![crate_name = "typed_cql_macros"]
#![crate_type = "lib"]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Derive macros for typed-cql
//!
//! This crate provides procedural macros to automatically implement traits
//! required by `typed-cql`.
//!
//! ## Provided Derive Macros
//!
//! - `FromRow`: Automatically implements the `FromRow` trait for structs.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod from_row;

/// Automatically implements the `FromRow` trait for a struct.
///
/// Each named field is decoded from the result-set column carrying the same
/// name. A field of type `Option<V>` decodes a `NULL` column as `None`; any
/// other field type fails with a `DeserializationError` when the column is
/// `NULL` or missing.
///
/// # What the macro generates
///
/// Given a struct like:
///
/// ```rust,ignore
/// #[derive(FromRow)]
/// struct Account {
///     id: Uuid,
///     name: String,
///     comment: Option<String>,
/// }
/// ```
///
/// The macro expands into:
///
/// ```rust,ignore
/// impl FromRow for Account {
///     fn from_row(row: &Row) -> Result<Self, DeserializationError> {
///         Ok(Self {
///             id: row.column("id")?,
///             name: row.column("name")?,
///             comment: row.column("comment")?,
///         })
///     }
/// }
/// ```
///
/// # Requirements
///
/// - Each field type must implement `FromCqlValue`.
/// - Only works on `struct`s with named fields; enums, unions and tuple
///   structs are not supported.
#[proc_macro_derive(FromRow)]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    self::from_row::from_row(input)
}
