//! This module exposes all the types of the typed CQL layer: the value and
//! table models, the immutable fragment builder, the type-state query
//! builders, the executable-statement layer and the session capability.

pub mod consistency;
pub mod fragment;
pub mod query;
pub mod session;
pub mod statement;
pub mod table;
pub mod value;
