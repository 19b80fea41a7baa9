//! Phantom marker types tracking which clauses a query has already accepted.
//!
//! Each query builder is parameterized by a set of these zero-sized tags;
//! every transition returns a builder with an updated tag set, so an illegal
//! clause sequence fails to compile instead of failing at run time.

/// No clause of this kind has been chained yet (WHERE or table-properties).
#[derive(Debug, Clone, Copy)]
pub struct Unchained;

/// A clause of this kind has been chained (WHERE or table-properties);
/// further additions go through `and`.
#[derive(Debug, Clone, Copy)]
pub struct Chained;

/// No ORDER BY clause has been applied.
#[derive(Debug, Clone, Copy)]
pub struct Unordered;

/// An ORDER BY clause has been applied.
#[derive(Debug, Clone, Copy)]
pub struct Ordered;

/// No LIMIT clause has been applied.
#[derive(Debug, Clone, Copy)]
pub struct Unlimited;

/// A LIMIT clause has been applied.
#[derive(Debug, Clone, Copy)]
pub struct Limited;

/// No column/value pair has been assigned yet.
#[derive(Debug, Clone, Copy)]
pub struct Unassigned;

/// At least one column/value pair has been assigned.
#[derive(Debug, Clone, Copy)]
pub struct Assigned;

/// No consistency level has been specified.
#[derive(Debug, Clone, Copy)]
pub struct Unspecified;

/// A consistency level has been specified.
#[derive(Debug, Clone, Copy)]
pub struct Specified;
