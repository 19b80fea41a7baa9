use crate::cql::value::CqlValue;

/// A single WHERE/IF predicate: a column name, a comparison operator and a
/// literal term.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(&'static str, CqlValue),
    /// Only legal inside `IF` conditions; CQL WHERE clauses have no `!=`.
    Ne(&'static str, CqlValue),
    Gt(&'static str, CqlValue),
    Ge(&'static str, CqlValue),
    Lt(&'static str, CqlValue),
    Le(&'static str, CqlValue),
    In(&'static str, Vec<CqlValue>),
    Contains(&'static str, CqlValue),
}

impl Predicate {
    /// Creates an equality predicate.
    pub fn eq(column: &'static str, value: impl Into<CqlValue>) -> Self {
        Predicate::Eq(column, value.into())
    }

    /// Creates a not-equal predicate (for `IF` conditions).
    pub fn ne(column: &'static str, value: impl Into<CqlValue>) -> Self {
        Predicate::Ne(column, value.into())
    }

    /// Creates a greater-than predicate.
    pub fn gt(column: &'static str, value: impl Into<CqlValue>) -> Self {
        Predicate::Gt(column, value.into())
    }

    /// Creates a greater-than-or-equal predicate.
    pub fn ge(column: &'static str, value: impl Into<CqlValue>) -> Self {
        Predicate::Ge(column, value.into())
    }

    /// Creates a less-than predicate.
    pub fn lt(column: &'static str, value: impl Into<CqlValue>) -> Self {
        Predicate::Lt(column, value.into())
    }

    /// Creates a less-than-or-equal predicate.
    pub fn le(column: &'static str, value: impl Into<CqlValue>) -> Self {
        Predicate::Le(column, value.into())
    }

    /// Creates an IN predicate over a list of terms.
    pub fn in_list<I, V>(column: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CqlValue>,
    {
        Predicate::In(column, values.into_iter().map(Into::into).collect())
    }

    /// Creates a CONTAINS predicate for collection columns.
    pub fn contains(column: &'static str, value: impl Into<CqlValue>) -> Self {
        Predicate::Contains(column, value.into())
    }

    /// The column this predicate restricts.
    pub fn column(&self) -> &'static str {
        match self {
            Predicate::Eq(column, _)
            | Predicate::Ne(column, _)
            | Predicate::Gt(column, _)
            | Predicate::Ge(column, _)
            | Predicate::Lt(column, _)
            | Predicate::Le(column, _)
            | Predicate::In(column, _)
            | Predicate::Contains(column, _) => column,
        }
    }

    /// Renders the predicate as CQL text, e.g. `sensor = 3`.
    pub fn render(&self) -> String {
        match self {
            Predicate::Eq(column, value) => format!("{column} = {}", value.to_cql_literal()),
            Predicate::Ne(column, value) => format!("{column} != {}", value.to_cql_literal()),
            Predicate::Gt(column, value) => format!("{column} > {}", value.to_cql_literal()),
            Predicate::Ge(column, value) => format!("{column} >= {}", value.to_cql_literal()),
            Predicate::Lt(column, value) => format!("{column} < {}", value.to_cql_literal()),
            Predicate::Le(column, value) => format!("{column} <= {}", value.to_cql_literal()),
            Predicate::In(column, values) => {
                let terms = values
                    .iter()
                    .map(CqlValue::to_cql_literal)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{column} IN ({terms})")
            }
            Predicate::Contains(column, value) => {
                format!("{column} CONTAINS {}", value.to_cql_literal())
            }
        }
    }
}
